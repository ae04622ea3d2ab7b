// Codepoint Comparison
// Aligned character-code diff between a plain text and its watermarked
// variant, for manual spot checks of aggregate numbers. Never feeds back
// into detection or aggregation.

use crate::models::CharDiff;

/// Lazily walk both texts in parallel, yielding one aligned codepoint pair
/// per character index, up to `max_chars`. When the texts differ in length
/// the shorter side pads with `None` instead of stopping early.
pub fn compare_codepoints<'a>(
    plain: &'a str,
    watermarked: &'a str,
    max_chars: usize,
) -> impl Iterator<Item = CharDiff> + 'a {
    let mut plain_chars = plain.chars();
    let mut watermarked_chars = watermarked.chars();

    (0..max_chars).map_while(move |i| match (plain_chars.next(), watermarked_chars.next()) {
        (None, None) => None,
        (p, w) => Some(CharDiff {
            index: i as i32,
            plain: p,
            watermarked: w,
        }),
    })
}

/// First index where the two texts disagree, within the inspected window.
pub fn first_divergence(plain: &str, watermarked: &str, max_chars: usize) -> Option<CharDiff> {
    compare_codepoints(plain, watermarked, max_chars).find(|d| d.is_mismatch())
}
