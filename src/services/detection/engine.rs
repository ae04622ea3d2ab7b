// Detection Engine
// Evaluates every registered signal against a sample's resolved subject text

use std::collections::BTreeMap;

use crate::models::Sample;

use super::resolver::SubjectResolver;
use super::signals::SignalRegistry;
use super::ScanError;

/// Evaluate every registered signal against the sample's subject text.
/// The subject is resolved exactly once so all signals for a row see the
/// same string. The result has one entry per registered signal.
pub fn detect(
    sample: &Sample,
    resolver: &SubjectResolver,
    registry: &SignalRegistry,
) -> Result<BTreeMap<String, bool>, ScanError> {
    let subject = resolver.resolve_subject(sample)?;
    Ok(detect_in_text(subject, registry))
}

/// Signal evaluation against an already-resolved subject string.
pub fn detect_in_text(subject: &str, registry: &SignalRegistry) -> BTreeMap<String, bool> {
    registry
        .iter()
        .map(|signal| (signal.name().to_string(), signal.matches(subject)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: i32, label: &str, plain: &str, watermarked: Option<&str>) -> Sample {
        Sample {
            id,
            text_plain: plain.to_string(),
            text_watermarked: watermarked.map(|s| s.to_string()),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_detect_covers_every_signal() {
        let registry = SignalRegistry::default_signals();
        let resolver = SubjectResolver::default();
        let s = sample(0, "AI_Plain", "plain text, nothing special.", None);

        let results = detect(&s, &resolver, &registry).unwrap();
        assert_eq!(results.len(), registry.len());
        assert!(results.values().all(|&hit| !hit));
    }

    #[test]
    fn test_detect_reads_watermarked_column() {
        let registry = SignalRegistry::default_signals();
        let resolver = SubjectResolver::default();
        let s = sample(
            1,
            "AI_Watermarked",
            "clean text",
            Some("marked\u{200b} text\u{3002}"),
        );

        let results = detect(&s, &resolver, &registry).unwrap();
        assert!(results["zwsp"]);
        assert!(results["fullwidth_period"]);
        assert!(!results["arabic_comma"]);
        assert!(!results["right_quote"]);
    }

    #[test]
    fn test_empty_subject_is_all_false() {
        let registry = SignalRegistry::default_signals();
        let resolver = SubjectResolver::default();
        let s = sample(2, "AI_Plain", "", None);

        let results = detect(&s, &resolver, &registry).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.values().all(|&hit| !hit));
    }

    #[test]
    fn test_detect_is_idempotent() {
        let registry = SignalRegistry::default_signals();
        let resolver = SubjectResolver::default();
        let s = sample(3, "AI_Watermarked", "clean", Some("has\u{060c}comma"));

        let first = detect(&s, &resolver, &registry).unwrap();
        let second = detect(&s, &resolver, &registry).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_field_propagates() {
        let registry = SignalRegistry::default_signals();
        let resolver = SubjectResolver::default();
        let s = sample(9, "AI_Watermarked", "clean", None);

        assert!(matches!(
            detect(&s, &resolver, &registry),
            Err(ScanError::MissingField { id: 9, .. })
        ));
    }
}
