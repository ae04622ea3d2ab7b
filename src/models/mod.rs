// Watermarkd Data Models
// Row, report and diff types shared by the detection services

use serde::{Deserialize, Serialize};

// ============ Dataset Rows ============

/// One dataset row: a plain text, its optional watermarked variant, and a label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Row index within the source dataset, used to address samples in diagnostics.
    pub id: i32,
    pub text_plain: String,
    /// Present only for watermarked-class rows; empty cells load as `None`.
    pub text_watermarked: Option<String>,
    pub label: String,
}

// ============ Aggregate Report ============

/// Detection rate for one (label, signal) group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRate {
    pub label: String,
    pub signal: String,
    /// Fraction of samples in the label group whose subject text contains the marker.
    pub rate: f64,
    pub sample_count: i32,
}

/// A row that was excluded from aggregation, with the reason it failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedSample {
    pub id: i32,
    pub label: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub rates: Vec<AggregateRate>,
    pub sample_count: i32,
    pub analyzed_count: i32,
    pub skipped_count: i32,
    pub skipped: Vec<SkippedSample>,
}

// ============ Codepoint Diff ============

/// One aligned codepoint pair from the diff inspector.
/// `None` marks positions past the end of the shorter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharDiff {
    pub index: i32,
    pub plain: Option<char>,
    pub watermarked: Option<char>,
}

impl CharDiff {
    pub fn is_mismatch(&self) -> bool {
        self.plain != self.watermarked
    }
}
