// Aggregation Logic
// Groups per-row detection results by observed label and computes
// mean detection rates per signal

use std::collections::BTreeMap;

use tracing::warn;

use crate::models::{AggregateRate, Sample, ScanReport, SkippedSample};

use super::engine::detect;
use super::resolver::SubjectResolver;
use super::signals::SignalRegistry;
use super::ScanError;

/// What to do when a row cannot be resolved.
/// Skipped rows are always surfaced in the report; proceeding silently
/// with the wrong subject column is not an option.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FailurePolicy {
    Abort,
    SkipAndReport,
}

impl FailurePolicy {
    pub fn from_str(val: &str) -> Self {
        match val.trim().to_lowercase().as_str() {
            "abort" => Self::Abort,
            _ => Self::SkipAndReport,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::SkipAndReport => "skip",
        }
    }
}

#[derive(Debug, Default)]
struct GroupTally {
    sample_count: i32,
    hits: BTreeMap<String, i32>,
}

/// Aggregate detection results over all samples.
///
/// Group keys come from observed labels, so an unexpected-but-recognized
/// label surfaces as its own group instead of being dropped. Labels with
/// zero analyzed samples never appear: a rate over an empty group is
/// undefined, not 0.0. Output rows are sorted by label, then signal, so
/// repeated runs over the same input produce identical reports.
pub fn aggregate_samples(
    samples: &[Sample],
    resolver: &SubjectResolver,
    registry: &SignalRegistry,
    policy: FailurePolicy,
) -> Result<ScanReport, ScanError> {
    let mut groups: BTreeMap<String, GroupTally> = BTreeMap::new();
    let mut skipped: Vec<SkippedSample> = Vec::new();

    for sample in samples {
        match detect(sample, resolver, registry) {
            Ok(results) => {
                let tally = groups.entry(sample.label.clone()).or_default();
                tally.sample_count += 1;
                for (name, hit) in results {
                    *tally.hits.entry(name).or_insert(0) += i32::from(hit);
                }
            }
            Err(err) => {
                if policy == FailurePolicy::Abort {
                    return Err(err);
                }
                warn!(sample_id = sample.id, label = %sample.label, error = %err, "skipping sample");
                skipped.push(SkippedSample {
                    id: sample.id,
                    label: sample.label.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let mut rates = Vec::new();
    for (label, tally) in &groups {
        for name in registry.names() {
            let hit_count = tally.hits.get(&name).copied().unwrap_or(0);
            let rate = hit_count as f64 / tally.sample_count as f64;
            rates.push(AggregateRate {
                label: label.clone(),
                signal: name,
                rate: (rate * 10000.0).round() / 10000.0,
                sample_count: tally.sample_count,
            });
        }
    }
    rates.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.signal.cmp(&b.signal)));

    let analyzed_count = groups.values().map(|t| t.sample_count).sum::<i32>();

    Ok(ScanReport {
        rates,
        sample_count: samples.len() as i32,
        analyzed_count,
        skipped_count: skipped.len() as i32,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_sample(id: i32, text: &str) -> Sample {
        Sample {
            id,
            text_plain: text.to_string(),
            text_watermarked: None,
            label: "AI_Plain".to_string(),
        }
    }

    fn marked_sample(id: i32, plain: &str, watermarked: &str) -> Sample {
        Sample {
            id,
            text_plain: plain.to_string(),
            text_watermarked: Some(watermarked.to_string()),
            label: "AI_Watermarked".to_string(),
        }
    }

    fn rate_of(report: &ScanReport, label: &str, signal: &str) -> Option<f64> {
        report
            .rates
            .iter()
            .find(|r| r.label == label && r.signal == signal)
            .map(|r| r.rate)
    }

    #[test]
    fn test_synthetic_dataset_rates() {
        let samples = vec![
            plain_sample(0, "clean one."),
            plain_sample(1, "clean two."),
            plain_sample(2, "clean three."),
            marked_sample(3, "clean", "marked\u{200b}one"),
            marked_sample(4, "clean", "marked\u{200b}two"),
        ];
        let report = aggregate_samples(
            &samples,
            &SubjectResolver::default(),
            &SignalRegistry::default_signals(),
            FailurePolicy::Abort,
        )
        .unwrap();

        assert_eq!(rate_of(&report, "AI_Watermarked", "zwsp"), Some(1.0));
        assert_eq!(rate_of(&report, "AI_Plain", "zwsp"), Some(0.0));
        assert_eq!(report.analyzed_count, 5);
        assert_eq!(report.skipped_count, 0);
    }

    #[test]
    fn test_marker_in_plain_column_does_not_leak() {
        // Root-defect regression: the plain column of watermarked rows
        // carries a marker, but the rate must come from the watermarked column.
        let samples = vec![marked_sample(0, "poisoned\u{200b}plain", "clean watermarked")];
        let report = aggregate_samples(
            &samples,
            &SubjectResolver::default(),
            &SignalRegistry::default_signals(),
            FailurePolicy::Abort,
        )
        .unwrap();
        assert_eq!(rate_of(&report, "AI_Watermarked", "zwsp"), Some(0.0));

        // Swapping which column is "correct" for the label flips the rate,
        // proving subject selection lives in the resolver.
        let swapped = SubjectResolver::new(
            vec!["AI_Plain".to_string()],
            vec!["AI_Watermarked".to_string()],
        )
        .unwrap();
        let report = aggregate_samples(
            &samples,
            &swapped,
            &SignalRegistry::default_signals(),
            FailurePolicy::Abort,
        )
        .unwrap();
        assert_eq!(rate_of(&report, "AI_Watermarked", "zwsp"), Some(1.0));
    }

    #[test]
    fn test_empty_group_is_omitted() {
        let samples = vec![plain_sample(0, "only plain rows here.")];
        let report = aggregate_samples(
            &samples,
            &SubjectResolver::default(),
            &SignalRegistry::default_signals(),
            FailurePolicy::Abort,
        )
        .unwrap();
        assert!(report.rates.iter().all(|r| r.label == "AI_Plain"));
        assert!(report.rates.iter().all(|r| r.rate.is_finite()));
    }

    #[test]
    fn test_skip_policy_reports_bad_rows() {
        let mut bad = marked_sample(1, "clean", "ignored");
        bad.text_watermarked = None;
        let samples = vec![plain_sample(0, "fine."), bad];

        let report = aggregate_samples(
            &samples,
            &SubjectResolver::default(),
            &SignalRegistry::default_signals(),
            FailurePolicy::SkipAndReport,
        )
        .unwrap();
        assert_eq!(report.sample_count, 2);
        assert_eq!(report.analyzed_count, 1);
        assert_eq!(report.skipped_count, 1);
        assert_eq!(report.skipped[0].id, 1);
    }

    #[test]
    fn test_abort_policy_stops_on_first_bad_row() {
        let samples = vec![Sample {
            id: 0,
            text_plain: "text".to_string(),
            text_watermarked: None,
            label: "Mystery".to_string(),
        }];
        let result = aggregate_samples(
            &samples,
            &SubjectResolver::default(),
            &SignalRegistry::default_signals(),
            FailurePolicy::Abort,
        );
        assert!(matches!(result, Err(ScanError::UnknownLabel { id: 0, .. })));
    }

    #[test]
    fn test_empty_dataset_yields_empty_report() {
        let report = aggregate_samples(
            &[],
            &SubjectResolver::default(),
            &SignalRegistry::default_signals(),
            FailurePolicy::Abort,
        )
        .unwrap();
        assert!(report.rates.is_empty());
        assert_eq!(report.sample_count, 0);
    }
}
