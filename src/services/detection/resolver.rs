// Row Resolver
// Selects which text field is the detection subject for a labeled row.
// Subject selection is a single testable function instead of a branch
// repeated at every call site; unknown labels fail instead of defaulting.

use std::collections::HashSet;

use crate::models::Sample;

use super::ScanError;

pub const DEFAULT_WATERMARKED_LABEL: &str = "AI_Watermarked";
pub const DEFAULT_PLAIN_LABEL: &str = "AI_Plain";

#[derive(Debug, Clone)]
pub struct SubjectResolver {
    watermarked_labels: HashSet<String>,
    plain_labels: HashSet<String>,
}

impl Default for SubjectResolver {
    fn default() -> Self {
        Self {
            watermarked_labels: HashSet::from([DEFAULT_WATERMARKED_LABEL.to_string()]),
            plain_labels: HashSet::from([DEFAULT_PLAIN_LABEL.to_string()]),
        }
    }
}

impl SubjectResolver {
    /// Build a resolver from explicit label sets. A label listed in both
    /// sets has no unambiguous subject column and is rejected.
    pub fn new(
        watermarked_labels: impl IntoIterator<Item = String>,
        plain_labels: impl IntoIterator<Item = String>,
    ) -> Result<Self, ScanError> {
        let watermarked_labels: HashSet<String> = watermarked_labels.into_iter().collect();
        let plain_labels: HashSet<String> = plain_labels.into_iter().collect();

        if let Some(overlap) = watermarked_labels.intersection(&plain_labels).next() {
            return Err(ScanError::Configuration(format!(
                "label `{}` is declared both watermarked and plain",
                overlap
            )));
        }
        if watermarked_labels.is_empty() && plain_labels.is_empty() {
            return Err(ScanError::Configuration(
                "resolver needs at least one recognized label".to_string(),
            ));
        }

        Ok(Self {
            watermarked_labels,
            plain_labels,
        })
    }

    /// Pick the subject text for a sample: the watermarked column for
    /// watermarked-class labels, the plain column otherwise.
    /// Unrecognized labels and a missing watermarked column both fail.
    pub fn resolve_subject<'a>(&self, sample: &'a Sample) -> Result<&'a str, ScanError> {
        if self.watermarked_labels.contains(&sample.label) {
            return sample
                .text_watermarked
                .as_deref()
                .ok_or_else(|| ScanError::MissingField {
                    id: sample.id,
                    label: sample.label.clone(),
                    field: "text_watermarked",
                });
        }

        if self.plain_labels.contains(&sample.label) {
            return Ok(&sample.text_plain);
        }

        Err(ScanError::UnknownLabel {
            id: sample.id,
            label: sample.label.clone(),
        })
    }
}
