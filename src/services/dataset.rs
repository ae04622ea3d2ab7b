// Dataset Loading Service
// Reads a CSV dataset of text samples into in-memory rows

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::Sample;

/// Column names to read from the dataset file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetColumns {
    #[serde(default = "default_text_column")]
    pub text: String,
    #[serde(default = "default_watermarked_column")]
    pub watermarked: String,
    #[serde(default = "default_label_column")]
    pub label: String,
}

impl Default for DatasetColumns {
    fn default() -> Self {
        Self {
            text: default_text_column(),
            watermarked: default_watermarked_column(),
            label: default_label_column(),
        }
    }
}

fn default_text_column() -> String { "Text".to_string() }
fn default_watermarked_column() -> String { "Text_watermarked".to_string() }
fn default_label_column() -> String { "Label".to_string() }

/// Load samples from a CSV file.
///
/// The plain-text column is required. The watermarked column is optional;
/// empty cells load as `None`. Rows missing a label value take
/// `fallback_label` — source files often carry no label column at all and
/// are labeled as a whole.
pub fn load_samples(
    path: &Path,
    columns: &DatasetColumns,
    fallback_label: Option<&str>,
) -> Result<Vec<Sample>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from {}", path.display()))?
        .clone();

    let text_idx = headers
        .iter()
        .position(|h| h == columns.text)
        .with_context(|| format!("dataset has no `{}` column", columns.text))?;
    let watermarked_idx = headers.iter().position(|h| h == columns.watermarked);
    let label_idx = headers.iter().position(|h| h == columns.label);

    if label_idx.is_none() && fallback_label.is_none() {
        bail!(
            "dataset has no `{}` column and no fallback label was given",
            columns.label
        );
    }

    let mut samples = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("failed to read row {} of {}", row, path.display()))?;

        let text_plain = record.get(text_idx).unwrap_or("").to_string();

        let text_watermarked = watermarked_idx
            .and_then(|idx| record.get(idx))
            .filter(|cell| !cell.is_empty())
            .map(|cell| cell.to_string());

        let label = label_idx
            .and_then(|idx| record.get(idx))
            .filter(|cell| !cell.is_empty())
            .or(fallback_label)
            .with_context(|| format!("row {} has an empty label and no fallback was given", row))?
            .to_string();

        samples.push(Sample {
            id: row as i32,
            text_plain,
            text_watermarked,
            label,
        });
    }

    info!(rows = samples.len(), path = %path.display(), "dataset loaded");
    Ok(samples)
}
