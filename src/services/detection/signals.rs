// Signal Registry
// Fixed set of detectable watermark markers, each a named containment predicate

use std::collections::HashSet;

use super::ScanError;

/// A named watermark signal: presence of `marker` as a literal substring.
#[derive(Debug, Clone)]
pub struct Signal {
    name: String,
    marker: String,
}

impl Signal {
    pub fn new(name: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// True iff the text contains this signal's marker. Total: empty text
    /// and empty-marker edge cases both return without error.
    pub fn matches(&self, text: &str) -> bool {
        !self.marker.is_empty() && text.contains(&self.marker)
    }
}

/// Ordered, read-only collection of signals. Built once per run; the only
/// extension point for new watermark markers.
#[derive(Debug, Clone)]
pub struct SignalRegistry {
    signals: Vec<Signal>,
}

impl SignalRegistry {
    /// Build a registry, rejecting empty registries and duplicate names.
    pub fn new(signals: Vec<Signal>) -> Result<Self, ScanError> {
        if signals.is_empty() {
            return Err(ScanError::Configuration(
                "signal registry must contain at least one signal".to_string(),
            ));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for signal in &signals {
            if signal.name.trim().is_empty() {
                return Err(ScanError::Configuration(
                    "signal name must not be empty".to_string(),
                ));
            }
            if !seen.insert(signal.name.as_str()) {
                return Err(ScanError::Configuration(format!(
                    "duplicate signal name: {}",
                    signal.name
                )));
            }
        }

        Ok(Self { signals })
    }

    /// The four substitution markers the watermarker inserts in place of
    /// ordinary ASCII punctuation.
    pub fn default_signals() -> Self {
        Self {
            signals: vec![
                Signal::new("zwsp", "\u{200b}"),
                Signal::new("arabic_comma", "\u{060c}"),
                Signal::new("fullwidth_period", "\u{3002}"),
                Signal::new("right_quote", "\u{2019}"),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.signals.iter().map(|s| s.name.clone()).collect()
    }
}
