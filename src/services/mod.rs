// Watermarkd Core Services
// Dataset loading, configuration, and watermark signal detection

pub mod dataset;
pub mod config_store;
pub mod detection;

pub use dataset::*;
pub use config_store::*;

// Re-export detection module items
pub use detection::{
    aggregate_samples,
    compare_codepoints,
    detect,
    detect_in_text,
    first_divergence,
    FailurePolicy,
    ScanError,
    Signal,
    SignalRegistry,
    SubjectResolver,
};
