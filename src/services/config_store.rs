// Configuration Storage Service
// Handles scan config file read/write with sensible defaults

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::dataset::DatasetColumns;
use super::detection::{DEFAULT_PLAIN_LABEL, DEFAULT_WATERMARKED_LABEL};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub version: String,
    #[serde(default)]
    pub dataset: DatasetColumns,
    #[serde(default)]
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfig {
    #[serde(default = "default_watermarked_labels")]
    pub watermarked_labels: Vec<String>,
    #[serde(default = "default_plain_labels")]
    pub plain_labels: Vec<String>,
    /// "abort" or "skip"; rows that fail to resolve are reported either way.
    #[serde(default = "default_failure_policy")]
    pub failure_policy: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            watermarked_labels: default_watermarked_labels(),
            plain_labels: default_plain_labels(),
            failure_policy: default_failure_policy(),
        }
    }
}

fn default_watermarked_labels() -> Vec<String> {
    vec![DEFAULT_WATERMARKED_LABEL.to_string()]
}
fn default_plain_labels() -> Vec<String> {
    vec![DEFAULT_PLAIN_LABEL.to_string()]
}
fn default_failure_policy() -> String { "skip".to_string() }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("watermarkd"))
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file, falling back to defaults when absent
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }
}
