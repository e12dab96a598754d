//! Session configuration: the settings a driver persists between runs.
//!
//! Stored as JSON with a version field for forward compatibility.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::LabelPersistence;

/// Current configuration file format version.
pub const CONFIG_VERSION: u32 = 1;

/// Settings for constructing a labeling session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Directory numbered artifacts are written to
    #[serde(default)]
    pub output_dir: PathBuf,

    /// Whether the label survives advancing to the next pair
    #[serde(default)]
    pub label_persistence: LabelPersistence,

    /// Starting value for the output id counter
    #[serde(default = "default_counter_start")]
    pub counter_start: u64,
}

fn default_counter_start() -> u64 {
    1
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output_dir: PathBuf::new(),
            label_persistence: LabelPersistence::default(),
            counter_start: default_counter_start(),
        }
    }
}

impl SessionConfig {
    /// Create a config with defaults targeting the given output directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Load from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Deserialize)?;
        if config.version != CONFIG_VERSION {
            log::warn!(
                "config version mismatch: expected {}, got {}",
                CONFIG_VERSION,
                config.version
            );
        }
        Ok(config)
    }

    /// Save to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON serialization error
    #[error("failed to serialize config: {0}")]
    Serialize(serde_json::Error),

    /// JSON deserialization error
    #[error("failed to deserialize config: {0}")]
    Deserialize(serde_json::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.counter_start, 1);
        assert_eq!(config.label_persistence, LabelPersistence::ClearOnAdvance);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = SessionConfig::new("/data/out");
        config.label_persistence = LabelPersistence::Fixed;
        config.counter_start = 17;

        let json = config.to_json().expect("Failed to serialize");
        let loaded = SessionConfig::from_json(&json).expect("Failed to deserialize");

        assert_eq!(loaded.output_dir, PathBuf::from("/data/out"));
        assert_eq!(loaded.label_persistence, LabelPersistence::Fixed);
        assert_eq!(loaded.counter_start, 17);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded = SessionConfig::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(loaded.counter_start, 1);
        assert_eq!(loaded.output_dir, PathBuf::new());
    }

    #[test]
    fn test_file_save_load() {
        let path =
            std::env::temp_dir().join(format!("pairlab-config-{}.json", std::process::id()));

        let config = SessionConfig::new("/data/out");
        config.save_to_file(&path).expect("Failed to save");
        let loaded = SessionConfig::load_from_file(&path).expect("Failed to load");

        assert_eq!(loaded.output_dir, PathBuf::from("/data/out"));
        let _ = std::fs::remove_file(&path);
    }
}
