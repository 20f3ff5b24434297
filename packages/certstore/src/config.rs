//! Store configuration
//!
//! JSON documents with per-field defaults, so an empty object is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid JSON for [`StoreConfig`]
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Limits and policies applied by the certificate service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Largest raw payload accepted by add, in bytes
    #[serde(default = "default_max_container_bytes")]
    pub max_container_bytes: usize,
    /// Reject an add when the same owner and thumbprint are already stored
    #[serde(default = "default_reject_duplicates")]
    pub reject_duplicates: bool,
}

fn default_max_container_bytes() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_reject_duplicates() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_container_bytes: default_max_container_bytes(),
            reject_duplicates: default_reject_duplicates(),
        }
    }
}

impl StoreConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded certstore configuration");
        Self::from_json_str(&json)
    }

    /// Load `path` when that file exists, defaults otherwise. Pass
    /// [`StoreConfig::default_path`] for the per-user location.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_json_file(path)
        } else {
            debug!(path = %path.display(), "no certstore configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// OS-specific location of `certstore/config.json`
    pub fn default_path() -> PathBuf {
        let config_dir = match dirs::config_dir() {
            Some(mut dir) => {
                dir.push("certstore");
                dir
            }
            None => {
                warn!("Could not determine OS config directory, using ./certstore");
                PathBuf::from("./certstore")
            }
        };
        config_dir.join("config.json")
    }

    /// Reject values the service cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_container_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_container_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
