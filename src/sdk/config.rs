//! SDK configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// SDK configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// API key generated from the developer portal
    pub api_key: Option<String>,
    /// Logging settings
    pub logging: LoggingSettings,
    /// USB bridge settings
    pub usb: UsbSettings,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            logging: LoggingSettings::default(),
            usb: UsbSettings::default(),
        }
    }
}

/// Logging-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is not set
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// USB bridge settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbSettings {
    /// Maximum bytes held back while waiting for the rest of a packet
    pub max_pending_bytes: usize,
}

impl Default for UsbSettings {
    fn default() -> Self {
        Self {
            max_pending_bytes: 256,
        }
    }
}

/// Get the SDK data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("fit", "kinetic", "KineticSDK")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("kinetic.toml")
}

/// Load configuration from the default location.
pub fn load_config() -> Result<SdkConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from a file; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<SdkConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(SdkConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save configuration to a file.
pub fn save_config_to(path: &Path, config: &SdkConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
