//! # Migration Configuration
//!
//! YAML configuration for model export runs.
//!
//! A configuration names the store to read, the [`ExportConfig`] toggles
//! and where the snapshot goes. Paths may reference environment variables
//! as `${VAR}` or `${VAR:-default}`.
//!
//! ```yaml
//! version: "1.0"
//! name: staging
//! settings:
//!   log_level: debug
//! store:
//!   path: "${DATA_DIR:-/var/lib/model}/store"
//! export:
//!   skip_status_history: true
//! output:
//!   format: yaml
//!   path: snapshot.yaml
//! ```

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub use model_export::ExportConfig;

pub mod parser;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Environment variable not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Optional run name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Global settings
    #[serde(default, skip_serializing_if = "Settings::is_default")]
    pub settings: Settings,

    /// Store to export from
    #[serde(default)]
    pub store: StoreConfig,

    /// Export toggles
    #[serde(default)]
    pub export: ExportConfig,

    /// Where and how to write the snapshot
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: parser::SUPPORTED_VERSION.to_string(),
            name: None,
            description: None,
            settings: Settings::default(),
            store: StoreConfig::default(),
            export: ExportConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Default log level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Settings {
    /// Check if settings are default (all None)
    fn is_default(&self) -> bool {
        self == &Settings::default()
    }
}

/// Store location
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path of a sled store; the CLI picks a per-user default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Use a throwaway in-memory store
    #[serde(default)]
    pub in_memory: bool,
}

/// Snapshot output
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Serialization format
    #[serde(default)]
    pub format: OutputFormat,

    /// File to write; standard output when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Snapshot serialization format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown output format '{}', expected json or yaml",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}
