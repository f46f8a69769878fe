//! Bridge configuration types

use crate::LogLevel;
use crate::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration used to load and prepare an engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Path to the engine shared library
    ///
    /// Required by `Engine::from_config`; in-process engines ignore it.
    #[serde(default)]
    pub library_path: Option<PathBuf>,

    /// Hold one engine-wide lock across every call and its error query
    ///
    /// Only needed for engines whose last-error slot is process-global
    /// rather than per thread.
    #[serde(default)]
    pub serialize_calls: bool,

    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Engine settings applied right after loading
    #[serde(default)]
    pub settings: Option<EngineSettings>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            serialize_calls: false,
            log_level: default_log_level(),
            settings: None,
        }
    }
}

impl BridgeConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration for the library at `path`
    pub fn for_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> BridgeResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Create configuration from TOML text
    pub fn from_toml_str(text: &str) -> BridgeResult<Self> {
        toml::from_str(text).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn from_file(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|e| {
            BridgeError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            Some("toml") => {
                let text = String::from_utf8(contents)
                    .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))?;
                Self::from_toml_str(&text)
            }
            other => Err(BridgeError::Config(format!(
                "unsupported configuration file extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Parsed log level
    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_name(&self.log_level)
    }

    /// Attach engine settings
    pub fn with_settings(mut self, format: SettingsFormat, data: impl Into<String>) -> Self {
        self.settings = Some(EngineSettings {
            format,
            data: data.into(),
        });
        self
    }

    /// Check the configuration is usable for loading a shared library
    pub fn validate(&self) -> BridgeResult<()> {
        match &self.library_path {
            None => Err(BridgeError::Config("library_path is not set".to_string())),
            Some(path) if path.as_os_str().is_empty() => {
                Err(BridgeError::Config("library_path is empty".to_string()))
            }
            Some(_) => Ok(()),
        }
    }
}

/// Format tag for engine settings text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsFormat {
    Json,
    Toml,
}

impl SettingsFormat {
    /// Format string passed to the engine
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsFormat::Json => "json",
            SettingsFormat::Toml => "toml",
        }
    }
}

impl std::fmt::Display for SettingsFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine settings payload, opaque to the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub format: SettingsFormat,
    pub data: String,
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "config/config_parameterized_tests.rs"]
mod config_parameterized_tests;
