//! c2pa-bridge-core - Shared types for the c2pa engine bridge
//!
//! This crate provides the types every other bridge crate agrees on:
//! - [`BridgeError`] and [`ErrorKind`] for classifying engine failures
//! - [`BridgeConfig`] for loading and configuring an engine
//! - [`SigningAlg`] for selecting a signature algorithm
//! - [`BuilderState`] for tracking a manifest builder's progress

mod alg;
mod config;
mod error;
mod state;

pub use alg::SigningAlg;
pub use config::{BridgeConfig, EngineSettings, SettingsFormat};
pub use error::{BridgeError, BridgeResult, ErrorKind, MANIFEST_NOT_FOUND};
pub use state::BuilderState;

/// Log levels for the bridge's tracing output
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    /// Parse a level name as written in configuration files
    ///
    /// Unknown names fall back to `Info`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            "off" | "none" => LogLevel::Off,
            _ => LogLevel::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BridgeConfig, BridgeError, BridgeResult, BuilderState, ErrorKind, LogLevel,
        SettingsFormat, SigningAlg,
    };
}
