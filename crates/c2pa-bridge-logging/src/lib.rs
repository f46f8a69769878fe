//! c2pa-bridge-logging - Tracing setup for c2pa-bridge
//!
//! This crate provides:
//! - [`init_logging`] to install a `fmt` subscriber with a reloadable level
//! - [`init_logging_from_env`] to honor `RUST_LOG`
//! - [`init_logging_from_config`] to use the level of a `BridgeConfig`
//! - [`ReloadHandle`] for changing the level at runtime

mod init;
mod reload;

pub use c2pa_bridge_core::LogLevel;
pub use init::{init_logging, init_logging_from_config, init_logging_from_env};
pub use reload::{ReloadHandle, level_filter};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, ReloadHandle, init_logging};
}
