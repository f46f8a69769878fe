//! Global subscriber installation

use crate::reload::{ReloadHandle, level_filter};
use c2pa_bridge_core::{BridgeConfig, LogLevel};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload};

/// Install a global `fmt` subscriber at `level`
///
/// The level can later be changed with [`ReloadHandle::global`]. Returns
/// `false` if a global subscriber was already installed, in which case the
/// existing one is left in place.
pub fn init_logging(level: LogLevel) -> bool {
    let (filter, handle) = reload::Layer::<LevelFilter, _>::new(level_filter(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true));

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }
    ReloadHandle::global().install(handle, level);
    true
}

/// Install a global subscriber at the level named in `config`
pub fn init_logging_from_config(config: &BridgeConfig) -> bool {
    init_logging(config.log_level())
}

/// Install a global subscriber filtered by `RUST_LOG`
///
/// Falls back to `default_level` when `RUST_LOG` is unset or invalid. The
/// level of this subscriber is not reloadable.
pub fn init_logging_from_env(default_level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_filter(default_level).into()));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true));

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
