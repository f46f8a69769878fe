//! Global subscriber installation
//!
//! Installing a global subscriber is a once-per-process operation, so the
//! whole sequence lives in one test.

use c2pa_bridge_core::BridgeConfig;
use c2pa_bridge_logging::{
    LogLevel, ReloadHandle, init_logging, init_logging_from_config, init_logging_from_env,
};

#[test]
fn test_init_logging_installs_once_and_reloads() {
    assert!(init_logging(LogLevel::Warn));
    assert!(ReloadHandle::global().is_installed());
    assert_eq!(ReloadHandle::global().level(), Some(LogLevel::Warn));
    assert!(!tracing::enabled!(tracing::Level::INFO));

    ReloadHandle::global()
        .set_level(LogLevel::Debug)
        .expect("Should reload after init");
    assert!(tracing::enabled!(tracing::Level::DEBUG));

    assert!(!init_logging(LogLevel::Trace));
    assert!(!init_logging_from_env(LogLevel::Info));
    assert!(!init_logging_from_config(&BridgeConfig::default()));
    assert_eq!(ReloadHandle::global().level(), Some(LogLevel::Debug));
}
