//! Loading the engine from a shared library

use c2pa_bridge::{BridgeConfig, Engine, ErrorKind};

#[test]
fn test_missing_library_is_library_load_error() {
    let err = Engine::load("/nonexistent/libc2pa_c.so").expect_err("Missing library should fail");

    assert_eq!(err.kind(), ErrorKind::LibraryLoad);
}

#[cfg(target_os = "linux")]
#[test]
fn test_library_without_engine_symbols_is_symbol_not_found() {
    let err = Engine::load("libc.so.6").expect_err("libc is not an engine");

    assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
    assert!(err.message().contains("c2pa_"));
}

#[test]
fn test_config_without_library_path_is_config_error() {
    let err = Engine::from_config(&BridgeConfig::default()).expect_err("No path should fail");

    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_config_with_missing_library_is_library_load_error() {
    let config = BridgeConfig::for_library("/nonexistent/libc2pa_c.so");

    let err = Engine::from_config(&config).expect_err("Missing library should fail");

    assert_eq!(err.kind(), ErrorKind::LibraryLoad);
}
