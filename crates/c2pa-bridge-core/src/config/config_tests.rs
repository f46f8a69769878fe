#![allow(non_snake_case)]

use super::*;
use std::io::Write;

#[test]
fn BridgeConfig___default___has_expected_values() {
    let config = BridgeConfig::default();

    assert_eq!(config.log_level, "info");
    assert!(!config.serialize_calls);
    assert!(config.library_path.is_none());
    assert!(config.settings.is_none());
}

#[test]
fn BridgeConfig___from_empty_bytes___returns_defaults() {
    let config = BridgeConfig::from_json(&[]).unwrap();

    assert_eq!(config.log_level, "info");
    assert!(!config.serialize_calls);
}

#[test]
fn BridgeConfig___from_json___parses_all_fields() {
    let json = r#"{
        "library_path": "/opt/c2pa/libc2pa_c.so",
        "serialize_calls": true,
        "log_level": "debug",
        "settings": {"format": "json", "data": "{\"verify\":{\"verify_after_sign\":false}}"}
    }"#;

    let config = BridgeConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(
        config.library_path.as_deref(),
        Some(Path::new("/opt/c2pa/libc2pa_c.so"))
    );
    assert!(config.serialize_calls);
    assert_eq!(config.log_level(), LogLevel::Debug);
    let settings = config.settings.unwrap();
    assert_eq!(settings.format, SettingsFormat::Json);
    assert!(settings.data.contains("verify_after_sign"));
}

#[test]
fn BridgeConfig___from_json_malformed___is_config_error() {
    let result = BridgeConfig::from_json(b"{library_path");

    assert!(matches!(result, Err(BridgeError::Config(_))));
}

#[test]
fn BridgeConfig___from_toml_str___parses_nested_settings() {
    let text = r#"
library_path = "libc2pa_c.dylib"
log_level = "warn"

[settings]
format = "toml"
data = "[verify]\nverify_after_sign = false\n"
"#;

    let config = BridgeConfig::from_toml_str(text).unwrap();

    assert_eq!(config.log_level(), LogLevel::Warn);
    assert_eq!(
        config.settings.map(|s| s.format),
        Some(SettingsFormat::Toml)
    );
}

#[test]
fn BridgeConfig___from_file_toml___dispatches_on_extension() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "library_path = \"engine.so\"\nserialize_calls = true").unwrap();

    let config = BridgeConfig::from_file(file.path()).unwrap();

    assert!(config.serialize_calls);
    assert_eq!(config.library_path.as_deref(), Some(Path::new("engine.so")));
}

#[test]
fn BridgeConfig___from_file_json___dispatches_on_extension() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"log_level": "trace"}}"#).unwrap();

    let config = BridgeConfig::from_file(file.path()).unwrap();

    assert_eq!(config.log_level(), LogLevel::Trace);
}

#[test]
fn BridgeConfig___from_file_unknown_extension___is_config_error() {
    let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();

    let result = BridgeConfig::from_file(file.path());

    assert!(matches!(result, Err(BridgeError::Config(_))));
}

#[test]
fn BridgeConfig___from_file_missing___is_config_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = BridgeConfig::from_file(dir.path().join("absent.toml"));

    assert!(matches!(result, Err(BridgeError::Config(_))));
}

#[test]
fn BridgeConfig___validate_without_library___fails() {
    let result = BridgeConfig::new().validate();

    assert!(matches!(result, Err(BridgeError::Config(_))));
}

#[test]
fn BridgeConfig___for_library___validates() {
    let config = BridgeConfig::for_library("libc2pa_c.so");

    assert!(config.validate().is_ok());
}

#[test]
fn BridgeConfig___with_settings___attaches_payload() {
    let config = BridgeConfig::new().with_settings(SettingsFormat::Json, "{}");

    assert_eq!(
        config.settings,
        Some(EngineSettings {
            format: SettingsFormat::Json,
            data: "{}".to_string()
        })
    );
}
