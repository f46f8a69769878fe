#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case(r#"{"log_level": "trace"}"#, LogLevel::Trace)]
#[test_case(r#"{"log_level": "debug"}"#, LogLevel::Debug)]
#[test_case(r#"{"log_level": "info"}"#, LogLevel::Info)]
#[test_case(r#"{"log_level": "warn"}"#, LogLevel::Warn)]
#[test_case(r#"{"log_level": "error"}"#, LogLevel::Error)]
#[test_case(r#"{"log_level": "off"}"#, LogLevel::Off)]
#[test_case(r#"{}"#, LogLevel::Info)]
fn BridgeConfig___log_level___parses_json_name(json: &str, expected: LogLevel) {
    let config = BridgeConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.log_level(), expected);
}

#[test_case(SettingsFormat::Json, "json")]
#[test_case(SettingsFormat::Toml, "toml")]
fn SettingsFormat___as_str___is_engine_tag(format: SettingsFormat, expected: &str) {
    assert_eq!(format.as_str(), expected);
    assert_eq!(format.to_string(), expected);
}

#[test_case(r#"{"serialize_calls": "yes"}"#)]
#[test_case(r#"{"settings": {"format": "yaml", "data": ""}}"#)]
#[test_case(r#"{"library_path": 7}"#)]
fn BridgeConfig___from_json_wrong_types___rejected(json: &str) {
    let result = BridgeConfig::from_json(json.as_bytes());

    assert!(matches!(result, Err(BridgeError::Config(_))));
}
