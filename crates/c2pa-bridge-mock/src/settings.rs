//! Process-wide engine settings

use crate::error::{MockError, MockResult};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::Value;

pub const DEFAULT_CLAIM_GENERATOR: &str = "c2pa-mock";

static SETTINGS: Lazy<Mutex<Value>> = Lazy::new(|| Mutex::new(Value::Null));

/// Parse and store settings; the last successful load wins
pub fn load(data: &str, format: &str) -> MockResult<()> {
    let value = match format {
        "json" => serde_json::from_str::<Value>(data)?,
        "toml" => {
            let table: toml::Table = toml::from_str(data)
                .map_err(|e| MockError::BadParam(format!("invalid toml settings: {e}")))?;
            serde_json::to_value(table)?
        }
        other => {
            return Err(MockError::NotSupported(format!(
                "settings format {other}"
            )));
        }
    };
    if !value.is_object() {
        return Err(MockError::Json("settings must be an object".to_string()));
    }
    *SETTINGS.lock() = value;
    Ok(())
}

/// Current settings as JSON; `null` until loaded
pub fn current() -> Value {
    SETTINGS.lock().clone()
}

/// Claim generator used when a manifest definition names none
pub fn claim_generator() -> String {
    SETTINGS
        .lock()
        .pointer("/builder/claim_generator")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_CLAIM_GENERATOR)
        .to_string()
}
