//! Retrieval of the engine's last-error message

use crate::api::EngineApi;
use crate::buffer::EngineString;
use c2pa_bridge_core::{BridgeError, ErrorKind};

/// Message used when the engine signals failure but leaves no text
pub const UNKNOWN_ENGINE_ERROR: &str = "unknown engine error";

/// Reads the engine's last-error slot
///
/// Must be consulted immediately after the failing call, with no other
/// engine call in between, or the slot may have been overwritten.
pub struct ErrorChannel<'a> {
    api: &'a EngineApi,
}

impl<'a> ErrorChannel<'a> {
    pub fn new(api: &'a EngineApi) -> Self {
        Self { api }
    }

    /// Copy out and release the current error text, if any
    pub fn take(&self) -> Option<String> {
        // SAFETY: c2pa_error returns null or an owned engine string
        let raw = unsafe { (self.api.error)() };
        // SAFETY: the returned pointer is handed to us for release
        let message = unsafe { EngineString::from_raw(self.api, raw) }?.to_string_lossy();
        if message.is_empty() { None } else { Some(message) }
    }

    /// Build the structured error for a failed call
    pub fn failure(&self, fallback: ErrorKind) -> BridgeError {
        let message = self
            .take()
            .unwrap_or_else(|| UNKNOWN_ENGINE_ERROR.to_string());
        let err = BridgeError::from_engine(message, fallback);
        tracing::debug!(kind = %err.kind(), "engine call failed: {}", err.message());
        err
    }
}
