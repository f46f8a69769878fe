//! Engine-side errors and the per-thread last-error slot

use std::cell::RefCell;
use thiserror::Error;

/// Failures reported by the mock engine
///
/// Display strings follow the engine convention `Tag: detail`, which the
/// bridge classifies on the tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    #[error("ManifestNotFound: {0}")]
    ManifestNotFound(String),

    #[error("ResourceNotFound: {0}")]
    ResourceNotFound(String),

    #[error("FileNotFound: {0}")]
    FileNotFound(String),

    #[error("NotSupported: {0}")]
    NotSupported(String),

    #[error("Io: {0}")]
    Io(String),

    #[error("Json: {0}")]
    Json(String),

    #[error("BadParam: {0}")]
    BadParam(String),

    #[error("NullParameter: {0}")]
    NullParameter(String),

    #[error("HashMismatch: {0}")]
    HashMismatch(String),

    #[error("CoseSignature: {0}")]
    Signature(String),

    #[error("InvalidAsset: {0}")]
    InvalidAsset(String),
}

pub type MockResult<T> = Result<T, MockError>;

impl From<std::io::Error> for MockError {
    fn from(err: std::io::Error) -> Self {
        MockError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MockError {
    fn from(err: serde_json::Error) -> Self {
        MockError::Json(err.to_string())
    }
}

impl From<zip::result::ZipError> for MockError {
    fn from(err: zip::result::ZipError) -> Self {
        MockError::BadParam(format!("invalid archive: {err}"))
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Record `err` as this thread's last error
pub fn set_last_error(err: &MockError) {
    tracing::debug!("mock engine error: {}", err);
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(err.to_string()));
}

/// Take this thread's last error, leaving the slot empty
pub fn take_last_error() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow_mut().take())
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
