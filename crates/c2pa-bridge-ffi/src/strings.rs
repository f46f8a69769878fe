//! Conversion of Rust strings for the C ABI

use c2pa_bridge_core::{BridgeError, BridgeResult};
use std::ffi::{CString, c_char};
use std::path::Path;
use std::ptr;

/// Convert to a NUL-terminated string, rejecting interior NULs
pub fn to_cstring(value: &str, what: &str) -> BridgeResult<CString> {
    CString::new(value)
        .map_err(|e| BridgeError::InvalidArgument(format!("{what} contains a NUL byte at {}", e.nul_position())))
}

/// Convert an optional value; `None` maps to no string
pub fn to_optional_cstring(value: Option<&str>, what: &str) -> BridgeResult<Option<CString>> {
    value.map(|v| to_cstring(v, what)).transpose()
}

/// Convert a filesystem path, which must be valid UTF-8
pub fn path_to_cstring(path: &Path, what: &str) -> BridgeResult<CString> {
    let text = path
        .to_str()
        .ok_or_else(|| BridgeError::InvalidArgument(format!("{what} is not valid UTF-8: {}", path.display())))?;
    to_cstring(text, what)
}

/// Pointer for an optional string, null when absent
pub fn optional_ptr(value: &Option<CString>) -> *const c_char {
    value.as_ref().map_or(ptr::null(), |s| s.as_ptr())
}
