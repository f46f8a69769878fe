//! Raw types shared with the engine across the C ABI
//!
//! Layouts here must match the engine's `c2pa.h` exactly.

use std::ffi::{c_char, c_void};

/// Opaque engine stream
#[repr(C)]
pub struct C2paStream {
    _private: [u8; 0],
}

/// Opaque engine reader
#[repr(C)]
pub struct C2paReader {
    _private: [u8; 0],
}

/// Opaque engine builder
#[repr(C)]
pub struct C2paBuilder {
    _private: [u8; 0],
}

/// Opaque engine signer
#[repr(C)]
pub struct C2paSigner {
    _private: [u8; 0],
}

/// Opaque stream context, owned by the host and handed back to every
/// stream callback
#[repr(C)]
pub struct StreamContext {
    _private: [u8; 0],
}

/// Seek origin for [`SeekCallback`]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    Start = 0,
    Current = 1,
    End = 2,
}

/// Invalid-argument sentinel (negated `EINVAL`)
pub const INVALID_ARGUMENT: isize = -22;

/// I/O failure sentinel (negated `EIO`)
pub const IO_FAILURE: isize = -5;

/// Returned by the signer passthrough when no signature was produced
pub const SIGNER_FAILURE: isize = -1;

/// Fill up to `len` bytes at `data`; returns bytes read, 0 at EOF
pub type ReadCallback =
    unsafe extern "C" fn(context: *mut StreamContext, data: *mut u8, len: isize) -> isize;

/// Reposition the stream; returns the new absolute position
pub type SeekCallback =
    unsafe extern "C" fn(context: *mut StreamContext, offset: isize, mode: SeekMode) -> isize;

/// Write exactly `len` bytes from `data`; returns `len`
pub type WriteCallback =
    unsafe extern "C" fn(context: *mut StreamContext, data: *const u8, len: isize) -> isize;

pub type FlushCallback = unsafe extern "C" fn(context: *mut StreamContext) -> isize;

/// Sign `len` bytes at `data` into `signed_bytes` (capacity `signed_len`);
/// returns the signature length
pub type SignerCallback = unsafe extern "C" fn(
    context: *const c_void,
    data: *const u8,
    len: usize,
    signed_bytes: *mut u8,
    signed_len: usize,
) -> isize;

/// Key material for an engine-native signer
///
/// All fields are NUL-terminated strings; `ta_url` may be null.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct C2paSignerInfo {
    /// Algorithm name, e.g. `"es256"`
    pub alg: *const c_char,
    /// PEM certificate chain
    pub sign_cert: *const c_char,
    /// PEM private key
    pub private_key: *const c_char,
    /// Timestamp authority URL
    pub ta_url: *const c_char,
}
