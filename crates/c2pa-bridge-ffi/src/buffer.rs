//! Engine-allocated buffers
//!
//! Both types follow the "engine allocates, host frees" pattern: the host
//! copies the contents into Rust-owned memory and the engine allocation is
//! released exactly once, on drop, through the engine's own free function.

use crate::api::EngineApi;
use std::ffi::{CStr, c_char};
use std::ptr::NonNull;

/// NUL-terminated string owned by the engine
pub struct EngineString<'a> {
    api: &'a EngineApi,
    ptr: NonNull<c_char>,
}

impl<'a> EngineString<'a> {
    /// Take ownership of a string returned by the engine
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a string allocated by the engine behind `api`
    /// that has not been freed and is not owned elsewhere.
    pub unsafe fn from_raw(api: &'a EngineApi, ptr: *mut c_char) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { api, ptr })
    }

    /// Copy the contents, replacing invalid UTF-8
    pub fn to_string_lossy(&self) -> String {
        // SAFETY: ptr is a live NUL-terminated engine string for our lifetime
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }
}

impl Drop for EngineString<'_> {
    fn drop(&mut self) {
        // SAFETY: we own the allocation and release it once
        unsafe { (self.api.string_free)(self.ptr.as_ptr()) }
    }
}

/// Byte buffer returned through a `*mut *const u8` out-parameter
pub struct ManifestBytes<'a> {
    api: &'a EngineApi,
    ptr: *const u8,
    len: usize,
}

impl<'a> ManifestBytes<'a> {
    /// Take ownership of an out-parameter buffer
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to `len` readable bytes allocated by the
    /// engine behind `api` and not yet freed.
    pub unsafe fn from_raw(api: &'a EngineApi, ptr: *const u8, len: usize) -> Self {
        Self { api, ptr, len }
    }

    pub fn len(&self) -> usize {
        if self.ptr.is_null() { 0 } else { self.len }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        if self.ptr.is_null() || self.len == 0 {
            &[]
        } else {
            // SAFETY: guaranteed by the `from_raw` contract
            unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
        }
    }

    /// Copy into a `Vec` and release the engine allocation
    pub fn into_vec(self) -> Vec<u8> {
        self.as_slice().to_vec()
    }
}

impl Drop for ManifestBytes<'_> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            // SAFETY: we own the allocation and release it once
            unsafe { (self.api.manifest_bytes_free)(self.ptr) }
        }
    }
}
