//! Allocation of buffers handed to the host, with live counters

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ffi::{CString, c_char};
use std::sync::atomic::{AtomicIsize, Ordering};

static BYTE_BUFFERS: Lazy<Mutex<HashMap<usize, Box<[u8]>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

pub(crate) static LIVE_STRINGS: AtomicIsize = AtomicIsize::new(0);
pub(crate) static LIVE_READERS: AtomicIsize = AtomicIsize::new(0);
pub(crate) static LIVE_BUILDERS: AtomicIsize = AtomicIsize::new(0);
pub(crate) static LIVE_SIGNERS: AtomicIsize = AtomicIsize::new(0);
pub(crate) static LIVE_STREAMS: AtomicIsize = AtomicIsize::new(0);

/// Number of engine objects currently held by the host
///
/// Counts are signed so a double release shows up as a negative value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiveCounts {
    pub strings: isize,
    pub byte_buffers: isize,
    pub readers: isize,
    pub builders: isize,
    pub signers: isize,
    pub streams: isize,
}

pub fn live_counts() -> LiveCounts {
    LiveCounts {
        strings: LIVE_STRINGS.load(Ordering::SeqCst),
        byte_buffers: BYTE_BUFFERS.lock().len() as isize,
        readers: LIVE_READERS.load(Ordering::SeqCst),
        builders: LIVE_BUILDERS.load(Ordering::SeqCst),
        signers: LIVE_SIGNERS.load(Ordering::SeqCst),
        streams: LIVE_STREAMS.load(Ordering::SeqCst),
    }
}

pub(crate) fn retain(counter: &AtomicIsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn release(counter: &AtomicIsize) {
    counter.fetch_sub(1, Ordering::SeqCst);
}

/// Hand a string to the host; interior NULs are dropped
pub(crate) fn alloc_string(value: impl Into<Vec<u8>>) -> *mut c_char {
    let mut bytes = value.into();
    bytes.retain(|b| *b != 0);
    match CString::new(bytes) {
        Ok(s) => {
            retain(&LIVE_STRINGS);
            s.into_raw()
        }
        Err(_) => std::ptr::null_mut(),
    }
}

/// # Safety
///
/// `ptr` must come from [`alloc_string`] and not have been freed.
pub(crate) unsafe fn free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: forwarded from the caller
    drop(unsafe { CString::from_raw(ptr) });
    release(&LIVE_STRINGS);
}

/// Hand a byte buffer to the host; returns the pointer and its length
pub(crate) fn alloc_bytes(bytes: Vec<u8>) -> (*const u8, i64) {
    let boxed = bytes.into_boxed_slice();
    let len = boxed.len() as i64;
    let ptr = boxed.as_ptr();
    BYTE_BUFFERS.lock().insert(ptr as usize, boxed);
    (ptr, len)
}

/// Returns `false` if `ptr` was not a live buffer
pub(crate) fn free_bytes(ptr: *const u8) -> bool {
    BYTE_BUFFERS.lock().remove(&(ptr as usize)).is_some()
}
