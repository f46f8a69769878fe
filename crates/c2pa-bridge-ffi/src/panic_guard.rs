//! Panic handling for callbacks invoked by the engine
//!
//! Stream and signer callbacks run on engine stack frames. A panic must
//! never unwind through them, so every callback body runs inside
//! [`catch_panic`] and a caught panic becomes a failure sentinel.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run `f`, converting a panic into its message
///
/// The panic is logged via tracing with `site` naming the callback.
pub fn catch_panic<F, R>(site: &str, f: F) -> Result<R, String>
where
    F: FnOnce() -> R + panic::UnwindSafe,
{
    panic::catch_unwind(f).map_err(|payload| {
        let message = panic_to_string(&payload);
        tracing::error!("panic caught in {} callback: {}", site, message);
        message
    })
}

/// Run a callback body that returns a sentinel-encoded `isize`
///
/// Returns `on_panic` if the body panics.
pub fn guard_callback<F>(site: &str, on_panic: isize, f: F) -> isize
where
    F: FnOnce() -> isize,
{
    catch_panic(site, AssertUnwindSafe(f)).unwrap_or(on_panic)
}

fn panic_to_string(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("callback panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("callback panicked: {}", s)
    } else {
        "callback panicked with unknown payload".to_string()
    }
}
