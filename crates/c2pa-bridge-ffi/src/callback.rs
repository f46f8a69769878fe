//! Signer callback passthrough
//!
//! The engine calls [`signer_passthrough`] with the context pointer given at
//! signer creation. The context is a boxed [`CallbackContext`] owned by the
//! host-side signer wrapper, which keeps it alive until after the engine
//! signer has been released.

use crate::panic_guard::catch_panic;
use crate::types::SIGNER_FAILURE;
use c2pa_bridge_core::BridgeResult;
use parking_lot::Mutex;
use std::ffi::c_void;
use std::panic::AssertUnwindSafe;

/// Signing function: bytes to sign in, signature out
pub type SignFn = dyn Fn(&[u8]) -> BridgeResult<Vec<u8>> + Send + Sync;

pub struct CallbackContext {
    sign: Box<SignFn>,
    last_failure: Mutex<Option<String>>,
}

impl CallbackContext {
    pub fn new(sign: Box<SignFn>) -> Box<Self> {
        Box::new(Self {
            sign,
            last_failure: Mutex::new(None),
        })
    }

    /// Pointer registered with the engine as the callback context
    pub fn as_context_ptr(&self) -> *const c_void {
        (self as *const Self).cast()
    }

    /// Take the reason the most recent signing attempt failed, if it did
    pub fn take_failure(&self) -> Option<String> {
        self.last_failure.lock().take()
    }

    fn record_failure(&self, reason: String) {
        tracing::warn!("signer callback failed: {}", reason);
        *self.last_failure.lock() = Some(reason);
    }

    /// Run the signing function and copy the signature into `out`
    ///
    /// Returns the signature length or [`SIGNER_FAILURE`].
    pub fn sign_into(&self, data: &[u8], out: &mut [u8]) -> isize {
        let outcome = catch_panic("signer", AssertUnwindSafe(|| (self.sign)(data)));
        let signature = match outcome {
            Ok(Ok(signature)) => signature,
            Ok(Err(err)) => {
                self.record_failure(err.message().to_string());
                return SIGNER_FAILURE;
            }
            Err(panic) => {
                self.record_failure(panic);
                return SIGNER_FAILURE;
            }
        };

        if signature.len() > out.len() {
            self.record_failure(format!(
                "signature of {} bytes exceeds reserved {} bytes",
                signature.len(),
                out.len()
            ));
            return SIGNER_FAILURE;
        }

        out[..signature.len()].copy_from_slice(&signature);
        tracing::trace!("signer produced {} bytes", signature.len());
        isize::try_from(signature.len()).unwrap_or(SIGNER_FAILURE)
    }
}

/// Signer callback registered with the engine
///
/// # Safety
///
/// `context` must be the pointer of a live [`CallbackContext`]; `data` must
/// hold `len` readable bytes and `signed_bytes` `signed_len` writable bytes.
pub unsafe extern "C" fn signer_passthrough(
    context: *const c_void,
    data: *const u8,
    len: usize,
    signed_bytes: *mut u8,
    signed_len: usize,
) -> isize {
    // SAFETY: context registered by the signer wrapper
    let Some(ctx) = (unsafe { context.cast::<CallbackContext>().as_ref() }) else {
        return SIGNER_FAILURE;
    };
    if (data.is_null() && len > 0) || (signed_bytes.is_null() && signed_len > 0) {
        return SIGNER_FAILURE;
    }
    let input: &[u8] = if len == 0 {
        &[]
    } else {
        // SAFETY: the engine provides `len` readable bytes
        unsafe { std::slice::from_raw_parts(data, len) }
    };
    let out: &mut [u8] = if signed_len == 0 {
        &mut []
    } else {
        // SAFETY: the engine provides `signed_len` writable bytes
        unsafe { std::slice::from_raw_parts_mut(signed_bytes, signed_len) }
    };
    ctx.sign_into(input, out)
}
