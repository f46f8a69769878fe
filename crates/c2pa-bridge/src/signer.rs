//! Signers backed by a host callback or engine-held key material

use c2pa_bridge_core::{BridgeError, BridgeResult, ErrorKind, SigningAlg};
use c2pa_bridge_ffi::{
    C2paSignerInfo, CallbackContext, Engine, OwnedHandle, SignerHandle, optional_ptr,
    signer_passthrough, to_cstring, to_optional_cstring,
};
use parking_lot::{Mutex, MutexGuard};
use std::fmt::Display;
use std::sync::Arc;

/// Key material for an engine-native signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerInfo {
    pub alg: SigningAlg,
    /// PEM certificate chain
    pub sign_cert: String,
    /// PEM private key
    pub private_key: String,
    /// Timestamp authority URL
    pub ta_url: Option<String>,
}

impl SignerInfo {
    pub fn new(alg: SigningAlg, sign_cert: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            alg,
            sign_cert: sign_cert.into(),
            private_key: private_key.into(),
            ta_url: None,
        }
    }

    pub fn with_ta_url(mut self, url: impl Into<String>) -> Self {
        self.ta_url = Some(url.into());
        self
    }

    /// Run `f` with a borrowed C view of this info
    pub(crate) fn with_raw<R>(
        &self,
        f: impl FnOnce(&C2paSignerInfo) -> BridgeResult<R>,
    ) -> BridgeResult<R> {
        let alg = to_cstring(self.alg.as_str(), "alg")?;
        let cert = to_cstring(&self.sign_cert, "sign_cert")?;
        let key = to_cstring(&self.private_key, "private_key")?;
        let ta_url = to_optional_cstring(self.ta_url.as_deref(), "ta_url")?;
        let raw = C2paSignerInfo {
            alg: alg.as_ptr(),
            sign_cert: cert.as_ptr(),
            private_key: key.as_ptr(),
            ta_url: optional_ptr(&ta_url),
        };
        f(&raw)
    }
}

/// An engine signer
///
/// Referenced, not owned, by [`Builder`](crate::Builder) during signing.
pub struct Signer {
    // Released before the callback context it points at.
    handle: Mutex<SignerHandle>,
    alg: SigningAlg,
    callback: Option<Box<CallbackContext>>,
}

impl Signer {
    /// Signer that calls `sign` for every signature the engine needs
    ///
    /// `sign` runs synchronously on the thread that asked the engine to sign
    /// and may block.
    pub fn from_callback<F, E>(
        engine: &Arc<Engine>,
        alg: SigningAlg,
        certs: &str,
        tsa_url: Option<&str>,
        sign: F,
    ) -> BridgeResult<Self>
    where
        F: Fn(&[u8]) -> Result<Vec<u8>, E> + Send + Sync + 'static,
        E: Display,
    {
        let certs = to_cstring(certs, "certs")?;
        let tsa_url = to_optional_cstring(tsa_url, "tsa_url")?;
        let callback = CallbackContext::new(Box::new(move |data: &[u8]| {
            sign(data).map_err(|e| BridgeError::Signing(e.to_string()))
        }));
        let context = callback.as_context_ptr();

        let raw = engine.invoke_ptr(ErrorKind::Construction, |api| {
            // SAFETY: the context outlives the engine signer; see field order
            unsafe {
                (api.signer_create)(
                    context,
                    signer_passthrough,
                    alg,
                    certs.as_ptr(),
                    optional_ptr(&tsa_url),
                )
            }
        })?;

        Ok(Self {
            // SAFETY: fresh handle from c2pa_signer_create
            handle: Mutex::new(unsafe { OwnedHandle::from_raw(Arc::clone(engine), raw) }),
            alg,
            callback: Some(callback),
        })
    }

    /// Signer using key material held by the engine
    pub fn from_keys(engine: &Arc<Engine>, info: &SignerInfo) -> BridgeResult<Self> {
        let raw = info.with_raw(|raw_info| {
            engine.invoke_ptr(ErrorKind::Construction, |api| {
                // SAFETY: every string in raw_info lives until with_raw returns
                unsafe { (api.signer_from_info)(raw_info) }
            })
        })?;
        Ok(Self {
            // SAFETY: fresh handle from c2pa_signer_from_info
            handle: Mutex::new(unsafe { OwnedHandle::from_raw(Arc::clone(engine), raw) }),
            alg: info.alg,
            callback: None,
        })
    }

    pub fn alg(&self) -> SigningAlg {
        self.alg
    }

    /// Largest signature this signer can produce, in bytes
    pub fn reserve_size(&self) -> BridgeResult<usize> {
        let handle = self.handle.lock();
        let raw = handle.as_ptr();
        let size = handle.engine().invoke_status(ErrorKind::Engine, |api| {
            // SAFETY: the handle is live while locked
            unsafe { (api.signer_reserve_size)(raw) }
        })?;
        usize::try_from(size)
            .map_err(|_| BridgeError::Engine(format!("reserve size {size} does not fit in usize")))
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SignerHandle> {
        self.handle.lock()
    }

    /// Why the last callback signature failed, if it did
    pub(crate) fn take_callback_failure(&self) -> Option<String> {
        self.callback.as_ref().and_then(|cb| cb.take_failure())
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("alg", &self.alg)
            .field("callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}
