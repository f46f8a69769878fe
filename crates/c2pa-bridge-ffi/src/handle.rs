//! Owned engine handles

use crate::api::EngineApi;
use crate::engine::Engine;
use crate::types::{C2paBuilder, C2paReader, C2paSigner};
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::Arc;

/// Selects the engine type and release function of an [`OwnedHandle`]
pub trait HandleKind {
    type Raw;
    const NAME: &'static str;

    /// Release `raw` through the engine.
    ///
    /// # Safety
    ///
    /// `raw` must be a live handle of this kind created by the engine behind
    /// `api`, and must not be used afterwards.
    unsafe fn release(api: &EngineApi, raw: *mut Self::Raw);
}

pub struct ReaderKind;

impl HandleKind for ReaderKind {
    type Raw = C2paReader;
    const NAME: &'static str = "reader";

    unsafe fn release(api: &EngineApi, raw: *mut C2paReader) {
        // SAFETY: forwarded from the trait contract
        unsafe { (api.reader_free)(raw) }
    }
}

pub struct BuilderKind;

impl HandleKind for BuilderKind {
    type Raw = C2paBuilder;
    const NAME: &'static str = "builder";

    unsafe fn release(api: &EngineApi, raw: *mut C2paBuilder) {
        // SAFETY: forwarded from the trait contract
        unsafe { (api.builder_free)(raw) }
    }
}

pub struct SignerKind;

impl HandleKind for SignerKind {
    type Raw = C2paSigner;
    const NAME: &'static str = "signer";

    unsafe fn release(api: &EngineApi, raw: *mut C2paSigner) {
        // SAFETY: forwarded from the trait contract
        unsafe { (api.signer_free)(raw) }
    }
}

/// Exclusive owner of one engine handle
///
/// Not `Clone`; the handle is released exactly once when this is dropped.
pub struct OwnedHandle<K: HandleKind> {
    raw: NonNull<K::Raw>,
    engine: Arc<Engine>,
    _kind: PhantomData<K>,
}

pub type ReaderHandle = OwnedHandle<ReaderKind>;
pub type BuilderHandle = OwnedHandle<BuilderKind>;
pub type SignerHandle = OwnedHandle<SignerKind>;

impl<K: HandleKind> OwnedHandle<K> {
    /// Take ownership of a handle returned by an engine factory
    ///
    /// # Safety
    ///
    /// `raw` must come from a factory of `engine` for this kind and must not
    /// be owned by anything else.
    pub unsafe fn from_raw(engine: Arc<Engine>, raw: NonNull<K::Raw>) -> Self {
        tracing::debug!("created {} handle {:p}", K::NAME, raw.as_ptr());
        Self {
            raw,
            engine,
            _kind: PhantomData,
        }
    }

    pub fn as_ptr(&self) -> *mut K::Raw {
        self.raw.as_ptr()
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }
}

impl<K: HandleKind> Drop for OwnedHandle<K> {
    fn drop(&mut self) {
        tracing::debug!("releasing {} handle {:p}", K::NAME, self.raw.as_ptr());
        let raw = self.raw.as_ptr();
        // SAFETY: we own the handle and this is the only release
        self.engine.call(|api| unsafe { K::release(api, raw) });
    }
}

impl<K: HandleKind> std::fmt::Debug for OwnedHandle<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OwnedHandle<{}>({:p})", K::NAME, self.raw.as_ptr())
    }
}

// SAFETY: engine handles are not tied to the creating thread. Concurrent
// access is prevented by the owning wrapper's lock.
unsafe impl<K: HandleKind> Send for OwnedHandle<K> {}
