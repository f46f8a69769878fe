//! Manifest builder

use crate::signer::Signer;
use crate::util::{create_file, format_from_path, open_file};
use c2pa_bridge_core::{BridgeError, BridgeResult, BuilderState, ErrorKind};
use c2pa_bridge_ffi::{
    BuilderHandle, C2paBuilder, Engine, EngineApi, OwnedHandle, ReadSeek, StreamBridge, WriteSeek,
    to_cstring,
};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;
use std::ptr;
use std::sync::Arc;

struct BuilderInner {
    handle: BuilderHandle,
    state: BuilderState,
}

impl BuilderInner {
    fn advance(&mut self, next: BuilderState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "builder cannot move from {} to {next}",
            self.state
        );
        self.state = next;
    }
}

/// Accumulates a manifest definition, resources and ingredients, then signs
///
/// Mutators take `&mut self`; signing, archiving and placeholder generation
/// take `&self` and serialize on an internal lock. The engine handle stays
/// usable after any of them, and [`Builder::state`] records the last one
/// that succeeded.
pub struct Builder {
    inner: Mutex<BuilderInner>,
    engine: Arc<Engine>,
}

impl Builder {
    fn from_raw_handle(engine: &Arc<Engine>, handle: BuilderHandle, state: BuilderState) -> Self {
        Self {
            inner: Mutex::new(BuilderInner { handle, state }),
            engine: Arc::clone(engine),
        }
    }

    /// Builder for the manifest definition `manifest_json`
    pub fn from_json(engine: &Arc<Engine>, manifest_json: &str) -> BridgeResult<Self> {
        let json = to_cstring(manifest_json, "manifest_json")?;
        let raw = engine.invoke_ptr(ErrorKind::Construction, |api| {
            // SAFETY: json is valid for the call
            unsafe { (api.builder_from_json)(json.as_ptr()) }
        })?;
        // SAFETY: fresh handle from c2pa_builder_from_json
        let handle = unsafe { OwnedHandle::from_raw(Arc::clone(engine), raw) };
        Ok(Self::from_raw_handle(engine, handle, BuilderState::Empty))
    }

    /// Restore a builder from an archive written by [`Builder::to_archive`]
    pub fn from_archive<R: Read + Seek>(engine: &Arc<Engine>, source: &mut R) -> BridgeResult<Self> {
        let mut bridge = StreamBridge::reader(engine, source as &mut dyn ReadSeek)?;
        let stream = bridge.as_ptr();
        let raw = engine
            .invoke_ptr(ErrorKind::Construction, |api| {
                // SAFETY: the stream is live for the call
                unsafe { (api.builder_from_archive)(stream) }
            })
            .map_err(|err| bridge.attribute(err))?;
        // SAFETY: fresh handle from c2pa_builder_from_archive
        let handle = unsafe { OwnedHandle::from_raw(Arc::clone(engine), raw) };
        Ok(Self::from_raw_handle(engine, handle, BuilderState::Composing))
    }

    pub fn from_archive_file(engine: &Arc<Engine>, path: impl AsRef<Path>) -> BridgeResult<Self> {
        let mut file = BufReader::new(open_file(path.as_ref())?);
        Self::from_archive(engine, &mut file)
    }

    pub fn state(&self) -> BuilderState {
        self.inner.lock().state
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    fn inner_mut(&mut self) -> &mut BuilderInner {
        self.inner.get_mut()
    }

    /// Run a status call that adds content, advancing to `Composing`
    fn compose(
        &mut self,
        mut bridge: Option<&mut StreamBridge<'_>>,
        f: impl FnOnce(&EngineApi, *mut C2paBuilder) -> i64,
    ) -> BridgeResult<()> {
        let engine = Arc::clone(&self.engine);
        let inner = self.inner_mut();
        let raw = inner.handle.as_ptr();
        let result = engine.invoke_status(ErrorKind::Engine, |api| f(api, raw));
        if let Err(err) = result {
            return Err(match bridge.as_deref_mut() {
                Some(bridge) => bridge.attribute(err),
                None => err,
            });
        }
        inner.advance(BuilderState::Composing);
        Ok(())
    }

    /// Attach a binary resource, such as a thumbnail, under `uri`
    pub fn add_resource<R: Read + Seek>(&mut self, uri: &str, source: &mut R) -> BridgeResult<()> {
        let uri_c = to_cstring(uri, "uri")?;
        let engine = Arc::clone(&self.engine);
        let mut bridge = StreamBridge::reader(&engine, source as &mut dyn ReadSeek)?;
        let stream = bridge.as_ptr();
        self.compose(Some(&mut bridge), |api, raw| {
            // SAFETY: builder and stream are live for the call
            i64::from(unsafe { (api.builder_add_resource)(raw, uri_c.as_ptr(), stream) })
        })
    }

    pub fn add_resource_file(&mut self, uri: &str, path: impl AsRef<Path>) -> BridgeResult<()> {
        let mut file = BufReader::new(open_file(path.as_ref())?);
        self.add_resource(uri, &mut file)
    }

    /// Add an ingredient described by `ingredient_json`, read from `source`
    pub fn add_ingredient<R: Read + Seek>(
        &mut self,
        ingredient_json: &str,
        format: &str,
        source: &mut R,
    ) -> BridgeResult<()> {
        let json = to_cstring(ingredient_json, "ingredient_json")?;
        let format = to_cstring(format, "format")?;
        let engine = Arc::clone(&self.engine);
        let mut bridge = StreamBridge::reader(&engine, source as &mut dyn ReadSeek)?;
        let stream = bridge.as_ptr();
        self.compose(Some(&mut bridge), |api, raw| {
            // SAFETY: builder, strings and stream are live for the call
            i64::from(unsafe {
                (api.builder_add_ingredient)(raw, json.as_ptr(), format.as_ptr(), stream)
            })
        })
    }

    /// Add the file at `path` as an ingredient; the format is its extension
    pub fn add_ingredient_file(
        &mut self,
        ingredient_json: &str,
        path: impl AsRef<Path>,
    ) -> BridgeResult<()> {
        let path = path.as_ref();
        let format = format_from_path(path)?;
        let mut file = BufReader::new(open_file(path)?);
        self.add_ingredient(ingredient_json, &format, &mut file)
    }

    /// Reference the manifest from `url` in signed output
    pub fn set_remote_url(&mut self, url: &str) -> BridgeResult<()> {
        let url = to_cstring(url, "remote_url")?;
        self.compose(None, |api, raw| {
            // SAFETY: builder and url are live for the call
            i64::from(unsafe { (api.builder_set_remote_url)(raw, url.as_ptr()) })
        })
    }

    /// Keep the manifest out of signed output; it is only returned
    pub fn set_no_embed(&mut self) {
        let raw = self.inner_mut().handle.as_ptr();
        // SAFETY: the builder is live and exclusively borrowed
        self.engine.call(|api| unsafe { (api.builder_set_no_embed)(raw) });
        self.inner_mut().advance(BuilderState::Composing);
    }

    fn check_engine(&self, signer: &Signer) -> BridgeResult<()> {
        if Arc::ptr_eq(&self.engine, signer.lock().engine()) {
            Ok(())
        } else {
            Err(BridgeError::InvalidArgument(
                "signer was created by a different engine".to_string(),
            ))
        }
    }

    /// Prefer the callback's own failure over the engine's report of it
    fn attribute_signing(signer: &Signer, err: BridgeError) -> BridgeError {
        match signer.take_callback_failure() {
            Some(reason) => BridgeError::Signing(format!("{reason} ({})", err.message())),
            None => err,
        }
    }

    /// Sign `source` into `dest`; returns the manifest bytes
    ///
    /// `dest` may be partially written if signing fails.
    pub fn sign<R, W>(
        &self,
        format: &str,
        source: &mut R,
        dest: &mut W,
        signer: &Signer,
    ) -> BridgeResult<Vec<u8>>
    where
        R: Read + Seek,
        W: Write + Seek,
    {
        self.check_engine(signer)?;
        let format_c = to_cstring(format, "format")?;
        let mut src = StreamBridge::reader(&self.engine, source as &mut dyn ReadSeek)?;
        let mut dst = StreamBridge::writer(&self.engine, dest as &mut dyn WriteSeek)?;
        let (src_ptr, dst_ptr) = (src.as_ptr(), dst.as_ptr());

        let mut inner = self.inner.lock();
        let signer_handle = signer.lock();
        signer.take_callback_failure();
        let (raw, signer_raw) = (inner.handle.as_ptr(), signer_handle.as_ptr());
        let result = self.engine.invoke_bytes(ErrorKind::Engine, |api, out| {
            // SAFETY: every handle and stream is live for the call
            unsafe { (api.builder_sign)(raw, format_c.as_ptr(), src_ptr, dst_ptr, signer_raw, out) }
        });
        drop(signer_handle);

        match result {
            Ok(manifest) => {
                inner.advance(BuilderState::Signed);
                tracing::debug!(format, bytes = manifest.len(), "signed asset");
                Ok(manifest)
            }
            Err(err) => {
                let err = src.attribute(err);
                let err = dst.attribute(err);
                Err(Self::attribute_signing(signer, err))
            }
        }
    }

    /// Sign the file at `source` into `dest`, creating `dest`'s directories
    ///
    /// The format is the destination's extension.
    pub fn sign_file(
        &self,
        source: impl AsRef<Path>,
        dest: impl AsRef<Path>,
        signer: &Signer,
    ) -> BridgeResult<Vec<u8>> {
        let dest = dest.as_ref();
        let format = format_from_path(dest)?;
        let mut input = BufReader::new(open_file(source.as_ref())?);
        let mut output = create_file(dest)?;
        self.sign(&format, &mut input, &mut output, signer)
    }

    /// Serialize the builder's content to `dest`
    pub fn to_archive<W: Write + Seek>(&self, dest: &mut W) -> BridgeResult<()> {
        let mut dst = StreamBridge::writer(&self.engine, dest as &mut dyn WriteSeek)?;
        let dst_ptr = dst.as_ptr();
        let mut inner = self.inner.lock();
        let raw = inner.handle.as_ptr();
        self.engine
            .invoke_status(ErrorKind::Engine, |api| {
                // SAFETY: builder and stream are live for the call
                i64::from(unsafe { (api.builder_to_archive)(raw, dst_ptr) })
            })
            .map_err(|err| dst.attribute(err))?;
        inner.advance(BuilderState::Archived);
        Ok(())
    }

    pub fn to_archive_file(&self, path: impl AsRef<Path>) -> BridgeResult<()> {
        let mut file: File = create_file(path.as_ref())?;
        self.to_archive(&mut file)
    }

    /// Placeholder manifest to embed before the asset's data hash is known
    ///
    /// `reserved_size` must cover the signature; see [`Builder::placeholder_for`].
    pub fn data_hashed_placeholder(&self, reserved_size: usize, format: &str) -> BridgeResult<Vec<u8>> {
        if reserved_size == 0 {
            return Err(BridgeError::InvalidArgument(
                "reserved size must be greater than zero".to_string(),
            ));
        }
        let format_c = to_cstring(format, "format")?;
        let mut inner = self.inner.lock();
        let raw = inner.handle.as_ptr();
        let placeholder = self.engine.invoke_bytes(ErrorKind::Engine, |api, out| {
            // SAFETY: builder and format are live for the call
            unsafe { (api.builder_data_hashed_placeholder)(raw, reserved_size, format_c.as_ptr(), out) }
        })?;
        inner.advance(BuilderState::PlaceholderIssued);
        Ok(placeholder)
    }

    /// Placeholder sized for `signer`'s signatures
    pub fn placeholder_for(&self, signer: &Signer, format: &str) -> BridgeResult<Vec<u8>> {
        self.data_hashed_placeholder(signer.reserve_size()?, format)
    }

    /// Sign a precomputed data hash and return manifest bytes ready to embed
    ///
    /// With `asset`, an empty hash in `data_hash` is computed from it.
    pub fn sign_data_hashed_embeddable<S: Read + Seek>(
        &self,
        signer: &Signer,
        data_hash: &str,
        format: &str,
        asset: Option<&mut S>,
    ) -> BridgeResult<Vec<u8>> {
        self.check_engine(signer)?;
        let data_hash = to_cstring(data_hash, "data_hash")?;
        let format_c = to_cstring(format, "format")?;
        let mut bridge = match asset {
            Some(asset) => Some(StreamBridge::reader(&self.engine, asset as &mut dyn ReadSeek)?),
            None => None,
        };
        let asset_ptr = bridge.as_ref().map_or(ptr::null_mut(), StreamBridge::as_ptr);

        let mut inner = self.inner.lock();
        let signer_handle = signer.lock();
        signer.take_callback_failure();
        let (raw, signer_raw) = (inner.handle.as_ptr(), signer_handle.as_ptr());
        let result = self.engine.invoke_bytes(ErrorKind::Engine, |api, out| {
            // SAFETY: handles, strings and the optional stream are live
            unsafe {
                (api.builder_sign_data_hashed_embeddable)(
                    raw,
                    signer_raw,
                    data_hash.as_ptr(),
                    format_c.as_ptr(),
                    asset_ptr,
                    out,
                )
            }
        });
        drop(signer_handle);

        match result {
            Ok(manifest) => {
                inner.advance(BuilderState::Signed);
                Ok(manifest)
            }
            Err(err) => {
                let err = match bridge.as_mut() {
                    Some(bridge) => bridge.attribute(err),
                    None => err,
                };
                Err(Self::attribute_signing(signer, err))
            }
        }
    }

    /// Wrap raw manifest bytes in the container form `format` embeds
    pub fn format_embeddable(engine: &Arc<Engine>, format: &str, data: &[u8]) -> BridgeResult<Vec<u8>> {
        let format_c = to_cstring(format, "format")?;
        engine.invoke_bytes(ErrorKind::Engine, |api, out| {
            // SAFETY: format and data are live for the call
            unsafe { (api.format_embeddable)(format_c.as_ptr(), data.as_ptr(), data.len(), out) }
        })
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
