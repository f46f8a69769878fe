//! A loaded engine and the call discipline around it

use crate::api::EngineApi;
use crate::buffer::{EngineString, ManifestBytes};
use crate::error_channel::ErrorChannel;
use crate::loader::load_library;
use crate::strings::to_cstring;
use c2pa_bridge_core::{BridgeConfig, BridgeError, BridgeResult, ErrorKind, SettingsFormat};
use libloading::Library;
use parking_lot::ReentrantMutex;
use std::ffi::c_char;
use std::path::Path;
use std::ptr::{self, NonNull};

/// Engine entry points plus whatever keeps them valid
///
/// Wrappers hold an `Arc<Engine>` so the library outlives every handle
/// created from it.
pub struct Engine {
    api: EngineApi,
    /// Held across each call and its error query when the engine's error
    /// slot is process-global. Reentrant because signer and stream callbacks
    /// run on the calling thread and may call back into the engine.
    serialize: Option<ReentrantMutex<()>>,
    // Dropped last: `api` points into it.
    _library: Option<Library>,
}

impl Engine {
    /// Load the engine shared library at `path`
    pub fn load(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let (library, api) = load_library(path.as_ref())?;
        Ok(Self {
            api,
            serialize: None,
            _library: Some(library),
        })
    }

    /// Wrap an engine linked into the current process
    pub fn from_api(api: EngineApi) -> Self {
        Self {
            api,
            serialize: None,
            _library: None,
        }
    }

    /// Load and prepare an engine as described by `config`
    pub fn from_config(config: &BridgeConfig) -> BridgeResult<Self> {
        config.validate()?;
        let path = config
            .library_path
            .as_deref()
            .ok_or_else(|| BridgeError::Config("library_path is not set".to_string()))?;

        let mut engine = Self::load(path)?;
        if config.serialize_calls {
            engine = engine.with_serialized_calls();
        }
        if let Some(settings) = &config.settings {
            engine.load_settings(settings.format, &settings.data)?;
        }
        Ok(engine)
    }

    /// Serialize every engine call behind one engine-wide lock
    pub fn with_serialized_calls(mut self) -> Self {
        self.serialize = Some(ReentrantMutex::new(()));
        self
    }

    pub fn is_serialized(&self) -> bool {
        self.serialize.is_some()
    }

    pub fn api(&self) -> &EngineApi {
        &self.api
    }

    /// Run `f` against the function table, under the engine lock if any
    pub fn call<R>(&self, f: impl FnOnce(&EngineApi) -> R) -> R {
        let _guard = self.serialize.as_ref().map(|lock| lock.lock());
        f(&self.api)
    }

    /// Call a function returning a pointer; null is a failure
    pub fn invoke_ptr<T>(
        &self,
        fallback: ErrorKind,
        f: impl FnOnce(&EngineApi) -> *mut T,
    ) -> BridgeResult<NonNull<T>> {
        self.call(|api| NonNull::new(f(api)).ok_or_else(|| ErrorChannel::new(api).failure(fallback)))
    }

    /// Call a function returning a count or status; negative is a failure
    pub fn invoke_status(
        &self,
        fallback: ErrorKind,
        f: impl FnOnce(&EngineApi) -> i64,
    ) -> BridgeResult<u64> {
        self.call(|api| {
            let result = f(api);
            u64::try_from(result).map_err(|_| ErrorChannel::new(api).failure(fallback))
        })
    }

    /// Call a function returning an owned engine string; null is a failure
    pub fn invoke_string(
        &self,
        fallback: ErrorKind,
        f: impl FnOnce(&EngineApi) -> *mut c_char,
    ) -> BridgeResult<String> {
        self.call(|api| {
            let raw = f(api);
            // SAFETY: string-returning entry points hand ownership to the caller
            match unsafe { EngineString::from_raw(api, raw) } {
                Some(s) => Ok(s.to_string_lossy()),
                None => Err(ErrorChannel::new(api).failure(fallback)),
            }
        })
    }

    /// Call a function that returns bytes through an out-parameter
    ///
    /// A negative count or a null buffer is a failure. The engine buffer is
    /// copied and released before this returns.
    pub fn invoke_bytes(
        &self,
        fallback: ErrorKind,
        f: impl FnOnce(&EngineApi, *mut *const u8) -> i64,
    ) -> BridgeResult<Vec<u8>> {
        self.call(|api| {
            let mut out: *const u8 = ptr::null();
            let result = f(api, &mut out);
            let len = match usize::try_from(result) {
                Ok(len) if !out.is_null() => len,
                _ => return Err(ErrorChannel::new(api).failure(fallback)),
            };
            // SAFETY: on success the engine wrote a buffer of `len` bytes to `out`
            let bytes = unsafe { ManifestBytes::from_raw(api, out, len) };
            Ok(bytes.into_vec())
        })
    }

    /// Engine version string
    pub fn version(&self) -> BridgeResult<String> {
        // SAFETY: c2pa_version takes no arguments
        self.invoke_string(ErrorKind::Engine, |api| unsafe { (api.version)() })
    }

    /// Apply process-wide engine settings; the last call wins
    pub fn load_settings(&self, format: SettingsFormat, data: &str) -> BridgeResult<()> {
        let settings = to_cstring(data, "settings")?;
        let format_tag = to_cstring(format.as_str(), "settings format")?;
        self.invoke_status(ErrorKind::Engine, |api| {
            // SAFETY: both strings are valid for the duration of the call
            i64::from(unsafe { (api.load_settings)(settings.as_ptr(), format_tag.as_ptr()) })
        })?;
        tracing::debug!(format = %format, "engine settings loaded");
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("serialized", &self.is_serialized())
            .field("dynamic", &self._library.is_some())
            .finish()
    }
}
