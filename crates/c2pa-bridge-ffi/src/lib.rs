//! c2pa-bridge-ffi - C ABI boundary to the c2pa engine
//!
//! This crate provides the FFI boundary layer:
//! - [`EngineApi`] and [`Engine`] for loading the engine and calling into it
//! - [`ErrorChannel`] for turning failure sentinels into [`BridgeError`]s
//! - [`EngineString`] and [`ManifestBytes`] for engine-allocated buffers
//! - [`OwnedHandle`] for reader, builder and signer lifetimes
//! - [`StreamBridge`] for exposing native streams to the engine
//! - [`signer_passthrough`] for host-implemented signing
//!
//! # Engine entry points
//!
//! The engine is a shared library exporting `c2pa_*` functions. They are
//! resolved once by [`Engine::load`] into an [`EngineApi`] table; failures
//! are reported as a null pointer or negative integer, with details available
//! from `c2pa_error`.
//!
//! [`BridgeError`]: c2pa_bridge_core::BridgeError

mod api;
mod buffer;
mod callback;
mod engine;
mod error_channel;
mod handle;
mod loader;
mod panic_guard;
mod strings;
mod stream;
pub mod types;

pub use api::EngineApi;
pub use buffer::{EngineString, ManifestBytes};
pub use callback::{CallbackContext, SignFn, signer_passthrough};
pub use engine::Engine;
pub use error_channel::{ErrorChannel, UNKNOWN_ENGINE_ERROR};
pub use handle::{
    BuilderHandle, BuilderKind, HandleKind, OwnedHandle, ReaderHandle, ReaderKind, SignerHandle,
    SignerKind,
};
pub use panic_guard::{catch_panic, guard_callback};
pub use stream::{
    BridgeContext, CallbackTable, OwnedStreamBridge, ReadSeek, ReadWriteSeek, StreamBridge,
    StreamCapabilities, StreamTarget, WriteSeek, flush_callback, noop_flush, read_callback,
    reject_read, reject_write, seek_callback, write_callback,
};
pub use strings::{optional_ptr, path_to_cstring, to_cstring, to_optional_cstring};
pub use types::{
    C2paBuilder, C2paReader, C2paSigner, C2paSignerInfo, C2paStream, INVALID_ARGUMENT, IO_FAILURE,
    SIGNER_FAILURE, SeekMode, StreamContext,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Engine, EngineApi, OwnedStreamBridge, StreamBridge, StreamCapabilities};
    pub use c2pa_bridge_core::prelude::*;
}
