//! # c2pa-bridge
//!
//! Safe Rust bindings for the c2pa engine, a shared library exposing a
//! narrow C ABI for creating, archiving and verifying content-provenance
//! manifests.
//!
//! - [`Reader`] opens a manifest store from a stream or file
//! - [`Builder`] composes a manifest and signs, archives or produces a
//!   detached data-hashed signature
//! - [`Signer`] wraps a signing callback or engine-held keys
//!
//! Any `Read + Seek` or `Write + Seek` value can be handed to the engine;
//! the bridge exposes it through callbacks without copying the asset.
//!
//! ## Quick Start
//!
//! ```ignore
//! use c2pa_bridge::prelude::*;
//! use std::io::Cursor;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(Engine::load("libc2pa_c.so")?);
//! let signer = Signer::from_callback(&engine, SigningAlg::Es256, CERTS, None, |data| {
//!     my_hsm_sign(data)
//! })?;
//!
//! let builder = Builder::from_json(&engine, MANIFEST_JSON)?;
//! let mut source = std::fs::File::open("image.jpg")?;
//! let mut dest = Cursor::new(Vec::new());
//! builder.sign("image/jpeg", &mut source, &mut dest, &signer)?;
//!
//! dest.set_position(0);
//! if let Some(reader) = Reader::from_stream(&engine, "image/jpeg", dest)? {
//!     println!("{}", reader.json()?);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`c2pa_bridge_core`] - errors, configuration and shared enums
//! - [`c2pa_bridge_ffi`] - engine loading, handles and the stream bridge
//! - [`c2pa_bridge_logging`] - tracing subscriber setup

mod builder;
mod ops;
mod reader;
mod signer;
mod util;

pub use builder::Builder;
pub use ops::{load_settings, read_file, read_ingredient_file, sign_file, version};
pub use reader::Reader;
pub use signer::{Signer, SignerInfo};
pub use util::format_from_path;

pub use c2pa_bridge_core::{
    BridgeConfig, BridgeError, BridgeResult, BuilderState, EngineSettings, ErrorKind, LogLevel,
    SettingsFormat, SigningAlg,
};
pub use c2pa_bridge_ffi::{Engine, StreamBridge, StreamCapabilities};
pub use c2pa_bridge_logging::{init_logging, init_logging_from_config, init_logging_from_env};

pub use c2pa_bridge_core;
pub use c2pa_bridge_ffi;
pub use c2pa_bridge_logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BridgeError, BridgeResult, Builder, BuilderState, Engine, ErrorKind, Reader,
        SettingsFormat, Signer, SignerInfo, SigningAlg,
    };
}
