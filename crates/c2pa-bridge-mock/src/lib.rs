//! c2pa-bridge-mock - in-process c2pa engine
//!
//! Implements the engine's C ABI in Rust so the bridge can be exercised
//! without the native library:
//! - readers and builders over a simple trailer container for JPEG and PNG
//! - callback and key-based signers with deterministic signatures
//! - builder archives as zip files
//! - data-hashed placeholders and embeddable manifests
//! - live counts of every object handed to the host
//!
//! The entry points are gathered by [`api`] into an [`EngineApi`] table
//! rather than exported by symbol name.

mod builder;
mod error;
mod exports;
mod files;
pub mod fixtures;
pub mod format;
mod memory;
mod reader;
mod settings;
mod signer;
mod store;
mod stream;

use c2pa_bridge_ffi::{Engine, EngineApi};
use std::sync::Arc;

pub use builder::{ExclusionRange, MockBuilder, hash_excluding};
pub use error::{MockError, MockResult};
pub use memory::{LiveCounts, live_counts};
pub use reader::MockReader;
pub use settings::{DEFAULT_CLAIM_GENERATOR, current as current_settings};
pub use signer::{MockSigner, TIMESTAMP_RESERVE, max_signature_len};
pub use store::Envelope;
pub use stream::CStream;

/// Function table pointing at this crate's entry points
pub fn api() -> EngineApi {
    use exports::*;
    EngineApi {
        version: c2pa_version,
        error: c2pa_error,
        load_settings: c2pa_load_settings,
        string_free: c2pa_string_free,

        create_stream: c2pa_create_stream,
        release_stream: c2pa_release_stream,

        reader_from_stream: c2pa_reader_from_stream,
        reader_json: c2pa_reader_json,
        reader_resource_to_stream: c2pa_reader_resource_to_stream,
        reader_free: c2pa_reader_free,

        builder_from_json: c2pa_builder_from_json,
        builder_from_archive: c2pa_builder_from_archive,
        builder_set_no_embed: c2pa_builder_set_no_embed,
        builder_set_remote_url: c2pa_builder_set_remote_url,
        builder_add_resource: c2pa_builder_add_resource,
        builder_add_ingredient: c2pa_builder_add_ingredient_from_stream,
        builder_to_archive: c2pa_builder_to_archive,
        builder_sign: c2pa_builder_sign,
        builder_data_hashed_placeholder: c2pa_builder_data_hashed_placeholder,
        builder_sign_data_hashed_embeddable: c2pa_builder_sign_data_hashed_embeddable,
        format_embeddable: c2pa_format_embeddable,
        manifest_bytes_free: c2pa_manifest_bytes_free,
        builder_free: c2pa_builder_free,

        signer_create: c2pa_signer_create,
        signer_from_info: c2pa_signer_from_info,
        signer_reserve_size: c2pa_signer_reserve_size,
        signer_free: c2pa_signer_free,

        read_file: c2pa_read_file,
        read_ingredient_file: c2pa_read_ingredient_file,
        sign_file: c2pa_sign_file,
    }
}

/// An engine backed by this crate
pub fn engine() -> Engine {
    Engine::from_api(api())
}

pub fn shared_engine() -> Arc<Engine> {
    Arc::new(engine())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;
