//! Dynamic loading of the engine library.

use crate::api::EngineApi;
use c2pa_bridge_core::{BridgeError, BridgeResult};
use libloading::{Library, Symbol};
use std::path::Path;

/// Open the engine library at `path` and resolve every entry point.
///
/// Resolution is eager: a library missing any symbol is rejected here
/// rather than at first use.
pub(crate) fn load_library(path: &Path) -> BridgeResult<(Library, EngineApi)> {
    // SAFETY: loading a shared library runs its initializers. The caller is
    // responsible for the path being a trusted engine build.
    let library = unsafe { Library::new(path) }
        .map_err(|e| BridgeError::LibraryLoad(format!("{}: {}", path.display(), e)))?;

    let api = EngineApi {
        version: symbol(&library, b"c2pa_version\0")?,
        error: symbol(&library, b"c2pa_error\0")?,
        load_settings: symbol(&library, b"c2pa_load_settings\0")?,
        string_free: symbol(&library, b"c2pa_string_free\0")?,
        create_stream: symbol(&library, b"c2pa_create_stream\0")?,
        release_stream: symbol(&library, b"c2pa_release_stream\0")?,
        reader_from_stream: symbol(&library, b"c2pa_reader_from_stream\0")?,
        reader_json: symbol(&library, b"c2pa_reader_json\0")?,
        reader_resource_to_stream: symbol(&library, b"c2pa_reader_resource_to_stream\0")?,
        reader_free: symbol(&library, b"c2pa_reader_free\0")?,
        builder_from_json: symbol(&library, b"c2pa_builder_from_json\0")?,
        builder_from_archive: symbol(&library, b"c2pa_builder_from_archive\0")?,
        builder_set_no_embed: symbol(&library, b"c2pa_builder_set_no_embed\0")?,
        builder_set_remote_url: symbol(&library, b"c2pa_builder_set_remote_url\0")?,
        builder_add_resource: symbol(&library, b"c2pa_builder_add_resource\0")?,
        builder_add_ingredient: symbol(
            &library,
            b"c2pa_builder_add_ingredient_from_stream\0",
        )?,
        builder_to_archive: symbol(&library, b"c2pa_builder_to_archive\0")?,
        builder_sign: symbol(&library, b"c2pa_builder_sign\0")?,
        builder_data_hashed_placeholder: symbol(
            &library,
            b"c2pa_builder_data_hashed_placeholder\0",
        )?,
        builder_sign_data_hashed_embeddable: symbol(
            &library,
            b"c2pa_builder_sign_data_hashed_embeddable\0",
        )?,
        format_embeddable: symbol(&library, b"c2pa_format_embeddable\0")?,
        manifest_bytes_free: symbol(&library, b"c2pa_manifest_bytes_free\0")?,
        builder_free: symbol(&library, b"c2pa_builder_free\0")?,
        signer_create: symbol(&library, b"c2pa_signer_create\0")?,
        signer_from_info: symbol(&library, b"c2pa_signer_from_info\0")?,
        signer_reserve_size: symbol(&library, b"c2pa_signer_reserve_size\0")?,
        signer_free: symbol(&library, b"c2pa_signer_free\0")?,
        read_file: symbol(&library, b"c2pa_read_file\0")?,
        read_ingredient_file: symbol(&library, b"c2pa_read_ingredient_file\0")?,
        sign_file: symbol(&library, b"c2pa_sign_file\0")?,
    };

    tracing::debug!("loaded engine library {}", path.display());
    Ok((library, api))
}

/// Resolve one function pointer by its NUL-terminated name.
fn symbol<T: Copy>(library: &Library, name: &[u8]) -> BridgeResult<T> {
    // SAFETY: `T` is one of the `EngineApi` function pointer types whose
    // signature matches the engine header for `name`. The pointer is copied
    // out of the `Symbol` and is only used while `library` stays loaded.
    let sym: Symbol<T> = unsafe { library.get(name) }.map_err(|e| {
        let printable = String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name));
        BridgeError::SymbolNotFound(format!("{}: {}", printable, e))
    })?;
    Ok(*sym)
}
