//! Process-level engine operations

use crate::signer::SignerInfo;
use c2pa_bridge_core::{BridgeResult, ErrorKind, SettingsFormat};
use c2pa_bridge_ffi::{Engine, optional_ptr, path_to_cstring, to_cstring};
use std::ffi::CString;
use std::path::Path;

/// Engine version string
pub fn version(engine: &Engine) -> BridgeResult<String> {
    engine.version()
}

/// Apply process-wide engine settings; the last call wins
pub fn load_settings(engine: &Engine, format: SettingsFormat, data: &str) -> BridgeResult<()> {
    engine.load_settings(format, data)
}

fn optional_path(path: Option<&Path>, what: &str) -> BridgeResult<Option<CString>> {
    path.map(|p| path_to_cstring(p, what)).transpose()
}

/// Manifest store JSON of the file at `path`, or `None` if it has none
///
/// With `data_dir`, the engine also writes the store and its resources there.
pub fn read_file(
    engine: &Engine,
    path: impl AsRef<Path>,
    data_dir: Option<&Path>,
) -> BridgeResult<Option<String>> {
    let path_c = path_to_cstring(path.as_ref(), "path")?;
    let data_dir = optional_path(data_dir, "data_dir")?;
    let result = engine.invoke_string(ErrorKind::Engine, |api| {
        // SAFETY: both strings are live for the call; data_dir may be null
        unsafe { (api.read_file)(path_c.as_ptr(), optional_ptr(&data_dir)) }
    });
    match result {
        Ok(json) => Ok(Some(json)),
        Err(err) if err.is_manifest_not_found() => {
            tracing::debug!(path = %path.as_ref().display(), "file has no manifest store");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Ingredient JSON describing the file at `path`
pub fn read_ingredient_file(
    engine: &Engine,
    path: impl AsRef<Path>,
    data_dir: Option<&Path>,
) -> BridgeResult<String> {
    let path_c = path_to_cstring(path.as_ref(), "path")?;
    let data_dir = optional_path(data_dir, "data_dir")?;
    engine.invoke_string(ErrorKind::Engine, |api| {
        // SAFETY: both strings are live for the call; data_dir may be null
        unsafe { (api.read_ingredient_file)(path_c.as_ptr(), optional_ptr(&data_dir)) }
    })
}

/// Sign the file at `source` into `dest` with engine-held keys
///
/// Returns the manifest store JSON of the signed output.
pub fn sign_file(
    engine: &Engine,
    source: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    manifest_json: &str,
    signer_info: &SignerInfo,
    data_dir: Option<&Path>,
) -> BridgeResult<String> {
    let source_c = path_to_cstring(source.as_ref(), "source")?;
    let dest_c = path_to_cstring(dest.as_ref(), "dest")?;
    let manifest = to_cstring(manifest_json, "manifest_json")?;
    let data_dir = optional_path(data_dir, "data_dir")?;
    signer_info.with_raw(|info| {
        engine.invoke_string(ErrorKind::Engine, |api| {
            // SAFETY: every string and the info struct are live for the call
            unsafe {
                (api.sign_file)(
                    source_c.as_ptr(),
                    dest_c.as_ptr(),
                    manifest.as_ptr(),
                    info,
                    optional_ptr(&data_dir),
                )
            }
        })
    })
}
