//! Path-based convenience operations

use crate::builder::MockBuilder;
use crate::error::{MockError, MockResult};
use crate::format::{self, AssetFormat, sha256_hex};
use crate::reader::MockReader;
use crate::signer::MockSigner;
use crate::store::Envelope;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use uuid::Uuid;

const MANIFEST_STORE_FILE: &str = "manifest_store.json";
const INGREDIENT_FILE: &str = "ingredient.json";

fn read_asset(path: &Path) -> MockResult<(AssetFormat, Vec<u8>)> {
    if !path.exists() {
        return Err(MockError::FileNotFound(path.display().to_string()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| MockError::NotSupported(format!("no extension: {}", path.display())))?;
    let format = AssetFormat::parse(ext)?;
    Ok((format, fs::read(path)?))
}

fn write_resources(envelope: &Envelope, data_dir: &Path) -> MockResult<()> {
    for uri in envelope.resources.keys() {
        let target = data_dir.join(sanitize(uri));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, envelope.resource(uri)?)?;
    }
    Ok(())
}

/// Resource URIs become file names; path separators are flattened
fn sanitize(uri: &str) -> String {
    uri.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

/// Manifest store JSON for the asset at `path`
///
/// With `data_dir`, the store JSON and its resources are written there too.
pub fn read_file(path: &Path, data_dir: Option<&Path>) -> MockResult<String> {
    let (format, bytes) = read_asset(path)?;
    let reader = MockReader::from_bytes(format, &bytes)?;
    let json = reader.json();
    if let Some(dir) = data_dir {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(MANIFEST_STORE_FILE), &json)?;
        write_resources(reader.envelope(), dir)?;
    }
    Ok(json)
}

/// Ingredient JSON describing the asset at `path`
pub fn read_ingredient_file(path: &Path, data_dir: Option<&Path>) -> MockResult<String> {
    let (format, bytes) = read_asset(path)?;
    let (asset, manifest) = format::split(format, &bytes);
    if format != AssetFormat::Sidecar {
        format.check_magic(asset)?;
    }

    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut ingredient = json!({
        "title": title,
        "format": format.mime_type(),
        "instance_id": format!("xmp:iid:{}", Uuid::new_v4()),
        "hash": sha256_hex(&bytes),
    });
    if let Some(manifest) = manifest {
        let envelope = Envelope::from_bytes(manifest)?;
        if let (Some(label), Value::Object(fields)) = (envelope.active_label(), &mut ingredient) {
            fields.insert("active_manifest".into(), json!(label));
        }
        if let Some(dir) = data_dir {
            fs::create_dir_all(dir)?;
            write_resources(&envelope, dir)?;
        }
    }

    let json = ingredient.to_string();
    if let Some(dir) = data_dir {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(INGREDIENT_FILE), &json)?;
    }
    Ok(json)
}

/// Sign the asset at `source` into `dest`; returns the new store JSON
///
/// Files directly inside `data_dir` are added as resources named by their
/// file name.
pub fn sign_file(
    source: &Path,
    dest: &Path,
    manifest_json: &str,
    signer: &MockSigner,
    data_dir: Option<&Path>,
) -> MockResult<String> {
    let (format, bytes) = read_asset(source)?;
    let mut builder = MockBuilder::from_json(manifest_json)?;
    if let Some(dir) = data_dir {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let name = entry.file_name().to_string_lossy().into_owned();
                builder.insert_resource(&name, fs::read(entry.path())?);
            }
        }
    }

    let signed = builder.sign_bytes(format, &bytes, signer)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, &signed.output)?;
    Ok(signed.envelope.store_json())
}
