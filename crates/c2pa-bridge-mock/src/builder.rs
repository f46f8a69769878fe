//! Engine-side manifest builder

use crate::error::{MockError, MockResult};
use crate::format::{self, AssetFormat, sha256_hex};
use crate::signer::MockSigner;
use crate::store::{Claim, Envelope};
use crate::stream::CStream;
use serde::Deserialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const PLACEHOLDER_MAGIC: &[u8; 6] = b"MOCKPH";

const ARCHIVE_MANIFEST: &str = "manifest.json";
const ARCHIVE_RESOURCES: &str = "resources.json";
const ARCHIVE_INGREDIENTS: &str = "ingredients.json";
const ARCHIVE_OPTIONS: &str = "options.json";

#[derive(Debug, Clone, Default)]
pub struct MockBuilder {
    definition: Value,
    resources: BTreeMap<String, Vec<u8>>,
    ingredients: Vec<Value>,
    no_embed: bool,
    remote_url: Option<String>,
}

/// Output of signing an in-memory asset
pub(crate) struct SignedAsset {
    pub output: Vec<u8>,
    pub manifest: Vec<u8>,
    pub envelope: Envelope,
}

#[derive(Debug, Deserialize)]
struct Exclusion {
    start: u64,
    length: u64,
}

#[derive(Debug, Deserialize)]
struct DataHash {
    #[serde(default = "default_hash_alg")]
    alg: String,
    #[serde(default)]
    hash: String,
    #[serde(default)]
    exclusions: Vec<Exclusion>,
}

fn default_hash_alg() -> String {
    "sha256".to_string()
}

#[derive(Debug, Default, serde::Serialize, Deserialize)]
struct ArchiveOptions {
    no_embed: bool,
    remote_url: Option<String>,
}

impl MockBuilder {
    pub fn from_json(json: &str) -> MockResult<Self> {
        let definition: Value = serde_json::from_str(json)?;
        if !definition.is_object() {
            return Err(MockError::Json(
                "manifest definition must be an object".to_string(),
            ));
        }
        Ok(Self {
            definition,
            ..Self::default()
        })
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn set_no_embed(&mut self) {
        self.no_embed = true;
    }

    pub fn set_remote_url(&mut self, url: &str) {
        self.remote_url = Some(url.to_string());
    }

    pub fn add_resource(&mut self, uri: &str, source: &mut CStream) -> MockResult<()> {
        let bytes = source.read_all()?;
        self.insert_resource(uri, bytes);
        Ok(())
    }

    pub fn add_ingredient(
        &mut self,
        ingredient_json: &str,
        format: &str,
        source: &mut CStream,
    ) -> MockResult<()> {
        let mut ingredient: Value = serde_json::from_str(ingredient_json)?;
        let asset_format = AssetFormat::parse(format)?;
        let bytes = source.read_all()?;
        let Value::Object(fields) = &mut ingredient else {
            return Err(MockError::Json("ingredient must be an object".to_string()));
        };
        fields.insert("format".into(), json!(asset_format.mime_type()));
        fields.insert("hash".into(), json!(sha256_hex(&bytes)));
        let (_, manifest) = format::split(asset_format, &bytes);
        if let Some(manifest) = manifest {
            let envelope = Envelope::from_bytes(manifest)?;
            if let Some(label) = envelope.active_label() {
                fields.insert("active_manifest".into(), json!(label));
            }
        }
        self.ingredients.push(ingredient);
        Ok(())
    }

    fn claim(&self, format: AssetFormat, asset_hash: String, extra: Vec<Value>) -> Claim<'_> {
        Claim {
            definition: &self.definition,
            format,
            asset_hash,
            ingredients: &self.ingredients,
            resources: &self.resources,
            remote_url: self.remote_url.as_deref(),
            extra_assertions: extra,
        }
    }

    pub(crate) fn insert_resource(&mut self, uri: &str, bytes: Vec<u8>) {
        self.resources.insert(uri.to_string(), bytes);
    }

    /// Sign `source` into `dest`; returns the manifest bytes
    pub fn sign(
        &self,
        format: &str,
        source: &mut CStream,
        dest: &mut CStream,
        signer: &MockSigner,
    ) -> MockResult<Vec<u8>> {
        let asset_format = AssetFormat::parse(format)?;
        let bytes = source.read_all()?;
        let signed = self.sign_bytes(asset_format, &bytes, signer)?;
        dest.write_all(&signed.output)?;
        dest.flush()?;
        Ok(signed.manifest)
    }

    /// Sign an in-memory asset; any manifest it already carries is replaced
    pub(crate) fn sign_bytes(
        &self,
        format: AssetFormat,
        bytes: &[u8],
        signer: &MockSigner,
    ) -> MockResult<SignedAsset> {
        let (asset, _) = format::split(format, bytes);
        format.check_magic(asset)?;

        let envelope = self.claim(format, sha256_hex(asset), Vec::new()).sign(signer)?;
        let manifest = envelope.to_bytes()?;
        let output = if self.no_embed {
            asset.to_vec()
        } else {
            format::join(format, asset, &manifest)
        };
        Ok(SignedAsset {
            output,
            manifest,
            envelope,
        })
    }

    pub fn to_archive(&self, dest: &mut CStream) -> MockResult<()> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file(ARCHIVE_MANIFEST, options)?;
        zip.write_all(&serde_json::to_vec(&self.definition)?)?;

        let mut index = BTreeMap::new();
        for (n, (uri, bytes)) in self.resources.iter().enumerate() {
            let path = format!("resources/{n}");
            zip.start_file(path.as_str(), options)?;
            zip.write_all(bytes)?;
            index.insert(uri.clone(), path);
        }
        zip.start_file(ARCHIVE_RESOURCES, options)?;
        zip.write_all(&serde_json::to_vec(&index)?)?;

        zip.start_file(ARCHIVE_INGREDIENTS, options)?;
        zip.write_all(&serde_json::to_vec(&self.ingredients)?)?;

        zip.start_file(ARCHIVE_OPTIONS, options)?;
        zip.write_all(&serde_json::to_vec(&ArchiveOptions {
            no_embed: self.no_embed,
            remote_url: self.remote_url.clone(),
        })?)?;

        let archive = zip.finish()?.into_inner();
        dest.write_all(&archive)?;
        dest.flush()?;
        Ok(())
    }

    pub fn from_archive(source: &mut CStream) -> MockResult<Self> {
        let bytes = source.read_all()?;
        let mut zip = ZipArchive::new(Cursor::new(bytes))?;

        let definition: Value = serde_json::from_slice(&read_entry(&mut zip, ARCHIVE_MANIFEST)?)?;
        let index: BTreeMap<String, String> =
            serde_json::from_slice(&read_entry(&mut zip, ARCHIVE_RESOURCES)?)?;
        let ingredients: Vec<Value> =
            serde_json::from_slice(&read_entry(&mut zip, ARCHIVE_INGREDIENTS)?)?;
        let options: ArchiveOptions =
            serde_json::from_slice(&read_entry(&mut zip, ARCHIVE_OPTIONS)?)?;

        let mut resources = BTreeMap::new();
        for (uri, path) in index {
            resources.insert(uri, read_entry(&mut zip, &path)?);
        }

        Ok(Self {
            definition,
            resources,
            ingredients,
            no_embed: options.no_embed,
            remote_url: options.remote_url,
        })
    }

    /// Placeholder manifest reserving `reserved_size` bytes for the signature
    pub fn data_hashed_placeholder(&self, reserved_size: usize, format: &str) -> MockResult<Vec<u8>> {
        let asset_format = AssetFormat::parse(format)?;
        if reserved_size == 0 {
            return Err(MockError::BadParam("reserved size must be positive".to_string()));
        }
        let header = serde_json::to_vec(&json!({
            "format": asset_format.mime_type(),
            "reserved_size": reserved_size,
            "title": self.definition.get("title"),
        }))?;

        let mut placeholder = Vec::with_capacity(PLACEHOLDER_MAGIC.len() + 4 + header.len() + reserved_size);
        placeholder.extend_from_slice(PLACEHOLDER_MAGIC);
        placeholder.extend_from_slice(&(header.len() as u32).to_le_bytes());
        placeholder.extend_from_slice(&header);
        placeholder.resize(placeholder.len() + reserved_size, 0);
        asset_format.embeddable(&placeholder)
    }

    /// Sign a data hash and return an embeddable manifest
    ///
    /// With an asset, an empty hash is computed from it and a given hash is
    /// checked against it.
    pub fn sign_data_hashed_embeddable(
        &self,
        signer: &MockSigner,
        data_hash: &str,
        format: &str,
        asset: Option<&mut CStream>,
    ) -> MockResult<Vec<u8>> {
        let asset_format = AssetFormat::parse(format)?;
        let mut data_hash: DataHash = serde_json::from_str(data_hash)?;
        if data_hash.alg != "sha256" {
            return Err(MockError::NotSupported(format!("hash algorithm {}", data_hash.alg)));
        }

        if let Some(asset) = asset {
            let bytes = asset.read_all()?;
            let computed = hash_excluding(&bytes, &data_hash.exclusions);
            if data_hash.hash.is_empty() {
                data_hash.hash = computed;
            } else if !data_hash.hash.eq_ignore_ascii_case(&computed) {
                return Err(MockError::HashMismatch(
                    "data hash does not match asset".to_string(),
                ));
            }
        } else if data_hash.hash.is_empty() {
            return Err(MockError::BadParam("data hash is empty and no asset given".to_string()));
        }

        let assertion = json!({
            "label": "c2pa.hash.data",
            "data": {
                "alg": data_hash.alg,
                "hash": data_hash.hash,
                "exclusions": data_hash
                    .exclusions
                    .iter()
                    .map(|e| json!({"start": e.start, "length": e.length}))
                    .collect::<Vec<_>>(),
            }
        });
        let envelope = self
            .claim(asset_format, data_hash.hash.clone(), vec![assertion])
            .sign(signer)?;
        asset_format.embeddable(&envelope.to_bytes()?)
    }
}

fn read_entry(zip: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> MockResult<Vec<u8>> {
    let mut entry = zip
        .by_name(name)
        .map_err(|_| MockError::BadParam(format!("archive is missing {name}")))?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// SHA-256 of `bytes` with the exclusion ranges left out
pub fn hash_excluding(bytes: &[u8], exclusions: &[impl ExclusionRange]) -> String {
    let mut ranges: Vec<(usize, usize)> = exclusions
        .iter()
        .map(|e| {
            let start = (e.start() as usize).min(bytes.len());
            let end = start.saturating_add(e.length() as usize).min(bytes.len());
            (start, end)
        })
        .collect();
    ranges.sort_unstable();

    let mut hasher = Sha256::new();
    let mut pos = 0usize;
    for (start, end) in ranges {
        if start > pos {
            hasher.update(&bytes[pos..start]);
        }
        pos = pos.max(end);
    }
    if pos < bytes.len() {
        hasher.update(&bytes[pos..]);
    }
    hex::encode(hasher.finalize())
}

/// A byte range excluded from a data hash
pub trait ExclusionRange {
    fn start(&self) -> u64;
    fn length(&self) -> u64;
}

impl ExclusionRange for Exclusion {
    fn start(&self) -> u64 {
        self.start
    }

    fn length(&self) -> u64 {
        self.length
    }
}

impl ExclusionRange for (u64, u64) {
    fn start(&self) -> u64 {
        self.0
    }

    fn length(&self) -> u64 {
        self.1
    }
}

#[cfg(test)]
#[path = "builder/builder_tests.rs"]
mod builder_tests;
