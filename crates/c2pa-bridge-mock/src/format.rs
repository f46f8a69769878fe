//! Asset formats and the mock manifest container
//!
//! A signed asset is the original asset followed by the manifest bytes, a
//! little-endian `u32` length and the [`TRAILER_MAGIC`]. Sidecar manifests
//! are the manifest bytes alone.

use crate::error::{MockError, MockResult};
use sha2::{Digest, Sha256};

pub const TRAILER_MAGIC: &[u8; 8] = b"C2PAMOCK";
const TRAILER_LEN: usize = 4 + TRAILER_MAGIC.len();

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG APP11 marker used for embeddable manifests
const JPEG_APP11: [u8; 2] = [0xFF, 0xEB];
/// PNG chunk type used for embeddable manifests
const PNG_CHUNK: &[u8; 4] = b"caBX";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Jpeg,
    Png,
    Sidecar,
}

impl AssetFormat {
    /// Parse an extension or MIME type
    pub fn parse(format: &str) -> MockResult<Self> {
        match format.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "image/jpeg" => Ok(AssetFormat::Jpeg),
            "png" | "image/png" => Ok(AssetFormat::Png),
            "c2pa" | "application/c2pa" => Ok(AssetFormat::Sidecar),
            _ => Err(MockError::NotSupported(format!(
                "type is not supported: {format}"
            ))),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AssetFormat::Jpeg => "image/jpeg",
            AssetFormat::Png => "image/png",
            AssetFormat::Sidecar => "application/c2pa",
        }
    }

    /// Check the asset bytes are plausibly of this format
    pub fn check_magic(&self, asset: &[u8]) -> MockResult<()> {
        let ok = match self {
            AssetFormat::Jpeg => asset.starts_with(JPEG_MAGIC),
            AssetFormat::Png => asset.starts_with(PNG_MAGIC),
            AssetFormat::Sidecar => true,
        };
        if ok {
            Ok(())
        } else {
            Err(MockError::InvalidAsset(format!(
                "asset is not a valid {}",
                self.mime_type()
            )))
        }
    }

    /// Wrap manifest bytes for insertion into an asset of this format
    ///
    /// Deterministic, so wrapping the same bytes twice yields identical
    /// output.
    pub fn embeddable(&self, manifest: &[u8]) -> MockResult<Vec<u8>> {
        let len = u32::try_from(manifest.len())
            .map_err(|_| MockError::BadParam("manifest too large to embed".to_string()))?;
        let wrapped = match self {
            AssetFormat::Jpeg => {
                let mut out = Vec::with_capacity(manifest.len() + 6);
                out.extend_from_slice(&JPEG_APP11);
                out.extend_from_slice(&len.to_be_bytes());
                out.extend_from_slice(manifest);
                out
            }
            AssetFormat::Png => {
                let mut out = Vec::with_capacity(manifest.len() + 12);
                out.extend_from_slice(&len.to_be_bytes());
                out.extend_from_slice(PNG_CHUNK);
                out.extend_from_slice(manifest);
                let digest = Sha256::digest(manifest);
                out.extend_from_slice(&digest[..4]);
                out
            }
            AssetFormat::Sidecar => manifest.to_vec(),
        };
        Ok(wrapped)
    }
}

/// Split a container into asset bytes and manifest bytes
///
/// Sidecars are all manifest. Returns `None` for the manifest when the
/// asset carries none.
pub fn split(format: AssetFormat, bytes: &[u8]) -> (&[u8], Option<&[u8]>) {
    if format == AssetFormat::Sidecar {
        return (&[], Some(bytes));
    }
    if bytes.len() < TRAILER_LEN || !bytes.ends_with(TRAILER_MAGIC) {
        return (bytes, None);
    }
    let len_at = bytes.len() - TRAILER_LEN;
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&bytes[len_at..len_at + 4]);
    let manifest_len = u32::from_le_bytes(len_bytes) as usize;
    match len_at.checked_sub(manifest_len) {
        Some(start) => (&bytes[..start], Some(&bytes[start..len_at])),
        None => (bytes, None),
    }
}

/// Attach manifest bytes to an asset
pub fn join(format: AssetFormat, asset: &[u8], manifest: &[u8]) -> Vec<u8> {
    if format == AssetFormat::Sidecar {
        return manifest.to_vec();
    }
    let mut out = Vec::with_capacity(asset.len() + manifest.len() + TRAILER_LEN);
    out.extend_from_slice(asset);
    out.extend_from_slice(manifest);
    out.extend_from_slice(&(manifest.len() as u32).to_le_bytes());
    out.extend_from_slice(TRAILER_MAGIC);
    out
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
