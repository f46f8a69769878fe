//! Engine-side manifest reader

use crate::error::{MockError, MockResult};
use crate::format::{self, AssetFormat};
use crate::store::Envelope;
use crate::stream::CStream;
use std::io::Write;

pub struct MockReader {
    format: AssetFormat,
    envelope: Envelope,
}

impl MockReader {
    pub fn from_stream(format: &str, source: &mut CStream) -> MockResult<Self> {
        let format = AssetFormat::parse(format)?;
        let bytes = source.read_all()?;
        Self::from_bytes(format, &bytes)
    }

    pub fn from_bytes(format: AssetFormat, bytes: &[u8]) -> MockResult<Self> {
        let (asset, manifest) = format::split(format, bytes);
        let Some(manifest) = manifest else {
            format.check_magic(asset)?;
            return Err(MockError::ManifestNotFound("no JUMBF data found".to_string()));
        };
        if manifest.is_empty() {
            return Err(MockError::ManifestNotFound("no JUMBF data found".to_string()));
        }
        let envelope = Envelope::from_bytes(manifest)?;
        Ok(Self { format, envelope })
    }

    pub fn format(&self) -> AssetFormat {
        self.format
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn json(&self) -> String {
        self.envelope.store_json()
    }

    /// Write the resource at `uri` to `dest`; returns its length
    pub fn resource_to_stream(&self, uri: &str, dest: &mut CStream) -> MockResult<usize> {
        let bytes = self.envelope.resource(uri)?;
        dest.write_all(&bytes)?;
        dest.flush()?;
        Ok(bytes.len())
    }
}
