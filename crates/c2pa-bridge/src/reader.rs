//! Manifest store reader

use crate::util::{create_file, format_from_path, open_file};
use c2pa_bridge_core::{BridgeResult, ErrorKind};
use c2pa_bridge_ffi::{
    Engine, OwnedHandle, OwnedStreamBridge, ReaderHandle, StreamBridge, WriteSeek, to_cstring,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::Arc;

struct ReaderInner {
    // Released before the stream the engine may still read from.
    handle: ReaderHandle,
    source: OwnedStreamBridge,
}

/// An open manifest store
///
/// Owns its source stream for its whole lifetime, since the engine may read
/// from it lazily.
pub struct Reader {
    inner: Mutex<ReaderInner>,
    format: String,
}

impl Reader {
    /// Open the manifest store embedded in `stream`
    ///
    /// Returns `Ok(None)` when the asset carries no manifest.
    pub fn from_stream<R>(engine: &Arc<Engine>, format: &str, stream: R) -> BridgeResult<Option<Self>>
    where
        R: Read + Seek + Send + 'static,
    {
        let format_c = to_cstring(format, "format")?;
        let mut source = OwnedStreamBridge::new(engine, Box::new(stream))?;
        let stream_ptr = source.as_ptr();

        let created = engine.invoke_ptr(ErrorKind::Construction, |api| {
            // SAFETY: both pointers are valid for the call
            unsafe { (api.reader_from_stream)(format_c.as_ptr(), stream_ptr) }
        });
        let raw = match created {
            Ok(raw) => raw,
            Err(err) if err.is_manifest_not_found() => {
                tracing::debug!(format, "asset has no manifest store");
                return Ok(None);
            }
            Err(err) => return Err(source.bridge_mut().attribute(err)),
        };

        Ok(Some(Self {
            inner: Mutex::new(ReaderInner {
                // SAFETY: fresh handle from c2pa_reader_from_stream
                handle: unsafe { OwnedHandle::from_raw(Arc::clone(engine), raw) },
                source,
            }),
            format: format.to_string(),
        }))
    }

    /// Open the manifest store of the file at `path`
    ///
    /// The format is the file extension.
    pub fn from_file(engine: &Arc<Engine>, path: impl AsRef<Path>) -> BridgeResult<Option<Self>> {
        let path = path.as_ref();
        let format = format_from_path(path)?;
        let file = open_file(path)?;
        Self::from_stream(engine, &format, BufReader::new(file))
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// The manifest store as a JSON string
    pub fn json(&self) -> BridgeResult<String> {
        let mut inner = self.inner.lock();
        inner.source.bridge_mut().clear_last_error();
        let raw = inner.handle.as_ptr();
        let result = inner.handle.engine().invoke_string(ErrorKind::Engine, |api| {
            // SAFETY: the handle is live while locked
            unsafe { (api.reader_json)(raw) }
        });
        result.map_err(|err| inner.source.bridge_mut().attribute(err))
    }

    pub fn json_value(&self) -> BridgeResult<Value> {
        Ok(serde_json::from_str(&self.json()?)?)
    }

    /// Label of the active manifest, if the store names one
    pub fn active_label(&self) -> BridgeResult<Option<String>> {
        Ok(self
            .json_value()?
            .get("active_manifest")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Write the resource named `uri` to `dest`; returns bytes written
    pub fn get_resource<W>(&self, uri: &str, dest: &mut W) -> BridgeResult<u64>
    where
        W: std::io::Write + Seek,
    {
        let uri_c = to_cstring(uri, "uri")?;
        let inner = self.inner.lock();
        let engine = Arc::clone(inner.handle.engine());
        let mut sink = StreamBridge::writer(&engine, dest as &mut dyn WriteSeek)?;
        let raw = inner.handle.as_ptr();
        let sink_ptr = sink.as_ptr();

        let written = engine.invoke_status(ErrorKind::Engine, |api| {
            // SAFETY: reader and stream are live for the call
            unsafe { (api.reader_resource_to_stream)(raw, uri_c.as_ptr(), sink_ptr) }
        });
        written.map_err(|err| sink.attribute(err))
    }

    /// Write the resource named `uri` to a new file at `path`
    pub fn get_resource_to_file(&self, uri: &str, path: impl AsRef<Path>) -> BridgeResult<u64> {
        let mut file = create_file(path.as_ref())?;
        self.get_resource(uri, &mut file)
    }
}

impl std::fmt::Debug for Reader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
