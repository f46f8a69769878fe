//! Bridge behavior against engines that bend the C ABI contract

mod common;

use c2pa_bridge::c2pa_bridge_ffi::{C2paBuilder, C2paSigner, C2paStream};
use c2pa_bridge::{Builder, Engine, ErrorKind, Signer, SigningAlg};
use c2pa_bridge_mock::CStream;
use c2pa_bridge_mock::fixtures::test_signature;
use common::{MANIFEST_JSON, certs, jpeg_asset};
use std::ffi::{c_char, c_int};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reports sixteen bytes but never hands over a buffer
unsafe extern "C" fn format_embeddable_without_buffer(
    _format: *const c_char,
    _manifest_bytes: *const u8,
    _manifest_len: usize,
    _result: *mut *const u8,
) -> i64 {
    16
}

/// Retries a failed sign once, hiding the first failure from the caller
unsafe extern "C" fn builder_sign_with_retry(
    builder: *mut C2paBuilder,
    format: *const c_char,
    source: *mut C2paStream,
    dest: *mut C2paStream,
    signer: *mut C2paSigner,
    manifest_bytes: *mut *const u8,
) -> i64 {
    let sign = c2pa_bridge_mock::api().builder_sign;
    // SAFETY: arguments are passed through unchanged
    let first = unsafe { sign(builder, format, source, dest, signer, manifest_bytes) };
    if first >= 0 {
        return first;
    }
    // SAFETY: as above
    unsafe { sign(builder, format, source, dest, signer, manifest_bytes) }
}

/// Rewinds the source after a failed add, as engines do before giving up
unsafe extern "C" fn add_resource_then_rewind(
    builder: *mut C2paBuilder,
    uri: *const c_char,
    source: *mut C2paStream,
) -> c_int {
    // SAFETY: arguments are passed through unchanged
    let status = unsafe { (c2pa_bridge_mock::api().builder_add_resource)(builder, uri, source) };
    if status < 0 {
        // SAFETY: the mock engine's streams are CStreams
        if let Some(stream) = unsafe { source.cast::<CStream>().as_mut() } {
            let _ = stream.seek(SeekFrom::Start(0));
        }
    }
    status
}

struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FullDisk {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Ok(0)
    }
}

/// Reader whose second read fails
struct DroppedConnection {
    inner: Cursor<Vec<u8>>,
    reads: usize,
}

impl Read for DroppedConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        if self.reads > 1 {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "network dropped"));
        }
        let n = buf.len().min(4);
        self.inner.read(&mut buf[..n])
    }
}

impl Seek for DroppedConnection {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[test]
fn test_byte_count_without_buffer_is_engine_error() {
    let mut api = c2pa_bridge_mock::api();
    api.format_embeddable = format_embeddable_without_buffer;
    let engine = Arc::new(Engine::from_api(api));

    let err = Builder::format_embeddable(&engine, "jpg", b"manifest")
        .expect_err("A count with no buffer should fail");

    assert_eq!(err.kind(), ErrorKind::Engine);
}

#[test]
fn test_recovered_callback_failure_is_not_blamed_for_later_sign() {
    let mut api = c2pa_bridge_mock::api();
    api.builder_sign = builder_sign_with_retry;
    let engine = Arc::new(Engine::from_api(api));
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let signer = Signer::from_callback(&engine, SigningAlg::Es256, certs(), None, move |data: &[u8]| {
        if seen.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err("token not ready".to_string());
        }
        Ok(test_signature(data))
    })
    .expect("Should create signer");
    let builder = Builder::from_json(&engine, MANIFEST_JSON).expect("Should create builder");

    builder
        .sign("jpg", &mut Cursor::new(jpeg_asset()), &mut Cursor::new(Vec::new()), &signer)
        .expect("Retried sign should succeed");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let err = builder
        .sign("jpg", &mut Cursor::new(jpeg_asset()), &mut FullDisk, &signer)
        .expect_err("Full destination should fail");

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.message().contains("disk full"), "message: {}", err.message());
    assert!(!err.message().contains("token not ready"), "message: {}", err.message());
}

#[test]
fn test_source_failure_survives_engine_rewind() {
    let mut api = c2pa_bridge_mock::api();
    api.builder_add_resource = add_resource_then_rewind;
    let engine = Arc::new(Engine::from_api(api));
    let mut builder = Builder::from_json(&engine, MANIFEST_JSON).expect("Should create builder");
    let mut source = DroppedConnection {
        inner: Cursor::new(vec![7u8; 64]),
        reads: 0,
    };

    let err = builder
        .add_resource("thumbnail.jpg", &mut source)
        .expect_err("Dropped source should fail");

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.message().contains("network dropped"), "message: {}", err.message());
}
