//! The `c2pa_*` entry points
//!
//! These mirror the engine's C ABI. They are not exported by symbol name;
//! [`crate::api`] collects them into an [`EngineApi`](c2pa_bridge_ffi::EngineApi)
//! table instead. Failures record a message in the last-error slot and
//! return null or a negative value.

#![allow(clippy::missing_safety_doc)]

use crate::builder::MockBuilder;
use crate::error::{MockError, MockResult, set_last_error, take_last_error};
use crate::files;
use crate::format::AssetFormat;
use crate::memory::{
    self, LIVE_BUILDERS, LIVE_READERS, LIVE_SIGNERS, LIVE_STREAMS, alloc_bytes, alloc_string,
};
use crate::reader::MockReader;
use crate::settings;
use crate::signer::MockSigner;
use crate::stream::CStream;
use c2pa_bridge_core::SigningAlg;
use c2pa_bridge_ffi::types::{
    C2paBuilder, C2paReader, C2paSigner, C2paSignerInfo, C2paStream, FlushCallback, ReadCallback,
    SeekCallback, SignerCallback, StreamContext, WriteCallback,
};
use std::ffi::{CStr, c_char, c_int, c_void};
use std::path::Path;

fn fail<T>(err: MockError, sentinel: T) -> T {
    set_last_error(&err);
    sentinel
}

fn null_param<T>(name: &str, sentinel: T) -> T {
    fail(MockError::NullParameter(name.to_string()), sentinel)
}

unsafe fn cstr<'a>(ptr: *const c_char, name: &str) -> MockResult<&'a str> {
    if ptr.is_null() {
        return Err(MockError::NullParameter(name.to_string()));
    }
    // SAFETY: non-null pointers are NUL-terminated strings from the host
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|e| MockError::BadParam(format!("{name} is not UTF-8: {e}")))
}

unsafe fn optional_cstr<'a>(ptr: *const c_char, name: &str) -> MockResult<Option<&'a str>> {
    if ptr.is_null() {
        Ok(None)
    } else {
        // SAFETY: forwarded
        unsafe { cstr(ptr, name) }.map(Some)
    }
}

unsafe fn stream<'a>(ptr: *mut C2paStream) -> MockResult<&'a mut CStream> {
    // SAFETY: stream handles are boxed CStreams from c2pa_create_stream
    unsafe { ptr.cast::<CStream>().as_mut() }
        .ok_or_else(|| MockError::NullParameter("stream".to_string()))
}

unsafe fn builder<'a>(ptr: *mut C2paBuilder) -> MockResult<&'a mut MockBuilder> {
    // SAFETY: builder handles are boxed MockBuilders
    unsafe { ptr.cast::<MockBuilder>().as_mut() }
        .ok_or_else(|| MockError::NullParameter("builder".to_string()))
}

unsafe fn reader<'a>(ptr: *mut C2paReader) -> MockResult<&'a MockReader> {
    // SAFETY: reader handles are boxed MockReaders
    unsafe { ptr.cast::<MockReader>().as_ref() }
        .ok_or_else(|| MockError::NullParameter("reader".to_string()))
}

unsafe fn signer<'a>(ptr: *mut C2paSigner) -> MockResult<&'a MockSigner> {
    // SAFETY: signer handles are boxed MockSigners
    unsafe { ptr.cast::<MockSigner>().as_ref() }
        .ok_or_else(|| MockError::NullParameter("signer".to_string()))
}

/// Report a string result, or record the error and return null
fn string_result(result: MockResult<String>) -> *mut c_char {
    match result {
        Ok(s) => alloc_string(s),
        Err(e) => fail(e, std::ptr::null_mut()),
    }
}

fn status_result(result: MockResult<()>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(e) => fail(e, -1),
    }
}

/// Hand `bytes` to the host through `out`; returns the length
unsafe fn bytes_result(result: MockResult<Vec<u8>>, out: *mut *const u8) -> i64 {
    match result {
        Ok(bytes) => {
            let (ptr, len) = alloc_bytes(bytes);
            // SAFETY: out was checked non-null by the caller
            unsafe { *out = ptr };
            len
        }
        Err(e) => fail(e, -1),
    }
}

fn into_handle<T, H>(value: T, counter: &std::sync::atomic::AtomicIsize) -> *mut H {
    memory::retain(counter);
    Box::into_raw(Box::new(value)).cast::<H>()
}

unsafe fn free_handle<T, H>(ptr: *mut H, counter: &std::sync::atomic::AtomicIsize) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: ptr came from into_handle::<T, H> and is released once
    drop(unsafe { Box::from_raw(ptr.cast::<T>()) });
    memory::release(counter);
}

pub unsafe extern "C" fn c2pa_version() -> *mut c_char {
    let v = env!("CARGO_PKG_VERSION");
    alloc_string(format!("c2pa-c/{v} c2pa-mock/{v}"))
}

pub unsafe extern "C" fn c2pa_error() -> *mut c_char {
    match take_last_error() {
        Some(msg) => alloc_string(msg),
        None => std::ptr::null_mut(),
    }
}

pub unsafe extern "C" fn c2pa_load_settings(
    settings: *const c_char,
    format: *const c_char,
) -> c_int {
    status_result((|| -> MockResult<_> {
        // SAFETY: host strings
        let data = unsafe { cstr(settings, "settings") }?;
        let format = unsafe { cstr(format, "format") }?;
        settings::load(data, format)
    })())
}

pub unsafe extern "C" fn c2pa_string_free(s: *mut c_char) {
    // SAFETY: strings handed out by this engine come from alloc_string
    unsafe { memory::free_string(s) }
}

pub unsafe extern "C" fn c2pa_create_stream(
    context: *mut StreamContext,
    reader: ReadCallback,
    seeker: SeekCallback,
    writer: WriteCallback,
    flusher: FlushCallback,
) -> *mut C2paStream {
    if context.is_null() {
        return null_param("context", std::ptr::null_mut());
    }
    into_handle(CStream::new(context, reader, seeker, writer, flusher), &LIVE_STREAMS)
}

pub unsafe extern "C" fn c2pa_release_stream(stream: *mut C2paStream) {
    // SAFETY: stream handles are boxed CStreams
    unsafe { free_handle::<CStream, _>(stream, &LIVE_STREAMS) }
}

pub unsafe extern "C" fn c2pa_reader_from_stream(
    format: *const c_char,
    source: *mut C2paStream,
) -> *mut C2paReader {
    let result = (|| -> MockResult<_> {
        // SAFETY: host pointers
        let format = unsafe { cstr(format, "format") }?;
        let source = unsafe { stream(source) }?;
        MockReader::from_stream(format, source)
    })();
    match result {
        Ok(r) => into_handle(r, &LIVE_READERS),
        Err(e) => fail(e, std::ptr::null_mut()),
    }
}

pub unsafe extern "C" fn c2pa_reader_json(reader_ptr: *mut C2paReader) -> *mut c_char {
    // SAFETY: host handle
    string_result(unsafe { reader(reader_ptr) }.map(MockReader::json))
}

pub unsafe extern "C" fn c2pa_reader_resource_to_stream(
    reader_ptr: *mut C2paReader,
    uri: *const c_char,
    dest: *mut C2paStream,
) -> i64 {
    let result = (|| -> MockResult<_> {
        // SAFETY: host pointers
        let reader = unsafe { reader(reader_ptr) }?;
        let uri = unsafe { cstr(uri, "uri") }?;
        let dest = unsafe { stream(dest) }?;
        reader.resource_to_stream(uri, dest)
    })();
    match result {
        Ok(n) => n as i64,
        Err(e) => fail(e, -1),
    }
}

pub unsafe extern "C" fn c2pa_reader_free(reader_ptr: *mut C2paReader) {
    // SAFETY: reader handles are boxed MockReaders
    unsafe { free_handle::<MockReader, _>(reader_ptr, &LIVE_READERS) }
}

pub unsafe extern "C" fn c2pa_builder_from_json(json: *const c_char) -> *mut C2paBuilder {
    // SAFETY: host string
    let result = unsafe { cstr(json, "manifest_json") }.and_then(MockBuilder::from_json);
    match result {
        Ok(b) => into_handle(b, &LIVE_BUILDERS),
        Err(e) => fail(e, std::ptr::null_mut()),
    }
}

pub unsafe extern "C" fn c2pa_builder_from_archive(source: *mut C2paStream) -> *mut C2paBuilder {
    // SAFETY: host handle
    let result = unsafe { stream(source) }.and_then(MockBuilder::from_archive);
    match result {
        Ok(b) => into_handle(b, &LIVE_BUILDERS),
        Err(e) => fail(e, std::ptr::null_mut()),
    }
}

pub unsafe extern "C" fn c2pa_builder_set_no_embed(builder_ptr: *mut C2paBuilder) {
    // SAFETY: host handle
    match unsafe { builder(builder_ptr) } {
        Ok(b) => b.set_no_embed(),
        Err(e) => fail(e, ()),
    }
}

pub unsafe extern "C" fn c2pa_builder_set_remote_url(
    builder_ptr: *mut C2paBuilder,
    url: *const c_char,
) -> c_int {
    status_result((|| -> MockResult<_> {
        // SAFETY: host pointers
        let builder = unsafe { builder(builder_ptr) }?;
        let url = unsafe { cstr(url, "remote_url") }?;
        builder.set_remote_url(url);
        Ok(())
    })())
}

pub unsafe extern "C" fn c2pa_builder_add_resource(
    builder_ptr: *mut C2paBuilder,
    uri: *const c_char,
    source: *mut C2paStream,
) -> c_int {
    status_result((|| -> MockResult<_> {
        // SAFETY: host pointers
        let builder = unsafe { builder(builder_ptr) }?;
        let uri = unsafe { cstr(uri, "uri") }?;
        let source = unsafe { stream(source) }?;
        builder.add_resource(uri, source)
    })())
}

pub unsafe extern "C" fn c2pa_builder_add_ingredient_from_stream(
    builder_ptr: *mut C2paBuilder,
    ingredient_json: *const c_char,
    format: *const c_char,
    source: *mut C2paStream,
) -> c_int {
    status_result((|| -> MockResult<_> {
        // SAFETY: host pointers
        let builder = unsafe { builder(builder_ptr) }?;
        let json = unsafe { cstr(ingredient_json, "ingredient_json") }?;
        let format = unsafe { cstr(format, "format") }?;
        let source = unsafe { stream(source) }?;
        builder.add_ingredient(json, format, source)
    })())
}

pub unsafe extern "C" fn c2pa_builder_to_archive(
    builder_ptr: *mut C2paBuilder,
    dest: *mut C2paStream,
) -> c_int {
    status_result((|| -> MockResult<_> {
        // SAFETY: host pointers
        let builder = unsafe { builder(builder_ptr) }?;
        let dest = unsafe { stream(dest) }?;
        builder.to_archive(dest)
    })())
}

pub unsafe extern "C" fn c2pa_builder_sign(
    builder_ptr: *mut C2paBuilder,
    format: *const c_char,
    source: *mut C2paStream,
    dest: *mut C2paStream,
    signer_ptr: *mut C2paSigner,
    manifest_bytes: *mut *const u8,
) -> i64 {
    if manifest_bytes.is_null() {
        return null_param("manifest_bytes", -1);
    }
    let result = (|| -> MockResult<_> {
        // SAFETY: host pointers
        let builder = unsafe { builder(builder_ptr) }?;
        let format = unsafe { cstr(format, "format") }?;
        let source = unsafe { stream(source) }?;
        let dest = unsafe { stream(dest) }?;
        let signer = unsafe { signer(signer_ptr) }?;
        builder.sign(format, source, dest, signer)
    })();
    // SAFETY: out pointer checked above
    unsafe { bytes_result(result, manifest_bytes) }
}

pub unsafe extern "C" fn c2pa_builder_data_hashed_placeholder(
    builder_ptr: *mut C2paBuilder,
    reserved_size: usize,
    format: *const c_char,
    manifest_bytes: *mut *const u8,
) -> i64 {
    if manifest_bytes.is_null() {
        return null_param("manifest_bytes", -1);
    }
    let result = (|| -> MockResult<_> {
        // SAFETY: host pointers
        let builder = unsafe { builder(builder_ptr) }?;
        let format = unsafe { cstr(format, "format") }?;
        builder.data_hashed_placeholder(reserved_size, format)
    })();
    // SAFETY: out pointer checked above
    unsafe { bytes_result(result, manifest_bytes) }
}

pub unsafe extern "C" fn c2pa_builder_sign_data_hashed_embeddable(
    builder_ptr: *mut C2paBuilder,
    signer_ptr: *mut C2paSigner,
    data_hash: *const c_char,
    format: *const c_char,
    asset: *mut C2paStream,
    manifest_bytes: *mut *const u8,
) -> i64 {
    if manifest_bytes.is_null() {
        return null_param("manifest_bytes", -1);
    }
    let result = (|| -> MockResult<_> {
        // SAFETY: host pointers; asset may be null
        let builder = unsafe { builder(builder_ptr) }?;
        let signer = unsafe { signer(signer_ptr) }?;
        let data_hash = unsafe { cstr(data_hash, "data_hash") }?;
        let format = unsafe { cstr(format, "format") }?;
        let asset = unsafe { asset.cast::<CStream>().as_mut() };
        builder.sign_data_hashed_embeddable(signer, data_hash, format, asset)
    })();
    // SAFETY: out pointer checked above
    unsafe { bytes_result(result, manifest_bytes) }
}

pub unsafe extern "C" fn c2pa_format_embeddable(
    format: *const c_char,
    manifest_bytes: *const u8,
    manifest_len: usize,
    result_bytes: *mut *const u8,
) -> i64 {
    if result_bytes.is_null() {
        return null_param("result_bytes", -1);
    }
    let result = (|| -> MockResult<_> {
        // SAFETY: host pointers
        let format = AssetFormat::parse(unsafe { cstr(format, "format") }?)?;
        if manifest_bytes.is_null() {
            return Err(MockError::NullParameter("manifest_bytes".to_string()));
        }
        // SAFETY: the host passes a buffer of manifest_len bytes
        let manifest = unsafe { std::slice::from_raw_parts(manifest_bytes, manifest_len) };
        format.embeddable(manifest)
    })();
    // SAFETY: out pointer checked above
    unsafe { bytes_result(result, result_bytes) }
}

pub unsafe extern "C" fn c2pa_manifest_bytes_free(bytes: *const u8) {
    if !bytes.is_null() && !memory::free_bytes(bytes) {
        tracing::warn!("mock engine asked to free unknown buffer {:p}", bytes);
    }
}

pub unsafe extern "C" fn c2pa_builder_free(builder_ptr: *mut C2paBuilder) {
    // SAFETY: builder handles are boxed MockBuilders
    unsafe { free_handle::<MockBuilder, _>(builder_ptr, &LIVE_BUILDERS) }
}

pub unsafe extern "C" fn c2pa_signer_create(
    context: *const c_void,
    callback: SignerCallback,
    alg: SigningAlg,
    certs: *const c_char,
    tsa_url: *const c_char,
) -> *mut C2paSigner {
    let result = (|| -> MockResult<_> {
        // SAFETY: host strings; tsa_url may be null
        let certs = unsafe { cstr(certs, "certs") }?;
        let tsa_url = unsafe { optional_cstr(tsa_url, "tsa_url") }?;
        MockSigner::with_callback(context, callback, alg, certs, tsa_url)
    })();
    match result {
        Ok(s) => into_handle(s, &LIVE_SIGNERS),
        Err(e) => fail(e, std::ptr::null_mut()),
    }
}

unsafe fn signer_from_info(info: *const C2paSignerInfo) -> MockResult<MockSigner> {
    // SAFETY: host struct
    let info = unsafe { info.as_ref() }
        .ok_or_else(|| MockError::NullParameter("signer_info".to_string()))?;
    // SAFETY: fields are host strings; ta_url may be null
    let alg = unsafe { cstr(info.alg, "alg") }?;
    let certs = unsafe { cstr(info.sign_cert, "sign_cert") }?;
    let key = unsafe { cstr(info.private_key, "private_key") }?;
    let tsa_url = unsafe { optional_cstr(info.ta_url, "ta_url") }?;
    MockSigner::with_key(alg, certs, key, tsa_url)
}

pub unsafe extern "C" fn c2pa_signer_from_info(info: *const C2paSignerInfo) -> *mut C2paSigner {
    // SAFETY: forwarded
    match unsafe { signer_from_info(info) } {
        Ok(s) => into_handle(s, &LIVE_SIGNERS),
        Err(e) => fail(e, std::ptr::null_mut()),
    }
}

pub unsafe extern "C" fn c2pa_signer_reserve_size(signer_ptr: *mut C2paSigner) -> i64 {
    // SAFETY: host handle
    match unsafe { signer(signer_ptr) } {
        Ok(s) => s.reserve_size() as i64,
        Err(e) => fail(e, -1),
    }
}

pub unsafe extern "C" fn c2pa_signer_free(signer_ptr: *mut C2paSigner) {
    // SAFETY: signer handles are boxed MockSigners
    unsafe { free_handle::<MockSigner, _>(signer_ptr, &LIVE_SIGNERS) }
}

pub unsafe extern "C" fn c2pa_read_file(
    path: *const c_char,
    data_dir: *const c_char,
) -> *mut c_char {
    string_result((|| -> MockResult<_> {
        // SAFETY: host strings; data_dir may be null
        let path = unsafe { cstr(path, "path") }?;
        let data_dir = unsafe { optional_cstr(data_dir, "data_dir") }?;
        files::read_file(Path::new(path), data_dir.map(Path::new))
    })())
}

pub unsafe extern "C" fn c2pa_read_ingredient_file(
    path: *const c_char,
    data_dir: *const c_char,
) -> *mut c_char {
    string_result((|| -> MockResult<_> {
        // SAFETY: host strings; data_dir may be null
        let path = unsafe { cstr(path, "path") }?;
        let data_dir = unsafe { optional_cstr(data_dir, "data_dir") }?;
        files::read_ingredient_file(Path::new(path), data_dir.map(Path::new))
    })())
}

pub unsafe extern "C" fn c2pa_sign_file(
    source_path: *const c_char,
    dest_path: *const c_char,
    manifest: *const c_char,
    signer_info: *const C2paSignerInfo,
    data_dir: *const c_char,
) -> *mut c_char {
    string_result((|| -> MockResult<_> {
        // SAFETY: host pointers; data_dir may be null
        let source = unsafe { cstr(source_path, "source_path") }?;
        let dest = unsafe { cstr(dest_path, "dest_path") }?;
        let manifest = unsafe { cstr(manifest, "manifest") }?;
        let signer = unsafe { signer_from_info(signer_info) }?;
        let data_dir = unsafe { optional_cstr(data_dir, "data_dir") }?;
        files::sign_file(
            Path::new(source),
            Path::new(dest),
            manifest,
            &signer,
            data_dir.map(Path::new),
        )
    })())
}
