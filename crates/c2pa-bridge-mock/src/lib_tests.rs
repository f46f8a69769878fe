#![allow(non_snake_case)]

use super::*;
use crate::fixtures::{MANIFEST_JSON, TEST_CERTS, test_sign_callback};
use c2pa_bridge_core::SigningAlg;
use std::ffi::{CStr, CString};
use std::ptr;

fn take_string(api: &EngineApi, ptr: *mut std::ffi::c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let s = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    unsafe { (api.string_free)(ptr) };
    Some(s)
}

#[test]
fn api___version___names_both_layers() {
    let api = api();

    let version = take_string(&api, unsafe { (api.version)() }).unwrap();

    assert!(version.starts_with("c2pa-c/"));
    assert!(version.contains("c2pa-mock/"));
}

#[test]
fn api___error___is_cleared_after_reading() {
    let api = api();
    let bad = CString::new("{oops").unwrap();

    let builder = unsafe { (api.builder_from_json)(bad.as_ptr()) };

    assert!(builder.is_null());
    let first = take_string(&api, unsafe { (api.error)() }).unwrap();
    assert!(first.starts_with("Json: "));
    assert_eq!(take_string(&api, unsafe { (api.error)() }), None);
}

#[test]
fn api___null_argument___reports_null_parameter() {
    let api = api();

    let reader = unsafe { (api.reader_from_stream)(ptr::null(), ptr::null_mut()) };

    assert!(reader.is_null());
    let err = take_string(&api, unsafe { (api.error)() }).unwrap();
    assert!(err.starts_with("NullParameter: "));
}

#[test]
fn api___format_embeddable_null_out_pointer___fails() {
    let api = api();
    let format = CString::new("jpg").unwrap();
    let manifest = b"manifest";

    let n = unsafe {
        (api.format_embeddable)(format.as_ptr(), manifest.as_ptr(), manifest.len(), ptr::null_mut())
    };

    assert_eq!(n, -1);
    let _ = take_string(&api, unsafe { (api.error)() });
}

#[test]
fn api___format_embeddable___buffer_is_freed_once() {
    let api = api();
    let format = CString::new("jpg").unwrap();
    let manifest = b"manifest";
    let mut out: *const u8 = ptr::null();

    let n = unsafe {
        (api.format_embeddable)(format.as_ptr(), manifest.as_ptr(), manifest.len(), &mut out)
    };

    assert_eq!(n, 6 + manifest.len() as i64);
    assert!(memory::free_bytes(out));
    assert!(!memory::free_bytes(out));
}

#[test]
fn api___signer_create___reserve_size_matches_alg() {
    let api = api();
    let certs = CString::new(TEST_CERTS).unwrap();

    let signer = unsafe {
        (api.signer_create)(
            ptr::null(),
            test_sign_callback,
            SigningAlg::Es384,
            certs.as_ptr(),
            ptr::null(),
        )
    };

    assert!(!signer.is_null());
    let size = unsafe { (api.signer_reserve_size)(signer) };
    assert_eq!(size as usize, 96 + TEST_CERTS.len());
    unsafe { (api.signer_free)(signer) };
}

#[test]
fn api___builder_set_remote_url___succeeds_on_live_builder() {
    let api = api();
    let json = CString::new(MANIFEST_JSON).unwrap();
    let url = CString::new("https://example.com/m").unwrap();

    let builder = unsafe { (api.builder_from_json)(json.as_ptr()) };
    let status = unsafe { (api.builder_set_remote_url)(builder, url.as_ptr()) };

    assert_eq!(status, 0);
    unsafe { (api.builder_free)(builder) };
}

#[test]
fn engine___from_api___reports_version() {
    let engine = engine();

    assert!(engine.version().unwrap().contains("c2pa-mock"));
}
