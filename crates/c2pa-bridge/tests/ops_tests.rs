//! Process-level operations: version, settings and path-based helpers

mod common;

use c2pa_bridge::{
    Builder, ErrorKind, SettingsFormat, SigningAlg, load_settings, read_file,
    read_ingredient_file, sign_file, version,
};
use common::{MANIFEST_JSON, callback_signer, engine, jpeg_asset, key_info};
use std::io::Cursor;

#[test]
fn test_version_names_engine() {
    let engine = engine();

    let v = version(&engine).expect("Should get version");

    assert!(v.starts_with("c2pa-c/"));
}

#[test]
fn test_load_settings_accepts_json_and_toml() {
    let engine = engine();

    load_settings(&engine, SettingsFormat::Json, r#"{"verify": {"verify_after_sign": false}}"#)
        .expect("Should load JSON settings");
    load_settings(&engine, SettingsFormat::Toml, "[verify]\nverify_after_sign = false\n")
        .expect("Should load TOML settings");

    let current = c2pa_bridge_mock::current_settings();
    assert_eq!(current["verify"]["verify_after_sign"], false);
}

#[test]
fn test_load_settings_rejects_malformed_input() {
    let engine = engine();

    let err = load_settings(&engine, SettingsFormat::Json, "{oops")
        .expect_err("Malformed settings should fail");

    assert_eq!(err.kind(), ErrorKind::Construction);
}

#[test]
fn test_read_file_of_plain_asset_is_none() {
    let engine = engine();
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("plain.jpg");
    std::fs::write(&path, jpeg_asset()).expect("Should write asset");

    let json = read_file(&engine, &path, None).expect("Should not fail");

    assert!(json.is_none());
}

#[test]
fn test_read_file_missing_is_not_found() {
    let engine = engine();
    let dir = tempfile::tempdir().expect("Should create temp dir");

    let err = read_file(&engine, dir.path().join("missing.jpg"), None)
        .expect_err("Missing file should fail");

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!err.is_manifest_not_found());
}

#[test]
fn test_sign_file_then_read_file_writes_data_dir() {
    let engine = engine();
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let source = dir.path().join("in.jpg");
    let dest = dir.path().join("signed/out.jpg");
    let resources = dir.path().join("resources");
    let data_dir = dir.path().join("data");
    std::fs::write(&source, jpeg_asset()).expect("Should write source");
    std::fs::create_dir_all(&resources).expect("Should create resource dir");
    std::fs::write(resources.join("thumb.jpg"), b"thumb").expect("Should write resource");

    let signed_json = sign_file(
        &engine,
        &source,
        &dest,
        MANIFEST_JSON,
        &key_info(SigningAlg::Es256),
        Some(&resources),
    )
    .expect("Should sign file");
    let read_json = read_file(&engine, &dest, Some(&data_dir))
        .expect("Should read file")
        .expect("Should have manifest");

    assert_eq!(signed_json, read_json);
    assert!(data_dir.join("manifest_store.json").exists());
    assert_eq!(std::fs::read(data_dir.join("thumb.jpg")).expect("Should read resource"), b"thumb");
}

#[test]
fn test_read_ingredient_file_describes_signed_parent() {
    let engine = engine();
    let signer = callback_signer(&engine, SigningAlg::Es256);
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let parent = dir.path().join("parent.jpg");
    let builder = Builder::from_json(&engine, MANIFEST_JSON).expect("Should create builder");
    let mut signed = Cursor::new(Vec::new());
    builder
        .sign("jpg", &mut Cursor::new(jpeg_asset()), &mut signed, &signer)
        .expect("Should sign");
    std::fs::write(&parent, signed.into_inner()).expect("Should write parent");

    let json = read_ingredient_file(&engine, &parent, None).expect("Should describe ingredient");

    let value: serde_json::Value = serde_json::from_str(&json).expect("Should parse JSON");
    assert_eq!(value["title"], "parent.jpg");
    assert_eq!(value["format"], "image/jpeg");
    assert!(value["active_manifest"].is_string());
}
