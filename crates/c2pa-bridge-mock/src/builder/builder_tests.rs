#![allow(non_snake_case)]

use super::*;
use crate::fixtures::{
    INGREDIENT_JSON, MANIFEST_JSON, MemoryStream, TEST_CERTS, TEST_PRIVATE_KEY, jpeg_asset,
    png_asset,
};
use crate::reader::MockReader;

fn key_signer() -> MockSigner {
    MockSigner::with_key("es256", TEST_CERTS, TEST_PRIVATE_KEY, None).unwrap()
}

fn sign_jpeg(builder: &MockBuilder) -> (Vec<u8>, Vec<u8>) {
    let mut source = MemoryStream::new(jpeg_asset());
    let mut dest = MemoryStream::default();
    let manifest = builder
        .sign("image/jpeg", &mut source.cstream(), &mut dest.cstream(), &key_signer())
        .unwrap();
    (dest.into_bytes(), manifest)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn MockBuilder___from_json___accepts_object() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();

    assert_eq!(builder.resource_count(), 0);
    assert_eq!(builder.ingredient_count(), 0);
}

#[test]
fn MockBuilder___from_json___malformed_is_json_error() {
    let err = MockBuilder::from_json("{not json").unwrap_err();

    assert!(matches!(err, MockError::Json(_)));
}

#[test]
fn MockBuilder___from_json___array_is_rejected() {
    let err = MockBuilder::from_json("[]").unwrap_err();

    assert!(err.to_string().contains("must be an object"));
}

// ============================================================================
// Signing
// ============================================================================

#[test]
fn MockBuilder___sign___output_reads_back_with_title() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();

    let (signed, manifest) = sign_jpeg(&builder);

    assert!(!manifest.is_empty());
    let reader = MockReader::from_bytes(AssetFormat::Jpeg, &signed).unwrap();
    let store: Value = serde_json::from_str(&reader.json()).unwrap();
    let label = store["active_manifest"].as_str().unwrap();
    assert_eq!(store["manifests"][label]["title"], "test image");
}

#[test]
fn MockBuilder___sign___returned_bytes_match_embedded_manifest() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();

    let (signed, manifest) = sign_jpeg(&builder);

    let (_, embedded) = format::split(AssetFormat::Jpeg, &signed);
    assert_eq!(embedded, Some(manifest.as_slice()));
}

#[test]
fn MockBuilder___sign_signed_asset___replaces_manifest() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let (first, _) = sign_jpeg(&builder);

    let mut source = MemoryStream::new(first);
    let mut dest = MemoryStream::default();
    builder
        .sign("jpg", &mut source.cstream(), &mut dest.cstream(), &key_signer())
        .unwrap();

    let (asset, _) = format::split(AssetFormat::Jpeg, dest.bytes());
    assert_eq!(asset, jpeg_asset().as_slice());
}

#[test]
fn MockBuilder___sign_with_no_embed___output_is_bare_asset() {
    let mut builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    builder.set_no_embed();

    let (signed, manifest) = sign_jpeg(&builder);

    assert_eq!(signed, jpeg_asset());
    assert!(!manifest.is_empty());
}

#[test]
fn MockBuilder___sign_with_remote_url___records_url() {
    let mut builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    builder.set_remote_url("https://example.com/manifest.c2pa");

    let (signed, _) = sign_jpeg(&builder);

    let reader = MockReader::from_bytes(AssetFormat::Jpeg, &signed).unwrap();
    assert!(reader.json().contains("https://example.com/manifest.c2pa"));
}

#[test]
fn MockBuilder___sign_mismatched_format___is_invalid_asset() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let mut source = MemoryStream::new(png_asset());
    let mut dest = MemoryStream::default();

    let err = builder
        .sign("image/jpeg", &mut source.cstream(), &mut dest.cstream(), &key_signer())
        .unwrap_err();

    assert!(matches!(err, MockError::InvalidAsset(_)));
    assert!(dest.bytes().is_empty());
}

// ============================================================================
// Resources and ingredients
// ============================================================================

#[test]
fn MockBuilder___add_resource___readable_after_signing() {
    let mut builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let mut thumb = MemoryStream::new(b"thumbnail bytes".to_vec());
    builder.add_resource("thumb.jpg", &mut thumb.cstream()).unwrap();

    let (signed, _) = sign_jpeg(&builder);

    let reader = MockReader::from_bytes(AssetFormat::Jpeg, &signed).unwrap();
    assert_eq!(reader.envelope().resource("thumb.jpg").unwrap(), b"thumbnail bytes");
}

#[test]
fn MockBuilder___add_ingredient_from_signed_asset___records_active_manifest() {
    let parent_builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let (parent, _) = sign_jpeg(&parent_builder);
    let parent_label = MockReader::from_bytes(AssetFormat::Jpeg, &parent)
        .unwrap()
        .envelope()
        .active_label()
        .map(str::to_string)
        .unwrap();

    let mut builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let mut source = MemoryStream::new(parent);
    builder
        .add_ingredient(INGREDIENT_JSON, "image/jpeg", &mut source.cstream())
        .unwrap();

    assert_eq!(builder.ingredient_count(), 1);
    let (signed, _) = sign_jpeg(&builder);
    let json = MockReader::from_bytes(AssetFormat::Jpeg, &signed).unwrap().json();
    assert!(json.contains(&parent_label));
    assert!(json.contains("parentOf"));
}

#[test]
fn MockBuilder___add_ingredient_bad_format___is_not_supported() {
    let mut builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let mut source = MemoryStream::new(jpeg_asset());

    let err = builder
        .add_ingredient(INGREDIENT_JSON, "image/gif", &mut source.cstream())
        .unwrap_err();

    assert!(matches!(err, MockError::NotSupported(_)));
    assert_eq!(builder.ingredient_count(), 0);
}

// ============================================================================
// Archives
// ============================================================================

#[test]
fn MockBuilder___archive_round_trip___keeps_resources_and_options() {
    let mut builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let mut thumb = MemoryStream::new(b"thumb".to_vec());
    builder.add_resource("thumb.jpg", &mut thumb.cstream()).unwrap();
    builder.set_remote_url("https://example.com/m");
    builder.set_no_embed();

    let mut archive = MemoryStream::default();
    builder.to_archive(&mut archive.cstream()).unwrap();
    let mut source = MemoryStream::new(archive.into_bytes());
    let restored = MockBuilder::from_archive(&mut source.cstream()).unwrap();

    assert_eq!(restored.resource_count(), 1);
    assert_eq!(restored.remote_url.as_deref(), Some("https://example.com/m"));
    assert!(restored.no_embed);
    assert_eq!(restored.definition, builder.definition);
}

#[test]
fn MockBuilder___from_archive_garbage___is_bad_param() {
    let mut source = MemoryStream::new(b"not a zip".to_vec());

    let err = MockBuilder::from_archive(&mut source.cstream()).unwrap_err();

    assert!(err.to_string().starts_with("BadParam: invalid archive"));
}

// ============================================================================
// Data-hashed flow
// ============================================================================

#[test]
fn MockBuilder___placeholder___is_at_least_reserved_size() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();

    let placeholder = builder.data_hashed_placeholder(1000, "image/jpeg").unwrap();

    assert!(placeholder.len() >= 1000);
    assert_eq!(&placeholder[..2], &[0xFF, 0xEB]);
}

#[test]
fn MockBuilder___placeholder_zero_size___is_bad_param() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();

    let err = builder.data_hashed_placeholder(0, "image/jpeg").unwrap_err();

    assert!(matches!(err, MockError::BadParam(_)));
}

#[test]
fn MockBuilder___embeddable_with_asset___fills_empty_hash() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let asset = jpeg_asset();
    let expected = hash_excluding(&asset, &[(20u64, 10u64)]);
    let mut stream = MemoryStream::new(asset);
    let data_hash = r#"{"exclusions": [{"start": 20, "length": 10}]}"#;

    let embeddable = builder
        .sign_data_hashed_embeddable(&key_signer(), data_hash, "image/jpeg", Some(&mut stream.cstream()))
        .unwrap();

    let text = String::from_utf8_lossy(&embeddable[6..]);
    assert!(text.contains(&expected));
    assert!(text.contains("c2pa.hash.data"));
}

#[test]
fn MockBuilder___embeddable_with_wrong_hash___is_hash_mismatch() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let mut stream = MemoryStream::new(jpeg_asset());
    let data_hash = r#"{"alg": "sha256", "hash": "00ff", "exclusions": []}"#;

    let err = builder
        .sign_data_hashed_embeddable(&key_signer(), data_hash, "jpg", Some(&mut stream.cstream()))
        .unwrap_err();

    assert!(matches!(err, MockError::HashMismatch(_)));
}

#[test]
fn MockBuilder___embeddable_without_asset_or_hash___is_bad_param() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();

    let err = builder
        .sign_data_hashed_embeddable(&key_signer(), "{}", "jpg", None)
        .unwrap_err();

    assert!(matches!(err, MockError::BadParam(_)));
}

#[test]
fn MockBuilder___embeddable_with_given_hash___needs_no_asset() {
    let builder = MockBuilder::from_json(MANIFEST_JSON).unwrap();
    let data_hash = r#"{"hash": "abcdef"}"#;

    let embeddable = builder
        .sign_data_hashed_embeddable(&key_signer(), data_hash, "png", None)
        .unwrap();

    assert_eq!(&embeddable[4..8], b"caBX");
}

#[test]
fn hash_excluding___no_exclusions___is_plain_sha256() {
    let none: [(u64, u64); 0] = [];

    assert_eq!(hash_excluding(b"abc", &none), sha256_hex(b"abc"));
}

#[test]
fn hash_excluding___overlapping_ranges___skip_union() {
    let bytes = b"0123456789";

    let hashed = hash_excluding(bytes, &[(2u64, 3u64), (4, 3)]);

    assert_eq!(hashed, sha256_hex(b"01789"));
}

#[test]
fn hash_excluding___range_past_end___is_clamped() {
    let hashed = hash_excluding(b"abcdef", &[(4u64, 100u64)]);

    assert_eq!(hashed, sha256_hex(b"abcd"));
}
