//! Every engine object handed to the host is released exactly once
//!
//! Live counts are process-wide, so the tests in this binary run one at a
//! time behind a lock.

mod common;

use c2pa_bridge::{Builder, Reader, SigningAlg};
use c2pa_bridge_mock::live_counts;
use common::{INGREDIENT_JSON, MANIFEST_JSON, callback_signer, engine, jpeg_asset, key_signer};
use parking_lot::Mutex;
use std::io::Cursor;

static SERIAL: Mutex<()> = Mutex::new(());

fn signed_asset() -> Vec<u8> {
    let engine = engine();
    let signer = callback_signer(&engine, SigningAlg::Es256);
    let builder = Builder::from_json(&engine, MANIFEST_JSON).expect("Should create builder");
    let mut dest = Cursor::new(Vec::new());
    builder
        .sign("jpg", &mut Cursor::new(jpeg_asset()), &mut dest, &signer)
        .expect("Should sign");
    dest.into_inner()
}

#[test]
fn test_full_workflow_leaves_nothing_live() {
    let _serial = SERIAL.lock();
    let start = live_counts();

    {
        let engine = engine();
        let signer = key_signer(&engine, SigningAlg::Es384);
        let mut builder = Builder::from_json(&engine, MANIFEST_JSON).expect("Should create builder");
        builder
            .add_resource("thumb.jpg", &mut Cursor::new(b"thumb".to_vec()))
            .expect("Should add resource");
        builder
            .add_ingredient(INGREDIENT_JSON, "jpg", &mut Cursor::new(jpeg_asset()))
            .expect("Should add ingredient");

        let mut archive = Cursor::new(Vec::new());
        builder.to_archive(&mut archive).expect("Should archive");
        archive.set_position(0);
        let restored = Builder::from_archive(&engine, &mut archive).expect("Should restore");

        let mut dest = Cursor::new(Vec::new());
        restored
            .sign("jpg", &mut Cursor::new(jpeg_asset()), &mut dest, &signer)
            .expect("Should sign");
        restored
            .placeholder_for(&signer, "jpg")
            .expect("Should create placeholder");

        dest.set_position(0);
        let reader = Reader::from_stream(&engine, "jpg", dest)
            .expect("Should read")
            .expect("Should have manifest");
        reader.json().expect("Should get JSON");
        let mut thumb = Cursor::new(Vec::new());
        reader.get_resource("thumb.jpg", &mut thumb).expect("Should extract");
        let _ = reader.get_resource("missing", &mut thumb);
    }

    assert_eq!(live_counts(), start);
}

#[test]
fn test_reader_holds_one_stream_until_dropped() {
    let _serial = SERIAL.lock();
    let asset = signed_asset();
    let start = live_counts();
    let engine = engine();

    let reader = Reader::from_stream(&engine, "jpg", Cursor::new(asset))
        .expect("Should read")
        .expect("Should have manifest");

    let open = live_counts();
    assert_eq!(open.readers, start.readers + 1);
    assert_eq!(open.streams, start.streams + 1);

    drop(reader);
    assert_eq!(live_counts(), start);
}

#[test]
fn test_absent_manifest_releases_stream() {
    let _serial = SERIAL.lock();
    let start = live_counts();
    let engine = engine();

    let reader = Reader::from_stream(&engine, "jpg", Cursor::new(jpeg_asset())).expect("Should read");

    assert!(reader.is_none());
    assert_eq!(live_counts(), start);
}

#[test]
fn test_failed_operations_release_everything() {
    let _serial = SERIAL.lock();
    let start = live_counts();

    {
        let engine = engine();
        let _ = Builder::from_json(&engine, "{bad json");
        let _ = Builder::from_archive(&engine, &mut Cursor::new(b"junk".to_vec()));
        let _ = Reader::from_stream(&engine, "gif", Cursor::new(jpeg_asset()));
        let builder = Builder::from_json(&engine, MANIFEST_JSON).expect("Should create builder");
        let _ = builder.data_hashed_placeholder(1024, "gif");
        let _ = c2pa_bridge::Builder::format_embeddable(&engine, "gif", b"x");
    }

    assert_eq!(live_counts(), start);
}

#[test]
fn test_repeated_signer_cycles_do_not_accumulate() {
    let _serial = SERIAL.lock();
    let start = live_counts();
    let engine = engine();

    for _ in 0..100 {
        let signer = callback_signer(&engine, SigningAlg::Ed25519);
        signer.reserve_size().expect("Should report size");
    }

    assert_eq!(live_counts(), start);
}
