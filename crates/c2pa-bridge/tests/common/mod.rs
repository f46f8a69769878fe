//! Shared helpers for integration tests against the in-process engine

#![allow(dead_code)]

use c2pa_bridge::{Engine, Signer, SignerInfo, SigningAlg};
use c2pa_bridge_mock::fixtures::{TEST_CERTS, TEST_PRIVATE_KEY, test_signature};
use std::sync::Arc;

pub use c2pa_bridge_mock::fixtures::{INGREDIENT_JSON, MANIFEST_JSON, jpeg_asset, png_asset};

pub fn engine() -> Arc<Engine> {
    c2pa_bridge_mock::shared_engine()
}

pub fn callback_signer(engine: &Arc<Engine>, alg: SigningAlg) -> Signer {
    Signer::from_callback(engine, alg, TEST_CERTS, None, |data: &[u8]| {
        Ok::<_, String>(test_signature(data))
    })
    .expect("Should create callback signer")
}

pub fn key_info(alg: SigningAlg) -> SignerInfo {
    SignerInfo::new(alg, TEST_CERTS, TEST_PRIVATE_KEY)
}

pub fn key_signer(engine: &Arc<Engine>, alg: SigningAlg) -> Signer {
    Signer::from_keys(engine, &key_info(alg)).expect("Should create key signer")
}

pub fn certs() -> &'static str {
    TEST_CERTS
}
