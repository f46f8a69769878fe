//! Engine-side signers

use crate::error::{MockError, MockResult};
use c2pa_bridge_core::SigningAlg;
use c2pa_bridge_ffi::types::SignerCallback;
use sha2::{Digest, Sha256};
use std::ffi::c_void;

const CERT_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const CERT_END: &str = "-----END CERTIFICATE-----";

/// Extra space reserved for a timestamp token when a TSA is configured
pub const TIMESTAMP_RESERVE: usize = 4096;

/// Largest signature each algorithm can produce
pub fn max_signature_len(alg: SigningAlg) -> usize {
    match alg {
        SigningAlg::Es256 => 64,
        SigningAlg::Es384 => 96,
        SigningAlg::Es512 => 132,
        SigningAlg::Ps256 => 256,
        SigningAlg::Ps384 => 384,
        SigningAlg::Ps512 => 512,
        SigningAlg::Ed25519 => 64,
    }
}

enum Backend {
    Callback {
        context: *const c_void,
        callback: SignerCallback,
    },
    Key {
        private_key: String,
    },
}

pub struct MockSigner {
    backend: Backend,
    alg: SigningAlg,
    certs: String,
    tsa_url: Option<String>,
}

impl MockSigner {
    pub fn with_callback(
        context: *const c_void,
        callback: SignerCallback,
        alg: SigningAlg,
        certs: &str,
        tsa_url: Option<&str>,
    ) -> MockResult<Self> {
        check_certs(certs)?;
        Ok(Self {
            backend: Backend::Callback { context, callback },
            alg,
            certs: certs.to_string(),
            tsa_url: tsa_url.map(str::to_string),
        })
    }

    pub fn with_key(
        alg: &str,
        certs: &str,
        private_key: &str,
        tsa_url: Option<&str>,
    ) -> MockResult<Self> {
        let alg: SigningAlg = alg
            .parse()
            .map_err(|_| MockError::BadParam(format!("unknown signing algorithm {alg}")))?;
        check_certs(certs)?;
        check_key(alg, private_key)?;
        Ok(Self {
            backend: Backend::Key {
                private_key: private_key.to_string(),
            },
            alg,
            certs: certs.to_string(),
            tsa_url: tsa_url.map(str::to_string),
        })
    }

    pub fn alg(&self) -> SigningAlg {
        self.alg
    }

    pub fn certs(&self) -> &str {
        &self.certs
    }

    pub fn tsa_url(&self) -> Option<&str> {
        self.tsa_url.as_deref()
    }

    /// Bytes to reserve in an asset for this signer's signature block
    pub fn reserve_size(&self) -> usize {
        let tsa = if self.tsa_url.is_some() {
            TIMESTAMP_RESERVE
        } else {
            0
        };
        max_signature_len(self.alg) + self.certs.len() + tsa
    }

    pub fn sign(&self, data: &[u8]) -> MockResult<Vec<u8>> {
        match &self.backend {
            Backend::Key { private_key } => {
                let mut signature = Sha256::new()
                    .chain_update(private_key.as_bytes())
                    .chain_update(data)
                    .finalize()
                    .to_vec();
                signature.extend_from_slice(
                    &Sha256::new()
                        .chain_update(data)
                        .chain_update(private_key.as_bytes())
                        .finalize(),
                );
                Ok(signature)
            }
            Backend::Callback { context, callback } => {
                let mut buffer = vec![0u8; self.reserve_size()];
                // SAFETY: context and callback were registered together by the
                // host, which keeps the context alive for the signer's lifetime
                let n = unsafe {
                    callback(
                        *context,
                        data.as_ptr(),
                        data.len(),
                        buffer.as_mut_ptr(),
                        buffer.len(),
                    )
                };
                let len = usize::try_from(n).map_err(|_| {
                    MockError::Signature(format!("signer callback failed with {n}"))
                })?;
                if len > buffer.len() {
                    return Err(MockError::Signature(format!(
                        "signer callback reported {len} bytes for a {} byte buffer",
                        buffer.len()
                    )));
                }
                buffer.truncate(len);
                Ok(buffer)
            }
        }
    }
}

fn check_certs(certs: &str) -> MockResult<()> {
    if certs.contains(CERT_BEGIN) && certs.contains(CERT_END) {
        Ok(())
    } else {
        Err(MockError::BadParam(
            "invalid certificate chain: expected PEM certificates".to_string(),
        ))
    }
}

fn check_key(alg: SigningAlg, key: &str) -> MockResult<()> {
    if !key.contains("PRIVATE KEY") {
        return Err(MockError::BadParam(
            "invalid private key: expected PEM".to_string(),
        ));
    }
    let mismatch = match alg {
        SigningAlg::Es256 | SigningAlg::Es384 | SigningAlg::Es512 => key.contains("RSA PRIVATE KEY"),
        SigningAlg::Ps256 | SigningAlg::Ps384 | SigningAlg::Ps512 => key.contains("EC PRIVATE KEY"),
        SigningAlg::Ed25519 => key.contains("RSA PRIVATE KEY") || key.contains("EC PRIVATE KEY"),
    };
    if mismatch {
        return Err(MockError::BadParam(format!(
            "private key does not match algorithm {alg}"
        )));
    }
    Ok(())
}
