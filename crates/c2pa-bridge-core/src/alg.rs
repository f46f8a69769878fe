//! Signature algorithm selector

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Signature algorithms understood by the engine
///
/// The discriminants are part of the ABI and must match the engine's
/// `C2paSigningAlg` ordering.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningAlg {
    Es256 = 0,
    Es384 = 1,
    Es512 = 2,
    Ps256 = 3,
    Ps384 = 4,
    Ps512 = 5,
    Ed25519 = 6,
}

impl SigningAlg {
    /// Every supported algorithm, in ABI order
    pub const ALL: [SigningAlg; 7] = [
        SigningAlg::Es256,
        SigningAlg::Es384,
        SigningAlg::Es512,
        SigningAlg::Ps256,
        SigningAlg::Ps384,
        SigningAlg::Ps512,
        SigningAlg::Ed25519,
    ];

    /// Lowercase name as it appears in manifest JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlg::Es256 => "es256",
            SigningAlg::Es384 => "es384",
            SigningAlg::Es512 => "es512",
            SigningAlg::Ps256 => "ps256",
            SigningAlg::Ps384 => "ps384",
            SigningAlg::Ps512 => "ps512",
            SigningAlg::Ed25519 => "ed25519",
        }
    }
}

impl FromStr for SigningAlg {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.as_str() == lower)
            .ok_or_else(|| BridgeError::InvalidArgument(format!("unknown signing algorithm: {s}")))
    }
}

impl std::fmt::Display for SigningAlg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
