//! Manifest store construction and parsing

use crate::error::{MockError, MockResult};
use crate::format::{AssetFormat, sha256_hex};
use crate::settings;
use crate::signer::MockSigner;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Manifest bytes as produced by signing: the store JSON plus resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub store: Value,
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
}

impl Envelope {
    pub fn to_bytes(&self) -> MockResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> MockResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| MockError::InvalidAsset(format!("corrupt manifest store: {e}")))
    }

    pub fn active_label(&self) -> Option<&str> {
        self.store.get("active_manifest").and_then(Value::as_str)
    }

    pub fn store_json(&self) -> String {
        self.store.to_string()
    }

    pub fn resource(&self, uri: &str) -> MockResult<Vec<u8>> {
        let encoded = self
            .resources
            .get(uri)
            .ok_or_else(|| MockError::ResourceNotFound(uri.to_string()))?;
        hex::decode(encoded)
            .map_err(|e| MockError::InvalidAsset(format!("corrupt resource {uri}: {e}")))
    }
}

/// Everything that goes into one signed claim
pub struct Claim<'a> {
    pub definition: &'a Value,
    pub format: AssetFormat,
    pub asset_hash: String,
    pub ingredients: &'a [Value],
    pub resources: &'a BTreeMap<String, Vec<u8>>,
    pub remote_url: Option<&'a str>,
    pub extra_assertions: Vec<Value>,
}

impl Claim<'_> {
    /// Sign this claim and wrap it in a single-manifest store
    pub fn sign(self, signer: &MockSigner) -> MockResult<Envelope> {
        let label = format!("urn:uuid:{}", Uuid::new_v4());
        let mut manifest: Map<String, Value> = match self.definition {
            Value::Object(map) => map.clone(),
            _ => return Err(MockError::Json("manifest definition must be an object".into())),
        };

        manifest.insert("label".into(), Value::String(label.clone()));
        manifest.insert("format".into(), json!(self.format.mime_type()));
        manifest
            .entry("claim_generator")
            .or_insert_with(|| json!(settings::claim_generator()));
        manifest
            .entry("instance_id")
            .or_insert_with(|| json!(format!("xmp:iid:{}", Uuid::new_v4())));
        manifest.insert("ingredients".into(), Value::Array(self.ingredients.to_vec()));
        manifest.insert(
            "resources".into(),
            Value::Array(self.resources.keys().map(|k| json!(k)).collect()),
        );
        if let Some(url) = self.remote_url {
            manifest.insert("remote_url".into(), json!(url));
        }
        if !self.extra_assertions.is_empty() {
            let assertions = manifest
                .entry("assertions")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = assertions {
                list.extend(self.extra_assertions);
            }
        }

        let claim_bytes = serde_json::to_vec(&json!({
            "manifest": &manifest,
            "asset_hash": &self.asset_hash,
        }))?;
        let signature = signer.sign(&claim_bytes)?;

        let mut signature_info = Map::new();
        signature_info.insert("alg".into(), json!(signer.alg().as_str()));
        signature_info.insert("issuer".into(), json!("C2PA Mock Signer"));
        signature_info.insert("signature_len".into(), json!(signature.len()));
        signature_info.insert("claim_hash".into(), json!(sha256_hex(&claim_bytes)));
        if let Some(tsa) = signer.tsa_url() {
            signature_info.insert("timestamp_authority".into(), json!(tsa));
        }
        manifest.insert("signature_info".into(), Value::Object(signature_info));
        manifest.insert("signature".into(), json!(hex::encode(&signature)));

        let mut manifests = Map::new();
        manifests.insert(label.clone(), Value::Object(manifest));
        let store = json!({
            "active_manifest": label,
            "manifests": manifests,
        });

        tracing::debug!("mock engine signed manifest {}", label);
        Ok(Envelope {
            store,
            resources: self
                .resources
                .iter()
                .map(|(uri, bytes)| (uri.clone(), hex::encode(bytes)))
                .collect(),
        })
    }
}
