//! CIP-25 asset metadata

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Transaction metadata label for NFT metadata
pub const CIP25_LABEL: u64 = 721;

/// CIP-25 metadata version written by this crate
pub const CIP25_VERSION: &str = "1.0";

/// Metadata of one asset under a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    /// Display name
    pub name: String,
    /// `ipfs://` URI of the image
    pub image: String,
    /// MIME type of the image
    pub media_type: String,
    /// Description
    pub description: String,
    /// On-chain message attached when the asset is sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Any other fields carried over from existing metadata
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetMetadata {
    /// Attach an on-chain message
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message.filter(|m| !m.is_empty());
        self
    }

    /// Metadata value to store under label 721
    ///
    /// Keyed `policy_id -> asset_name -> metadata` with the version field
    /// next to the policy.
    pub fn to_cip25(&self, policy_id: &str, asset_name: &str) -> Value {
        cip25_envelope(policy_id, asset_name, json!(self))
    }
}

/// Wrap one asset's metadata as `{policy_id: {asset_name: asset}, version}`
fn cip25_envelope(policy_id: &str, asset_name: &str, asset: Value) -> Value {
    let mut assets = Map::new();
    assets.insert(asset_name.to_string(), asset);

    let mut root = Map::new();
    root.insert(policy_id.to_string(), Value::Object(assets));
    root.insert("version".to_string(), json!(CIP25_VERSION));
    Value::Object(root)
}
