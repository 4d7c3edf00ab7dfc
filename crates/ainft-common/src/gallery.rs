//! Owned asset records returned by the ledger query

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::asset::MediaType;
use crate::metadata::AssetMetadata;

/// Public IPFS gateway used for display
pub const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Asset record as returned by the ledger query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAsset {
    /// Policy id + hex asset name, or `lovelace`
    pub unit: String,
    /// Decimal quantity
    pub quantity: String,
    /// Policy id
    #[serde(default)]
    pub policy_id: Option<String>,
    /// Asset name
    #[serde(default)]
    pub asset_name: Option<String>,
    /// Onchain metadata
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Metadata of an owned NFT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Image uri
    pub image: String,
    /// Remaining metadata fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NftMetadata {
    /// Metadata carried along when the asset is sent
    ///
    /// A message from an earlier transfer is replaced by `message`.
    pub fn for_transfer(&self, message: Option<String>) -> AssetMetadata {
        let mut extra = self.extra.clone();
        extra.remove("message");
        let media_type = match extra.remove("mediaType") {
            Some(Value::String(media_type)) => media_type,
            _ => MediaType::default().to_string(),
        };

        AssetMetadata {
            name: self.name.clone(),
            image: self.image.clone(),
            media_type,
            description: self.description.clone(),
            message: None,
            extra,
        }
        .with_message(message)
    }
}

/// NFT held by the connected wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedAsset {
    /// Policy id + hex asset name
    pub unit: String,
    /// Policy id
    pub policy_id: String,
    /// Asset name
    pub asset_name: String,
    /// Always `"1"`
    pub quantity: String,
    /// Metadata
    pub metadata: NftMetadata,
}

impl OwnedAsset {
    /// Build an owned asset from a raw record
    ///
    /// Returns `None` unless the record has a policy id, an asset name,
    /// string `name`, `description` and `image` metadata fields, and a
    /// quantity of exactly `"1"`.
    pub fn try_from_raw(raw: RawAsset) -> Option<Self> {
        if raw.quantity != "1" {
            return None;
        }
        let policy_id = raw.policy_id?;
        let asset_name = raw.asset_name?;
        let mut extra = raw.metadata?;

        let mut take = |key: &str| match extra.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let name = take("name")?;
        let description = take("description")?;
        let image = take("image")?;

        Some(Self {
            unit: raw.unit,
            policy_id,
            asset_name,
            quantity: raw.quantity,
            metadata: NftMetadata {
                name,
                description,
                image,
                extra,
            },
        })
    }

    /// Browser friendly image url
    pub fn display_image_url(&self) -> String {
        display_image_url(&self.metadata.image)
    }
}

/// Rewrite `ipfs://<cid>` to the public gateway, other urls pass through
pub fn display_image_url(image: &str) -> String {
    match image.strip_prefix("ipfs://") {
        Some(cid) => format!("{}{}", IPFS_GATEWAY, cid),
        None => image.to_string(),
    }
}
