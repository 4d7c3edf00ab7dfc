//! Pinned assets, drafts and mint results

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Map;
use uuid::Uuid;

use crate::error::Error;
use crate::metadata::AssetMetadata;
use crate::wallet::TransactionHash;

/// Image pinned to IPFS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedAsset {
    /// IPFS content id
    pub content_hash: String,
    /// HTTP gateway url of the content
    pub gateway_url: String,
    /// Pinned size
    pub size_bytes: u64,
    /// Pin timestamp as reported by the pinning service
    pub pinned_at: String,
    /// Id of the image this pin was made from
    pub source_image: Uuid,
}

impl PinnedAsset {
    /// `ipfs://` URI written into the mint metadata
    pub fn ipfs_uri(&self) -> String {
        format!("ipfs://{}", self.content_hash)
    }
}

/// Declared MIME type of the minted image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    /// image/png
    #[default]
    #[serde(rename = "image/png")]
    Png,
    /// image/jpg
    #[serde(rename = "image/jpg")]
    Jpg,
    /// image/jpeg
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl MediaType {
    /// MIME string
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpg => "image/jpg",
            MediaType::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image/png" | "png" => Ok(Self::Png),
            "image/jpg" | "jpg" => Ok(Self::Jpg),
            "image/jpeg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(Error::ValidationFailed(format!("Unsupported media type: {}", s))),
        }
    }
}

/// Cardano network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Preprod testnet
    #[default]
    Preprod,
    /// Mainnet
    Mainnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Preprod => write!(f, "preprod"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preprod" => Ok(Self::Preprod),
            "mainnet" => Ok(Self::Mainnet),
            _ => Err(Error::ValidationFailed(format!("Unknown network: {}", s))),
        }
    }
}

/// User supplied NFT details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftDraft {
    /// Asset name, also used as display name
    pub name: String,
    /// Description
    pub description: String,
    /// Declared media type
    pub media_type: MediaType,
    /// Target network
    pub network: Network,
}

impl NftDraft {
    /// Draft with default media type and network
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Check that name and description are filled in
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::MintPreconditionFailed(
                "NFT name is required".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(Error::MintPreconditionFailed(
                "NFT description is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Metadata the mint would carry for this draft
    pub fn preview(&self, pinned: &PinnedAsset) -> AssetMetadata {
        AssetMetadata {
            name: self.name.clone(),
            image: pinned.ipfs_uri(),
            media_type: self.media_type.to_string(),
            description: self.description.clone(),
            message: None,
            extra: Map::new(),
        }
    }
}

/// Successful mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintResult {
    /// Submitted transaction
    pub transaction_hash: TransactionHash,
    /// Minted asset name
    pub asset_name: String,
    /// IPFS content id referenced by the asset
    pub content_hash: String,
}
