//! Wallet gateway payloads

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset::{Network, NftDraft, PinnedAsset};
use crate::metadata::AssetMetadata;

/// Bech32 payment address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Address as str
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

/// Amount of one unit held by an output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// `lovelace` or policy id + hex asset name
    pub unit: String,
    /// Decimal quantity
    pub quantity: String,
}

/// Unspent transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    /// Transaction id
    pub tx_hash: String,
    /// Output index
    pub output_index: u32,
    /// Owning address
    pub address: Address,
    /// Held amounts
    pub amount: Vec<Amount>,
}

/// Mint request handed to the wallet gateway
///
/// The gateway derives the single-signature policy from `recipient`, puts
/// `metadata` under label 721 keyed by that policy and `asset_name`, and
/// sends the minted asset to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintSpec {
    /// On-chain asset name
    pub asset_name: String,
    /// Always 1 for NFTs
    pub quantity: u64,
    /// CIP-25 metadata of the asset
    pub metadata: AssetMetadata,
    /// Minting address, receiver of the asset
    pub recipient: Address,
    /// Target network
    pub network: Network,
}

impl MintSpec {
    /// Mint spec for a draft and its pinned image
    pub fn from_draft(draft: &NftDraft, pinned: &PinnedAsset, recipient: Address) -> Self {
        Self {
            asset_name: draft.name.clone(),
            quantity: 1,
            metadata: draft.preview(pinned),
            recipient,
            network: draft.network,
        }
    }
}

/// Transaction the gateway is asked to build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TxRequest {
    /// Mint one NFT
    Mint(MintSpec),
    /// Burn one unit of an asset minted by the connected address
    Burn {
        /// Policy id + hex asset name
        unit: String,
    },
    /// Send one unit of an asset
    Send {
        /// Policy id + hex asset name
        unit: String,
        /// Receiving address
        recipient: Address,
        /// Label 721 metadata to attach
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
}

impl TxRequest {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            TxRequest::Mint(_) => "mint",
            TxRequest::Burn { .. } => "burn",
            TxRequest::Send { .. } => "send",
        }
    }
}

/// Hex encoded unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnsignedTransaction(pub String);

impl UnsignedTransaction {
    /// Serialized size in bytes
    pub fn size_bytes(&self) -> usize {
        self.0.len() / 2
    }
}

/// Hex encoded signed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedTransaction(pub String);

/// Hash of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(pub String);

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_mint_spec_from_draft() {
        let pinned = PinnedAsset {
            content_hash: "QmCat".to_string(),
            gateway_url: String::new(),
            size_bytes: 10,
            pinned_at: String::new(),
            source_image: Uuid::new_v4(),
        };
        let draft = NftDraft::new("Space Cat", "A cat in space");
        let spec = MintSpec::from_draft(&draft, &pinned, Address::new("addr_test1xyz"));

        assert_eq!(spec.quantity, 1);
        assert_eq!(spec.asset_name, "Space Cat");
        assert_eq!(spec.metadata.image, "ipfs://QmCat");
        assert_eq!(spec.recipient.as_str(), "addr_test1xyz");
    }

    #[test]
    fn test_tx_request_tagging() {
        let burn = TxRequest::Burn {
            unit: "abc".to_string(),
        };
        let json = serde_json::to_value(&burn).expect("serialize");
        assert_eq!(json["type"], "burn");
        assert_eq!(json["unit"], "abc");
        assert_eq!(burn.kind(), "burn");
    }

    #[test]
    fn test_unsigned_size_and_utxo_parse() {
        assert_eq!(UnsignedTransaction("a0b1c2".to_string()).size_bytes(), 3);

        let utxo: Utxo = serde_json::from_str(
            r#"{"txHash":"aa","outputIndex":0,"address":"addr1","amount":[{"unit":"lovelace","quantity":"5000000"},{"unit":"abc","quantity":"1"}]}"#,
        )
        .expect("parse");
        assert_eq!(utxo.output_index, 0);
        assert_eq!(utxo.amount.len(), 2);
        assert_eq!(utxo.amount[0].quantity, "5000000");
    }
}
