//! AINFT common types
//!
//! Types shared by the workflow controller, the wallet gateways and the
//! command line front end.

pub mod asset;
pub mod error;
pub mod fee;
pub mod gallery;
pub mod gateway;
pub mod image;
pub mod metadata;
pub mod status;
pub mod wallet;

pub use self::asset::{MediaType, MintResult, Network, NftDraft, PinnedAsset};
pub use self::error::Error;
pub use self::fee::FeeEstimate;
pub use self::gateway::WalletGateway;
pub use self::gallery::{display_image_url, NftMetadata, OwnedAsset, RawAsset};
pub use self::image::{
    Dimensions, Engine, GeneratedImage, GenerationParams, ImageSource, LocalImage, StylePreset,
};
pub use self::metadata::AssetMetadata;
pub use self::status::{check_status_transition, MintStatus};
pub use self::wallet::{
    Address, Amount, MintSpec, SignedTransaction, TransactionHash, TxRequest, UnsignedTransaction,
    Utxo,
};
