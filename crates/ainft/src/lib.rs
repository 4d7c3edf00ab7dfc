//! AI image to Cardano NFT minter
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

pub mod api;
pub mod auth;
pub mod gallery;
pub mod generation;
pub mod pinning;
pub mod prompt;
pub mod storage;
pub mod wallet_gateway;
pub mod workflow;

#[doc(hidden)]
pub use ainft_common as common;
#[doc(hidden)]
pub use ainft_common::{Error, MintStatus};

pub use self::api::ApiClient;
pub use self::auth::KeyValidator;
pub use self::gallery::{AssetQuery, Gallery, HttpAssetQuery};
pub use self::generation::{HttpImageGenerator, ImageGenerator};
pub use self::pinning::{HttpPinner, Pinner};
pub use self::prompt::clean_prompt;
pub use self::storage::{Credentials, FileStore, KvStore, MemoryStore, PromptLibrary};
pub use self::wallet_gateway::{BridgeWallet, WalletGateway};
pub use self::workflow::{MintWorkflow, WorkflowEvent, WorkflowState};
