//! Wallet gateways
//!
//! The [`WalletGateway`] trait lives in `ainft-common` so that gateway
//! implementations only depend on the shared types.

pub mod bridge;

pub use ainft_common::WalletGateway;
pub use bridge::BridgeWallet;
