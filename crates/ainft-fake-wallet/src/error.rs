//! Fake Wallet Error

use thiserror::Error;

/// Fake Wallet Error
#[derive(Debug, Error)]
pub enum Error {
    /// Wallet disconnected
    #[error("Wallet not connected")]
    NotConnected,
    /// Build configured to fail
    #[error("Transaction build failed")]
    BuildFailed,
    /// Sign configured to fail
    #[error("User declined to sign")]
    SignDeclined,
    /// Submit configured to fail
    #[error("Transaction submission rejected")]
    SubmitRejected,
    /// Asset not held by the wallet
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),
    /// Transaction hex not produced by this wallet
    #[error("Malformed transaction")]
    MalformedTransaction,
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl From<Error> for ainft_common::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::NotConnected => Self::WalletNotConnected,
            e => Self::Wallet(Box::new(e)),
        }
    }
}
