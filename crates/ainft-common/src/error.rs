//! Errors

use thiserror::Error;

use crate::status::MintStatus;

/// AINFT Error
#[derive(Debug, Error)]
pub enum Error {
    /// Image generation backend failed or answered without an image
    #[error("Image generation failed: {0}")]
    GenerationFailed(String),
    /// Pinning service failed
    #[error("Pinning failed: {0}")]
    PinningFailed(String),
    /// No wallet is connected
    #[error("Wallet not connected")]
    WalletNotConnected,
    /// A precondition for minting is not met
    #[error("Mint precondition failed: {0}")]
    MintPreconditionFailed(String),
    /// Wallet failed to build, sign or submit the mint transaction
    #[error("Mint submission failed: {0}")]
    MintSubmissionFailed(String),
    /// Ledger query for owned assets failed
    #[error("Gallery fetch failed: {0}")]
    GalleryFetchFailed(String),
    /// Burn transaction failed
    #[error("Burn failed: {0}")]
    BurnFailed(String),
    /// Send transaction failed
    #[error("Send failed: {0}")]
    SendFailed(String),
    /// User input or external payload is malformed
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    /// Workflow status transition not allowed
    #[error("Invalid transition: From {0} to {1}")]
    InvalidTransition(MintStatus, MintStatus),
    /// Wallet gateway error
    #[error(transparent)]
    Wallet(Box<dyn std::error::Error + Send + Sync>),
    /// Local storage error
    #[error("Storage error: {0}")]
    Storage(String),
    /// Url Error
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// Io Error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
