//! Mint workflow status and transition rules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Status of one mint workflow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MintStatus {
    /// Nothing in flight
    #[default]
    Idle,
    /// Waiting for the generation backend
    Generating,
    /// Waiting for the pinning service
    Uploading,
    /// Image pinned, draft editable
    Uploaded,
    /// Waiting for the wallet to build, sign and submit
    Minting,
    /// Mint transaction submitted
    Minted,
    /// Last step failed
    Error,
}

impl MintStatus {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            MintStatus::Idle => "Idle",
            MintStatus::Generating => "Generating image",
            MintStatus::Uploading => "Uploading to IPFS",
            MintStatus::Uploaded => "Uploaded to IPFS",
            MintStatus::Minting => "Minting NFT",
            MintStatus::Minted => "NFT minted successfully",
            MintStatus::Error => "Error occurred",
        }
    }

    /// An external call is outstanding
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            MintStatus::Generating | MintStatus::Uploading | MintStatus::Minting
        )
    }
}

impl fmt::Display for MintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MintStatus::Idle => "idle",
            MintStatus::Generating => "generating",
            MintStatus::Uploading => "uploading",
            MintStatus::Uploaded => "uploaded",
            MintStatus::Minting => "minting",
            MintStatus::Minted => "minted",
            MintStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MintStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "generating" => Ok(Self::Generating),
            "uploading" => Ok(Self::Uploading),
            "uploaded" => Ok(Self::Uploaded),
            "minting" => Ok(Self::Minting),
            "minted" => Ok(Self::Minted),
            "error" => Ok(Self::Error),
            _ => Err(Error::ValidationFailed(format!("Unknown mint status: {}", s))),
        }
    }
}

#[inline]
/// Check if the workflow status transition is allowed
///
/// Valid transitions:
/// - Idle -> Generating, Uploading
/// - Generating -> Idle, Error
/// - Uploading -> Uploaded, Error
/// - Uploaded -> Minting, Generating, Idle
/// - Minting -> Minted, Error
/// - Minted -> Idle
/// - Error -> Idle, Generating, Uploading, Minting
pub fn check_status_transition(current: MintStatus, new: MintStatus) -> Result<(), Error> {
    let is_valid_transition = match current {
        MintStatus::Idle => matches!(new, MintStatus::Generating | MintStatus::Uploading),
        MintStatus::Generating => matches!(new, MintStatus::Idle | MintStatus::Error),
        MintStatus::Uploading => matches!(new, MintStatus::Uploaded | MintStatus::Error),
        MintStatus::Uploaded => matches!(
            new,
            MintStatus::Minting | MintStatus::Generating | MintStatus::Idle
        ),
        MintStatus::Minting => matches!(new, MintStatus::Minted | MintStatus::Error),
        MintStatus::Minted => matches!(new, MintStatus::Idle),
        MintStatus::Error => matches!(
            new,
            MintStatus::Idle | MintStatus::Generating | MintStatus::Uploading | MintStatus::Minting
        ),
    };

    if !is_valid_transition {
        Err(match current {
            MintStatus::Minting => {
                Error::MintPreconditionFailed("A mint is already in progress".to_string())
            }
            _ => Error::InvalidTransition(current, new),
        })
    } else {
        Ok(())
    }
}
