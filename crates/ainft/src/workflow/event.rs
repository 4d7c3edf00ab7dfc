//! Workflow events

use ainft_common::{MintResult, MintStatus};
use serde::{Deserialize, Serialize};

/// Event published by a [`MintWorkflow`](super::MintWorkflow)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum WorkflowEvent {
    /// Status moved
    StatusChanged {
        /// Previous status
        from: MintStatus,
        /// New status
        to: MintStatus,
    },
    /// A step failed, the workflow is in `error`
    Failed {
        /// Error message
        message: String,
    },
    /// Mint transaction submitted
    Minted(MintResult),
}
