//! Error types for the lease facade

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lease facade error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum LeaseError {
    /// The caller is not a controller
    #[error("permission denied")]
    PermissionDenied,

    /// This controller is no longer the raft leader
    #[error("not currently the leader, try {server_id:?} at {server_address:?}")]
    NotLeader {
        /// Address of the leader, if known
        server_address: String,
        /// Raft id of the leader, if known
        server_id: String,
    },

    /// Applying the command to the log failed
    #[error("{message}")]
    Apply {
        /// Failure reported by the raft context
        message: String,
    },
}

impl LeaseError {
    /// Create a not-leader error pointing at the current leader
    pub fn not_leader(server_address: impl Into<String>, server_id: impl Into<String>) -> Self {
        Self::NotLeader {
            server_address: server_address.into(),
            server_id: server_id.into(),
        }
    }

    /// Create an apply error
    pub fn apply(message: impl Into<String>) -> Self {
        Self::Apply {
            message: message.into(),
        }
    }

    /// Whether this error means the batch must stop
    pub fn is_not_leader(&self) -> bool {
        matches!(self, Self::NotLeader { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LeaseError>;
