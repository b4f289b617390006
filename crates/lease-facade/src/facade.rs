//! The facade and the controller services it depends on

use crate::error::{LeaseError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Identifies who is calling the facade
pub trait Authorizer: Send + Sync {
    /// Whether the caller is a controller agent
    fn auth_controller(&self) -> bool;
}

/// Access to the controller's raft log
#[async_trait]
pub trait RaftContext: Send + Sync {
    /// Append one lease command to the log
    async fn apply_lease(&self, command: &[u8]) -> Result<()>;
}

/// One lease command, already encoded by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseOperation {
    /// Encoded lease command
    pub command: String,
}

impl LeaseOperation {
    /// Wrap an encoded command
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// A batch of lease operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseOperations {
    /// Operations, applied in order
    pub operations: Vec<LeaseOperation>,
}

/// Applies lease operations on behalf of controller agents
pub struct LeaseFacade {
    raft: Arc<dyn RaftContext>,
}

impl std::fmt::Debug for LeaseFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaseFacade").finish_non_exhaustive()
    }
}

impl LeaseFacade {
    /// Create a facade; fails unless the caller is a controller
    pub fn new(auth: &dyn Authorizer, raft: Arc<dyn RaftContext>) -> Result<Self> {
        if !auth.auth_controller() {
            return Err(LeaseError::PermissionDenied);
        }
        Ok(Self { raft })
    }

    /// Apply every operation in order, returning one result slot per operation.
    ///
    /// `None` means the operation was applied. Once the raft context reports
    /// that this controller is not the leader, the remaining operations are
    /// not attempted and all carry that error.
    pub async fn apply_lease(&self, args: &LeaseOperations) -> Vec<Option<LeaseError>> {
        let total = args.operations.len();
        let mut results = vec![None; total];

        for (k, op) in args.operations.iter().enumerate() {
            let err = match self.raft.apply_lease(op.command.as_bytes()).await {
                Ok(()) => continue,
                Err(err) => err,
            };

            if err.is_not_leader() {
                warn!(
                    "Lost raft leadership, rejecting {} of {} lease operations",
                    total - k,
                    total
                );
                for slot in &mut results[k..] {
                    *slot = Some(err.clone());
                }
                break;
            }

            debug!("Lease operation {} failed: {}", k, err);
            results[k] = Some(err);
        }

        results
    }
}
