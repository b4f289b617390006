//! Raft lease facade
//!
//! Lets controller agents apply batches of lease operations to the raft
//! log. Only controllers may use it. A batch stops at the first
//! "not leader" failure: that operation and every later one report the
//! same error so the caller can retry them against the leader.

pub mod error;
pub mod facade;

pub use error::{LeaseError, Result};
pub use facade::{Authorizer, LeaseFacade, LeaseOperation, LeaseOperations, RaftContext};
