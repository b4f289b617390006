//! Error types for the model store

use crate::collection::Collection;
use thiserror::Error;

/// Model store error type
#[derive(Error, Debug)]
pub enum Error {
    /// Document not found
    #[error("{kind} {key:?} not found")]
    NotFound {
        /// Kind of document that was looked up
        kind: &'static str,
        /// Key that was looked up
        key: String,
    },

    /// Document already exists
    #[error("{kind} {key:?} already exists")]
    AlreadyExists {
        /// Kind of document
        kind: &'static str,
        /// Conflicting key
        key: String,
    },

    /// A collection the caller relies on is absent from the backend
    #[error("collection {0} is missing from the store")]
    MissingCollection(Collection),

    /// Model has not been initialized in this store
    #[error("model has not been initialized")]
    ModelNotInitialized,

    /// Input rejected before reaching the backend
    #[error("invalid {what}: {reason}")]
    Invalid {
        /// What was being validated
        what: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Secret-specific failures
    #[error("{0}")]
    Secret(String),

    /// Sled database error
    #[error("database error: {0}")]
    Sled(#[from] sled::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Create an already exists error
    pub fn already_exists(kind: &'static str, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.into(),
        }
    }

    /// Create a validation error
    pub fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            what,
            reason: reason.into(),
        }
    }

    /// Whether this error reports a missing document
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error reports a duplicate document
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
