//! Error types for model export

use model_store::Collection;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A foreign-key field whose target is not in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenReference {
    /// Referencing entity, e.g. `unit "wordpress/0"`
    pub entity: String,
    /// Referencing field
    pub field: String,
    /// Missing target
    pub target: String,
}

impl BrokenReference {
    /// Create a broken reference record
    pub fn new(entity: impl Into<String>, field: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            field: field.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for BrokenReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} refers to missing {:?}", self.entity, self.field, self.target)
    }
}

fn list(refs: &[BrokenReference]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Export error type
#[derive(Error, Debug)]
pub enum Error {
    /// Store access failed
    #[error("store error: {0}")]
    Store(#[from] model_store::Error),

    /// A required collection is missing
    #[error("reading {category}: collection {collection} is missing")]
    MissingCollection {
        /// What was being read
        category: &'static str,
        /// Missing collection
        collection: Collection,
    },

    /// Data the export needs is missing
    #[error("incomplete model: {entity}: {reason}")]
    Incomplete {
        /// Entity with missing data
        entity: String,
        /// What is missing
        reason: String,
    },

    /// Two different identifiers normalize to the same key
    #[error("name clash for {kind}: {existing:?} and {incoming:?} normalize to the same name")]
    NameClash {
        /// Identifier kind
        kind: &'static str,
        /// Identifier registered first
        existing: String,
        /// Identifier rejected
        incoming: String,
    },

    /// Containers nest deeper than allowed
    #[error("machine {machine:?} is nested {depth} levels deep (max {max})")]
    ContainerDepth {
        /// Offending machine
        machine: String,
        /// Its depth
        depth: usize,
        /// Allowed depth
        max: usize,
    },

    /// The snapshot has references to missing entities
    #[error("{} broken reference(s): {}", .0.len(), list(.0))]
    BrokenReferences(Vec<BrokenReference>),

    /// The export was cancelled
    #[error("export cancelled")]
    Cancelled,
}

impl Error {
    /// Create an incomplete-model error
    pub fn incomplete(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Incomplete {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
