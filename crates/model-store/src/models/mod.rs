//! Documents held by the model store
//!
//! Each document type lives in exactly one [`Collection`] and knows its own
//! key. Maps are `BTreeMap`s so that serialized documents, and everything
//! derived from them, are byte-for-byte stable.

pub mod application;
pub mod charm;
pub mod common;
pub mod constraints;
pub mod machine;
pub mod misc;
pub mod model;
pub mod network;
pub mod relation;
pub mod remote;
pub mod storage;

pub use application::*;
pub use charm::*;
pub use common::*;
pub use constraints::Constraints;
pub use machine::*;
pub use misc::*;
pub use model::*;
pub use network::*;
pub use relation::*;
pub use remote::*;
pub use storage::*;

use crate::collection::Collection;
use serde::{Serialize, de::DeserializeOwned};

/// A value stored in one collection under a self-describing key
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the document lives in
    const COLLECTION: Collection;

    /// Human readable kind, used in error messages
    const KIND: &'static str;

    /// Key under which the document is stored
    fn key(&self) -> String;
}

/// Global keys identify entities for status, tools and annotations
pub mod global_key {
    /// The model
    pub const MODEL: &str = "e";

    /// A machine
    pub fn machine(id: &str) -> String {
        format!("m#{id}")
    }

    /// A machine's instance (modification status)
    pub fn machine_instance(id: &str) -> String {
        format!("m#{id}#instance")
    }

    /// An application
    pub fn application(name: &str) -> String {
        format!("a#{name}")
    }

    /// A unit's agent
    pub fn unit_agent(name: &str) -> String {
        format!("u#{name}")
    }

    /// A unit's workload
    pub fn unit_workload(name: &str) -> String {
        format!("u#{name}#charm")
    }

    /// A unit's workload version
    pub fn unit_workload_version(name: &str) -> String {
        format!("u#{name}#sat#workload-version")
    }

    /// A relation
    pub fn relation(id: i64) -> String {
        format!("r#{id}")
    }

    /// A volume
    pub fn volume(id: &str) -> String {
        format!("v#{id}")
    }

    /// A filesystem
    pub fn filesystem(id: &str) -> String {
        format!("f#{id}")
    }

    /// A remote application
    pub fn remote_application(name: &str) -> String {
        format!("c#{name}")
    }
}
