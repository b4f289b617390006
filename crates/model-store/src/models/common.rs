//! Value types shared by several documents

use super::Document;
use crate::collection::Collection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form settings map
pub type Settings = BTreeMap<String, serde_json::Value>;

/// Address scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Reachable from the internet
    Public,
    /// Reachable inside the cloud
    LocalCloud,
    /// Reachable only on the machine
    LocalMachine,
    /// Link-local
    LinkLocal,
    /// Unknown scope
    Unknown,
}

/// A network address of a machine or container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Address value (IP or hostname)
    pub value: String,
    /// `ipv4`, `ipv6` or `hostname`
    pub address_type: String,
    /// Reachability scope
    pub scope: Scope,
    /// Where the address came from (`provider` or `machine`)
    pub origin: String,
    /// Space the address belongs to, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
}

impl Address {
    /// A public IPv4 address
    pub fn public(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            address_type: "ipv4".to_string(),
            scope: Scope::Public,
            origin: "provider".to_string(),
            space_id: None,
        }
    }

    /// A cloud-local IPv4 address in the given space
    pub fn local_cloud(value: impl Into<String>, space_id: Option<&str>) -> Self {
        Self {
            value: value.into(),
            address_type: "ipv4".to_string(),
            scope: Scope::LocalCloud,
            origin: "provider".to_string(),
            space_id: space_id.map(str::to_string),
        }
    }
}

/// Entity status values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Workload is running
    Active,
    /// Workload needs operator attention
    Blocked,
    /// Workload is busy with maintenance
    Maintenance,
    /// Waiting on something external
    Waiting,
    /// An error occurred
    Error,
    /// Status not known
    Unknown,
    /// Agent is idle
    Idle,
    /// Agent is running a hook or action
    Executing,
    /// Resource is being allocated
    Allocating,
    /// Agent is not reachable
    Lost,
    /// Machine agent started
    Started,
    /// Not yet provisioned
    Pending,
    /// Stopped
    Stopped,
    /// Relation joined
    Joined,
    /// Relation is joining
    Joining,
    /// Relation suspended
    Suspended,
    /// Storage attached
    Attached,
    /// Storage detached
    Detached,
    /// Entity is being removed
    Terminated,
    /// Model is available
    Available,
}

/// Current status of an entity, keyed by global key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDoc {
    /// Global key of the entity
    pub global_key: String,
    /// Status value
    pub status: Status,
    /// Status message
    pub message: String,
    /// Structured status data
    #[serde(default)]
    pub data: Settings,
    /// When the status was set
    pub updated: DateTime<Utc>,
}

impl Document for StatusDoc {
    const COLLECTION: Collection = Collection::Statuses;
    const KIND: &'static str = "status";

    fn key(&self) -> String {
        self.global_key.clone()
    }
}

/// One recorded status transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryDoc {
    /// Global key of the entity
    pub global_key: String,
    /// Insertion sequence, breaks timestamp ties
    pub seq: u64,
    /// Status value
    pub status: Status,
    /// Status message
    pub message: String,
    /// Structured status data
    #[serde(default)]
    pub data: Settings,
    /// When the transition happened
    pub updated: DateTime<Utc>,
}

impl StatusHistoryDoc {
    /// Key prefix covering every history entry of `global_key`
    pub fn prefix(global_key: &str) -> String {
        format!("{global_key}@")
    }
}

impl Document for StatusHistoryDoc {
    const COLLECTION: Collection = Collection::StatusHistory;
    const KIND: &'static str = "status history entry";

    fn key(&self) -> String {
        format!("{}{:020}", Self::prefix(&self.global_key), self.seq)
    }
}

/// Agent binaries record, keyed by global key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsDoc {
    /// Global key of the agent's entity
    pub global_key: String,
    /// Binary version, e.g. `2.9.0-ubuntu-amd64`
    pub version: String,
    /// Download URL
    pub url: String,
    /// SHA-256 of the tarball
    pub sha256: String,
    /// Size in bytes
    pub size: u64,
}

impl Document for ToolsDoc {
    const COLLECTION: Collection = Collection::Tools;
    const KIND: &'static str = "agent binaries";

    fn key(&self) -> String {
        self.global_key.clone()
    }
}

/// Annotations of an entity, keyed by global key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationsDoc {
    /// Global key of the annotated entity
    pub global_key: String,
    /// Annotation key/value pairs
    pub annotations: BTreeMap<String, String>,
}

impl Document for AnnotationsDoc {
    const COLLECTION: Collection = Collection::Annotations;
    const KIND: &'static str = "annotations";

    fn key(&self) -> String {
        self.global_key.clone()
    }
}

/// Meter status code and info
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterStatus {
    /// Status code, e.g. `GREEN`
    pub code: String,
    /// Additional info
    pub info: String,
}
