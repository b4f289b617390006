//! Actions, operations and cloud image metadata

use super::{Document, Settings};
use crate::collection::Collection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A line logged by a running action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMessage {
    /// When it was logged
    pub timestamp: DateTime<Utc>,
    /// Message
    pub message: String,
}

/// An action run on a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDoc {
    /// Action id
    pub id: String,
    /// Unit the action runs on
    pub receiver: String,
    /// Action name
    pub name: String,
    /// Operation the action belongs to
    pub operation: String,
    /// Parameters
    #[serde(default)]
    pub parameters: Settings,
    /// Whether the action may run in parallel
    #[serde(default)]
    pub parallel: bool,
    /// Execution group
    #[serde(default)]
    pub execution_group: String,
    /// When it was queued
    pub enqueued: DateTime<Utc>,
    /// When it started
    #[serde(default)]
    pub started: Option<DateTime<Utc>>,
    /// When it completed
    #[serde(default)]
    pub completed: Option<DateTime<Utc>>,
    /// Status
    pub status: String,
    /// Final message
    #[serde(default)]
    pub message: String,
    /// Results
    #[serde(default)]
    pub results: Settings,
    /// Log lines
    #[serde(default)]
    pub logs: Vec<ActionMessage>,
}

impl Document for ActionDoc {
    const COLLECTION: Collection = Collection::Actions;
    const KIND: &'static str = "action";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// A group of actions started together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDoc {
    /// Operation id
    pub id: String,
    /// Summary
    pub summary: String,
    /// When it was queued
    pub enqueued: DateTime<Utc>,
    /// When it started
    #[serde(default)]
    pub started: Option<DateTime<Utc>>,
    /// When it completed
    #[serde(default)]
    pub completed: Option<DateTime<Utc>>,
    /// Status
    pub status: String,
    /// Tasks completed so far
    #[serde(default)]
    pub complete_task_count: u32,
    /// Tasks spawned
    #[serde(default)]
    pub spawned_task_count: u32,
    /// Failure message
    #[serde(default)]
    pub fail: String,
}

impl Document for OperationDoc {
    const COLLECTION: Collection = Collection::Operations;
    const KIND: &'static str = "operation";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Image metadata cached for the model's cloud
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudImageMetadataDoc {
    /// Stream, e.g. `released`
    pub stream: String,
    /// Region
    pub region: String,
    /// OS version
    pub version: String,
    /// Architecture
    pub arch: String,
    /// Virtualisation type
    #[serde(default)]
    pub virt_type: String,
    /// Root storage type
    #[serde(default)]
    pub root_storage_type: String,
    /// Root storage size in MiB
    #[serde(default)]
    pub root_storage_size: Option<u64>,
    /// Where the metadata came from
    pub source: String,
    /// Priority
    pub priority: i32,
    /// Image id
    pub image_id: String,
    /// When it was recorded
    pub date_created: DateTime<Utc>,
}

impl Document for CloudImageMetadataDoc {
    const COLLECTION: Collection = Collection::CloudImageMetadata;
    const KIND: &'static str = "cloud image metadata";

    fn key(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.stream, self.region, self.version, self.arch, self.virt_type, self.root_storage_type
        )
    }
}
