//! Exported cross-model state and secrets

use crate::history::StatusEntry;
use chrono::{DateTime, Utc};
use model_store::models::{RemoteEndpoint, RemoteSpace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// An exported remote application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRemoteApplication {
    /// Local name
    pub name: String,
    /// Offer UUID
    pub offer_uuid: String,
    /// Offer URL
    pub url: String,
    /// Offering model
    pub source_model_uuid: String,
    /// Offering controller
    pub external_controller_uuid: Option<String>,
    /// Endpoints
    pub endpoints: Vec<RemoteEndpoint>,
    /// Offering model's spaces
    pub spaces: Vec<RemoteSpace>,
    /// endpoint → remote space name
    pub bindings: BTreeMap<String, String>,
    /// Consumer proxy flag
    pub is_consumer_proxy: bool,
    /// Status
    pub status: Option<StatusEntry>,
}

/// One immutable secret value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedSecretRevision {
    /// Revision number
    pub revision: u64,
    /// Creation time
    pub create_time: DateTime<Utc>,
    /// Encoded values
    pub data: BTreeMap<String, String>,
}

/// An exported secret with all of its revisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedSecret {
    /// Numeric id
    pub id: u64,
    /// Fully qualified URL
    pub url: String,
    /// Path
    pub path: String,
    /// Format version
    pub version: u32,
    /// Secret type
    pub secret_type: String,
    /// Provider label
    pub provider: String,
    /// Provider-side id
    pub provider_id: String,
    /// Rotation interval
    pub rotate_interval: Duration,
    /// Description
    pub description: String,
    /// Tags
    pub tags: BTreeMap<String, String>,
    /// Provider parameters
    pub params: BTreeMap<String, serde_json::Value>,
    /// Latest revision
    pub revision: u64,
    /// Creation time
    pub create_time: DateTime<Utc>,
    /// Last update time
    pub update_time: DateTime<Utc>,
    /// Revisions, oldest first
    pub revisions: Vec<ExportedSecretRevision>,
}
