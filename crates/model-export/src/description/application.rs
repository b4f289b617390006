//! Exported applications, units and offers

use super::machine::AgentTools;
use crate::history::StatusEntry;
use model_store::models::{
    CharmOrigin, CharmUrl, CloudContainer, CloudService, Constraints, ExposedEndpoint,
    MeterStatus, Payload, Settings, StorageConstraints, UnitState,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resource and the revisions units use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedResource {
    /// Resource name
    pub name: String,
    /// Application revision
    pub revision: i64,
    /// Origin
    pub origin: String,
    /// Fingerprint
    pub fingerprint: String,
    /// Size in bytes
    pub size: u64,
    /// unit → revision in use
    pub unit_revisions: BTreeMap<String, i64>,
}

/// An application offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedOffer {
    /// Offer UUID
    pub offer_uuid: String,
    /// Offer name
    pub offer_name: String,
    /// Description
    pub description: String,
    /// alias → endpoint
    pub endpoints: BTreeMap<String, String>,
    /// user → access
    pub acl: BTreeMap<String, String>,
}

/// An exported unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedUnit {
    /// Unit name
    pub name: String,
    /// OS series
    pub series: String,
    /// Principal unit
    pub principal: Option<String>,
    /// Subordinate units
    pub subordinates: Vec<String>,
    /// Hosting machine
    pub machine: Option<String>,
    /// Agent password hash
    pub password_hash: String,
    /// Meter status
    pub meter_status: MeterStatus,
    /// Persisted agent state
    pub state: UnitState,
    /// Pod details (CAAS)
    pub cloud_container: Option<CloudContainer>,
    /// Payloads
    pub payloads: Vec<Payload>,
    /// Agent binaries
    pub tools: Option<AgentTools>,
    /// Workload version
    pub workload_version: String,
    /// Workload version history, newest first
    pub workload_version_history: Vec<StatusEntry>,
    /// Agent status
    pub agent_status: Option<StatusEntry>,
    /// Agent status history, newest first
    pub agent_status_history: Vec<StatusEntry>,
    /// Workload status
    pub workload_status: Option<StatusEntry>,
    /// Workload status history, newest first
    pub workload_status_history: Vec<StatusEntry>,
    /// Annotations
    pub annotations: BTreeMap<String, String>,
}

/// An exported application with its units and offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedApplication {
    /// Name
    pub name: String,
    /// OS series
    pub series: String,
    /// Subordinate flag
    pub subordinate: bool,
    /// Charm URL
    pub charm_url: CharmUrl,
    /// Charm origin
    pub charm_origin: CharmOrigin,
    /// Charm modified version
    pub charm_modified_version: u64,
    /// Forced charm
    pub force_charm: bool,
    /// Exposed flag
    pub exposed: bool,
    /// Expose rules per endpoint
    pub exposed_endpoints: BTreeMap<String, ExposedEndpoint>,
    /// Minimum units
    pub min_units: u64,
    /// Desired scale (CAAS)
    pub desired_scale: u64,
    /// Cloud service (CAAS)
    pub cloud_service: Option<CloudService>,
    /// Pod spec (CAAS)
    pub pod_spec: Option<String>,
    /// Agent password hash
    pub password_hash: String,
    /// Constraints
    pub constraints: Constraints,
    /// Endpoint → space id
    pub endpoint_bindings: BTreeMap<String, String>,
    /// Storage directives
    pub storage_constraints: BTreeMap<String, StorageConstraints>,
    /// Metric credentials
    pub metric_credentials: Vec<u8>,
    /// Charm config
    pub charm_config: Settings,
    /// Application config
    pub application_config: Settings,
    /// Leadership settings
    pub leadership_settings: BTreeMap<String, String>,
    /// Leader unit
    pub leader: Option<String>,
    /// Resources
    pub resources: Vec<ExportedResource>,
    /// Status
    pub status: Option<StatusEntry>,
    /// Status history, newest first
    pub status_history: Vec<StatusEntry>,
    /// Annotations
    pub annotations: BTreeMap<String, String>,
    /// Units, ordered by name
    pub units: Vec<ExportedUnit>,
    /// Offers of this application
    pub offers: Vec<ExportedOffer>,
}
