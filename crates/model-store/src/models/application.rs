//! Application, unit, resource and lease documents

use super::{Address, CharmOrigin, CharmUrl, Constraints, Document, MeterStatus, Settings};
use crate::collection::Collection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Who may reach an exposed endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposedEndpoint {
    /// Space ids allowed to reach the endpoint
    #[serde(default)]
    pub expose_to_space_ids: Vec<String>,
    /// CIDRs allowed to reach the endpoint
    #[serde(default)]
    pub expose_to_cidrs: Vec<String>,
}

/// Kubernetes service backing a CAAS application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudService {
    /// Provider id of the service
    pub provider_id: String,
    /// Service addresses
    pub addresses: Vec<Address>,
}

/// Requested storage for an application's units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConstraints {
    /// Storage pool
    pub pool: String,
    /// Size in MiB
    pub size: u64,
    /// Number of instances
    pub count: u64,
}

/// A deployed application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDoc {
    /// Application name
    pub name: String,
    /// OS series
    pub series: String,
    /// Whether units are subordinates
    #[serde(default)]
    pub subordinate: bool,
    /// Charm URL
    pub charm_url: CharmUrl,
    /// Charm provenance
    pub charm_origin: CharmOrigin,
    /// Bumped whenever the charm changes
    #[serde(default)]
    pub charm_modified_version: u64,
    /// Charm was forced onto the application
    #[serde(default)]
    pub force_charm: bool,
    /// Whether the application is exposed
    #[serde(default)]
    pub exposed: bool,
    /// Expose rules per endpoint (empty key means all endpoints)
    #[serde(default)]
    pub exposed_endpoints: BTreeMap<String, ExposedEndpoint>,
    /// Minimum number of units
    #[serde(default)]
    pub min_units: u64,
    /// Desired scale (CAAS)
    #[serde(default)]
    pub desired_scale: u64,
    /// Cloud service (CAAS)
    #[serde(default)]
    pub cloud_service: Option<CloudService>,
    /// Pod spec (CAAS)
    #[serde(default)]
    pub pod_spec: Option<String>,
    /// Agent password hash
    #[serde(default)]
    pub password_hash: String,
    /// Application constraints
    #[serde(default)]
    pub constraints: Constraints,
    /// Endpoint name → space id (empty key is the default binding)
    #[serde(default)]
    pub endpoint_bindings: BTreeMap<String, String>,
    /// Storage directives
    #[serde(default)]
    pub storage_constraints: BTreeMap<String, StorageConstraints>,
    /// Opaque metric credentials
    #[serde(default)]
    pub metric_credentials: Vec<u8>,
    /// Charm configuration
    #[serde(default)]
    pub charm_config: Settings,
    /// Application configuration
    #[serde(default)]
    pub application_config: Settings,
    /// Settings written by the leader
    #[serde(default)]
    pub leadership_settings: BTreeMap<String, String>,
}

impl ApplicationDoc {
    /// Minimal application deployed from `charm_url`
    pub fn new(name: impl Into<String>, series: impl Into<String>, charm_url: CharmUrl, origin: CharmOrigin) -> Self {
        Self {
            name: name.into(),
            series: series.into(),
            subordinate: false,
            charm_url,
            charm_origin: origin,
            charm_modified_version: 0,
            force_charm: false,
            exposed: false,
            exposed_endpoints: BTreeMap::new(),
            min_units: 0,
            desired_scale: 0,
            cloud_service: None,
            pod_spec: None,
            password_hash: String::new(),
            constraints: Constraints::default(),
            endpoint_bindings: BTreeMap::new(),
            storage_constraints: BTreeMap::new(),
            metric_credentials: Vec::new(),
            charm_config: Settings::new(),
            application_config: Settings::new(),
            leadership_settings: BTreeMap::new(),
        }
    }

    /// Global key for status and annotations
    pub fn global_key(&self) -> String {
        super::global_key::application(&self.name)
    }
}

impl Document for ApplicationDoc {
    const COLLECTION: Collection = Collection::Applications;
    const KIND: &'static str = "application";

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// Persisted agent state of a unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitState {
    /// Charm-managed key/value state
    #[serde(default)]
    pub charm_state: BTreeMap<String, String>,
    /// Relation id → serialized relation state
    #[serde(default)]
    pub relation_state: BTreeMap<i64, String>,
    /// Serialized uniter state
    #[serde(default)]
    pub uniter_state: String,
    /// Serialized storage state
    #[serde(default)]
    pub storage_state: String,
    /// Serialized meter status state
    #[serde(default)]
    pub meter_status_state: String,
}

/// Container backing a CAAS unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudContainer {
    /// Provider id of the pod
    pub provider_id: String,
    /// Pod address
    #[serde(default)]
    pub address: Option<Address>,
    /// Open ports
    #[serde(default)]
    pub ports: Vec<String>,
}

/// A payload tracked for a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Payload name
    pub name: String,
    /// Payload type
    pub payload_type: String,
    /// Raw id assigned by the workload
    pub raw_id: String,
    /// Payload state
    pub state: String,
    /// Labels
    #[serde(default)]
    pub labels: Vec<String>,
}

/// A unit of an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDoc {
    /// Unit name, `<application>/<n>`
    pub name: String,
    /// Owning application
    pub application: String,
    /// OS series
    pub series: String,
    /// Principal unit, for subordinates
    #[serde(default)]
    pub principal: Option<String>,
    /// Subordinate units
    #[serde(default)]
    pub subordinates: Vec<String>,
    /// Assigned machine (absent for CAAS units)
    #[serde(default)]
    pub machine_id: Option<String>,
    /// Agent password hash
    #[serde(default)]
    pub password_hash: String,
    /// Meter status
    #[serde(default)]
    pub meter_status: MeterStatus,
    /// Persisted agent state
    #[serde(default)]
    pub state: UnitState,
    /// Pod details (CAAS)
    #[serde(default)]
    pub cloud_container: Option<CloudContainer>,
    /// Payloads
    #[serde(default)]
    pub payloads: Vec<Payload>,
}

impl UnitDoc {
    /// A unit of `application` placed on `machine_id`
    pub fn new(name: impl Into<String>, application: impl Into<String>, series: impl Into<String>, machine_id: Option<&str>) -> Self {
        Self {
            name: name.into(),
            application: application.into(),
            series: series.into(),
            principal: None,
            subordinates: Vec::new(),
            machine_id: machine_id.map(str::to_string),
            password_hash: String::new(),
            meter_status: MeterStatus::default(),
            state: UnitState::default(),
            cloud_container: None,
            payloads: Vec::new(),
        }
    }

    /// Global key of the unit agent
    pub fn global_key(&self) -> String {
        super::global_key::unit_agent(&self.name)
    }
}

impl Document for UnitDoc {
    const COLLECTION: Collection = Collection::Units;
    const KIND: &'static str = "unit";

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// Application name of a unit name (`wordpress/0` → `wordpress`)
pub fn unit_application(unit: &str) -> &str {
    unit.split_once('/').map_or(unit, |(app, _)| app)
}

/// A resource revision in use by an application or one of its units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDoc {
    /// Owning application
    pub application: String,
    /// Resource name
    pub name: String,
    /// Unit using this revision, if it is a per-unit record
    #[serde(default)]
    pub unit: Option<String>,
    /// Revision
    pub revision: i64,
    /// Where the resource came from (`upload`, `store`)
    pub origin: String,
    /// SHA-384 fingerprint
    #[serde(default)]
    pub fingerprint: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
}

impl Document for ResourceDoc {
    const COLLECTION: Collection = Collection::Resources;
    const KIND: &'static str = "resource";

    fn key(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{}/{}#{}", self.application, self.name, unit),
            None => format!("{}/{}", self.application, self.name),
        }
    }
}

/// Lease namespace for application leadership
pub const APPLICATION_LEADERSHIP: &str = "application-leadership";

/// A lease held by some entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseDoc {
    /// Lease namespace
    pub namespace: String,
    /// Lease name within the namespace
    pub name: String,
    /// Current holder
    pub holder: String,
}

impl Document for LeaseDoc {
    const COLLECTION: Collection = Collection::Leases;
    const KIND: &'static str = "lease";

    fn key(&self) -> String {
        format!("{}#{}", self.namespace, self.name)
    }
}
