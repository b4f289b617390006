//! Exported machines

use crate::history::StatusEntry;
use model_store::models::{
    Address, BlockDeviceDoc, Constraints, MachineJob, PortRange, ToolsDoc,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agent binaries of a machine or unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTools {
    /// Binary version
    pub version: String,
    /// Download URL
    pub url: String,
    /// SHA-256
    pub sha256: String,
    /// Size in bytes
    pub size: u64,
}

impl From<ToolsDoc> for AgentTools {
    fn from(doc: ToolsDoc) -> Self {
        Self {
            version: doc.version,
            url: doc.url,
            sha256: doc.sha256,
            size: doc.size,
        }
    }
}

/// Provider instance of a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudInstance {
    /// Provider instance id
    pub instance_id: String,
    /// Architecture
    pub arch: Option<String>,
    /// Memory in MiB
    pub mem: Option<u64>,
    /// Root disk in MiB
    pub root_disk: Option<u64>,
    /// CPU cores
    pub cpu_cores: Option<u64>,
    /// CPU power
    pub cpu_power: Option<u64>,
    /// Provider tags
    pub tags: Option<Vec<String>>,
    /// Availability zone
    pub availability_zone: Option<String>,
    /// Applied charm profiles
    pub charm_profiles: Vec<String>,
}

/// An exported machine, with its containers nested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedMachine {
    /// Machine id
    pub id: String,
    /// Provisioning nonce
    pub nonce: String,
    /// OS series
    pub series: String,
    /// Container type
    pub container_type: Option<String>,
    /// Agent jobs
    pub jobs: Vec<MachineJob>,
    /// Constraints
    pub constraints: Constraints,
    /// Provider addresses
    pub provider_addresses: Vec<Address>,
    /// Machine addresses
    pub machine_addresses: Vec<Address>,
    /// Agent password hash
    pub password_hash: String,
    /// Supported container types
    pub supported_containers: Option<Vec<String>>,
    /// Placement directive
    pub placement: String,
    /// Provider instance, absent until provisioned or when skipped
    pub instance: Option<CloudInstance>,
    /// Instance status
    pub instance_status: Option<StatusEntry>,
    /// Instance status history, newest first
    pub instance_status_history: Vec<StatusEntry>,
    /// Agent binaries
    pub tools: Option<AgentTools>,
    /// Block devices
    pub block_devices: Vec<BlockDeviceDoc>,
    /// unit → endpoint → opened port ranges
    pub opened_ports: BTreeMap<String, BTreeMap<String, Vec<PortRange>>>,
    /// Agent status
    pub status: Option<StatusEntry>,
    /// Agent status history, newest first
    pub status_history: Vec<StatusEntry>,
    /// Annotations
    pub annotations: BTreeMap<String, String>,
    /// Containers hosted on this machine
    pub containers: Vec<ExportedMachine>,
}

impl ExportedMachine {
    /// This machine followed by all of its containers, depth first
    pub fn flatten(&self) -> Vec<&ExportedMachine> {
        let mut out = vec![self];
        for container in &self.containers {
            out.extend(container.flatten());
        }
        out
    }
}
