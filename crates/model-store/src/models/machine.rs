//! Machine documents

use super::{Address, Constraints, Document};
use crate::collection::Collection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Work a machine agent performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MachineJob {
    /// Hosts units
    HostUnits,
    /// Runs a controller
    ManageModel,
}

/// A machine or container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDoc {
    /// Machine id, `0` or `0/lxd/1` for containers
    pub id: String,
    /// Provisioning nonce
    #[serde(default)]
    pub nonce: String,
    /// OS series
    pub series: String,
    /// Container type for containers (`lxd`, `kvm`)
    #[serde(default)]
    pub container_type: Option<String>,
    /// Agent jobs
    pub jobs: Vec<MachineJob>,
    /// Provisioning constraints
    #[serde(default)]
    pub constraints: Constraints,
    /// Addresses reported by the provider
    #[serde(default)]
    pub provider_addresses: Vec<Address>,
    /// Addresses reported by the machine agent
    #[serde(default)]
    pub machine_addresses: Vec<Address>,
    /// Agent password hash
    #[serde(default)]
    pub password_hash: String,
    /// Container types the machine can host, if known
    #[serde(default)]
    pub supported_containers: Option<Vec<String>>,
    /// Placement directive used at provisioning
    #[serde(default)]
    pub placement: String,
}

impl MachineDoc {
    /// A host machine with default settings
    pub fn new(id: impl Into<String>, series: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nonce: String::new(),
            series: series.into(),
            container_type: None,
            jobs: vec![MachineJob::HostUnits],
            constraints: Constraints::default(),
            provider_addresses: Vec::new(),
            machine_addresses: Vec::new(),
            password_hash: String::new(),
            supported_containers: None,
            placement: String::new(),
        }
    }

    /// Id of the parent machine, for containers
    pub fn parent_id(&self) -> Option<&str> {
        parent_machine_id(&self.id)
    }

    /// Global key for status and tools
    pub fn global_key(&self) -> String {
        super::global_key::machine(&self.id)
    }
}

/// Parent of a container id: `0/lxd/1` → `0`, `0/lxd/1/kvm/0` → `0/lxd/1`
pub fn parent_machine_id(id: &str) -> Option<&str> {
    let (rest, _num) = id.rsplit_once('/')?;
    let (parent, _kind) = rest.rsplit_once('/')?;
    Some(parent)
}

/// Nesting depth of a machine id; host machines are at depth 0
pub fn container_depth(id: &str) -> usize {
    id.matches('/').count() / 2
}

impl Document for MachineDoc {
    const COLLECTION: Collection = Collection::Machines;
    const KIND: &'static str = "machine";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Hardware details of a provisioned machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceDataDoc {
    /// Machine id
    pub machine_id: String,
    /// Provider instance id
    pub instance_id: String,
    /// Architecture
    #[serde(default)]
    pub arch: Option<String>,
    /// Memory in MiB
    #[serde(default)]
    pub mem: Option<u64>,
    /// Root disk in MiB
    #[serde(default)]
    pub root_disk: Option<u64>,
    /// CPU cores
    #[serde(default)]
    pub cpu_cores: Option<u64>,
    /// CPU power
    #[serde(default)]
    pub cpu_power: Option<u64>,
    /// Provider tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Availability zone
    #[serde(default)]
    pub availability_zone: Option<String>,
    /// Charm profiles applied to the instance
    #[serde(default)]
    pub charm_profiles: Vec<String>,
}

impl Document for InstanceDataDoc {
    const COLLECTION: Collection = Collection::InstanceData;
    const KIND: &'static str = "instance data";

    fn key(&self) -> String {
        self.machine_id.clone()
    }
}

/// A block device seen on a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDeviceDoc {
    /// Machine id
    pub machine_id: String,
    /// Device name, e.g. `sdb`
    pub name: String,
    /// Device links
    #[serde(default)]
    pub links: Vec<String>,
    /// Filesystem label
    #[serde(default)]
    pub label: String,
    /// Filesystem UUID
    #[serde(default)]
    pub uuid: String,
    /// Hardware id
    #[serde(default)]
    pub hardware_id: String,
    /// World wide name
    #[serde(default)]
    pub wwn: String,
    /// Bus address
    #[serde(default)]
    pub bus_address: String,
    /// Size in MiB
    pub size: u64,
    /// Filesystem type
    #[serde(default)]
    pub filesystem_type: String,
    /// Whether the device is in use
    #[serde(default)]
    pub in_use: bool,
    /// Mount point
    #[serde(default)]
    pub mount_point: String,
}

impl Document for BlockDeviceDoc {
    const COLLECTION: Collection = Collection::BlockDevices;
    const KIND: &'static str = "block device";

    fn key(&self) -> String {
        format!("{}#{}", self.machine_id, self.name)
    }
}

/// A contiguous range of ports
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRange {
    /// First port
    pub from: u16,
    /// Last port
    pub to: u16,
    /// `tcp`, `udp` or `icmp`
    pub protocol: String,
}

/// Port ranges opened on a machine, per unit and endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedPortsDoc {
    /// Machine id
    pub machine_id: String,
    /// unit name → endpoint name (empty for all endpoints) → ranges
    pub unit_ranges: BTreeMap<String, BTreeMap<String, Vec<PortRange>>>,
}

impl Document for OpenedPortsDoc {
    const COLLECTION: Collection = Collection::OpenedPorts;
    const KIND: &'static str = "opened ports";

    fn key(&self) -> String {
        self.machine_id.clone()
    }
}

/// SSH host keys of a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshHostKeysDoc {
    /// Machine id
    pub machine_id: String,
    /// Public keys
    pub keys: Vec<String>,
}

impl Document for SshHostKeysDoc {
    const COLLECTION: Collection = Collection::SshHostKeys;
    const KIND: &'static str = "ssh host keys";

    fn key(&self) -> String {
        self.machine_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_machine_id() {
        assert_eq!(parent_machine_id("0"), None);
        assert_eq!(parent_machine_id("0/lxd/1"), Some("0"));
        assert_eq!(parent_machine_id("0/lxd/1/kvm/0"), Some("0/lxd/1"));
    }

    #[test]
    fn test_container_depth() {
        assert_eq!(container_depth("3"), 0);
        assert_eq!(container_depth("3/lxd/0"), 1);
        assert_eq!(container_depth("3/lxd/0/kvm/2"), 2);
    }
}
