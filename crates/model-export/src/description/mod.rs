//! The exported description of a model
//!
//! [`Snapshot`] is the single serializable output of an export. Nested
//! value types are shared with the store; entity types are defined here.

pub mod application;
pub mod machine;
pub mod network;
pub mod relation;
pub mod remote;
pub mod storage;

pub use application::*;
pub use machine::*;
pub use network::*;
pub use relation::*;
pub use remote::*;
pub use storage::*;

use crate::config::Category;
use crate::error::BrokenReference;
use crate::history::StatusEntry;
use model_store::models::{
    ActionDoc, BlockDoc, CloudImageMetadataDoc, Constraints, ExternalControllerDoc,
    FirewallRuleDoc, LinkLayerDeviceDoc, MeterStatus, ModelType, ModelUserDoc,
    OfferConnectionDoc, OperationDoc, RelationNetworksDoc, RemoteEntityDoc, Settings, Sla,
    SpaceDoc, SshHostKeysDoc, StorageInstanceDoc, StoragePoolDoc, SubnetDoc,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the snapshot format
pub const FORMAT_VERSION: u32 = 1;

/// Exported model user
pub type ExportedUser = ModelUserDoc;
/// Exported change block
pub type ExportedBlock = BlockDoc;
/// Exported space
pub type ExportedSpace = SpaceDoc;
/// Exported subnet
pub type ExportedSubnet = SubnetDoc;
/// Exported link-layer device
pub type ExportedLinkLayerDevice = LinkLayerDeviceDoc;
/// Exported SSH host keys
pub type ExportedSshHostKeys = SshHostKeysDoc;
/// Exported storage instance
pub type ExportedStorage = StorageInstanceDoc;
/// Exported storage pool
pub type ExportedStoragePool = StoragePoolDoc;
/// Exported external controller
pub type ExportedExternalController = ExternalControllerDoc;
/// Exported offer connection
pub type ExportedOfferConnection = OfferConnectionDoc;
/// Exported remote entity
pub type ExportedRemoteEntity = RemoteEntityDoc;
/// Exported firewall rule
pub type ExportedFirewallRule = FirewallRuleDoc;
/// Exported relation networks
pub type ExportedRelationNetworks = RelationNetworksDoc;
/// Exported action
pub type ExportedAction = ActionDoc;
/// Exported operation
pub type ExportedOperation = OperationDoc;
/// Exported cloud image metadata
pub type ExportedCloudImageMetadata = CloudImageMetadataDoc;

/// The model's cloud credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedCloudCredential {
    /// Cloud
    pub cloud: String,
    /// Owner
    pub owner: String,
    /// Name
    pub name: String,
    /// Authentication type
    pub auth_type: String,
    /// Attributes
    pub attributes: BTreeMap<String, String>,
}

/// The exported model root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedModel {
    /// UUID
    pub uuid: String,
    /// Name
    pub name: String,
    /// Type
    pub model_type: ModelType,
    /// Owner
    pub owner: String,
    /// Configuration
    pub config: Settings,
    /// Constraints
    pub constraints: Constraints,
    /// Agent password hash
    pub password_hash: String,
    /// Latest agent version
    pub latest_tools_version: Option<String>,
    /// Environ version
    pub environ_version: u32,
    /// Cloud
    pub cloud: String,
    /// Cloud region
    pub cloud_region: String,
    /// Cloud credential
    pub cloud_credential: Option<ExportedCloudCredential>,
    /// Support agreement
    pub sla: Sla,
    /// Meter status
    pub meter_status: MeterStatus,
    /// Status
    pub status: Option<StatusEntry>,
    /// Status history, newest first
    pub status_history: Vec<StatusEntry>,
    /// Annotations
    pub annotations: BTreeMap<String, String>,
}

/// Data left out because tolerant mode was on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Omission {
    /// Entity or category affected
    pub entity: String,
    /// What was left out
    pub reason: String,
}

/// A complete exported model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub(crate) format_version: u32,
    pub(crate) model: ExportedModel,
    pub(crate) users: Vec<ExportedUser>,
    pub(crate) sequences: BTreeMap<String, u64>,
    pub(crate) blocks: Vec<ExportedBlock>,
    pub(crate) machines: Vec<ExportedMachine>,
    pub(crate) applications: Vec<ExportedApplication>,
    pub(crate) relations: Vec<ExportedRelation>,
    pub(crate) spaces: Vec<ExportedSpace>,
    pub(crate) subnets: Vec<ExportedSubnet>,
    pub(crate) link_layer_devices: Vec<ExportedLinkLayerDevice>,
    pub(crate) ip_addresses: Vec<ExportedIpAddress>,
    pub(crate) ssh_host_keys: Vec<ExportedSshHostKeys>,
    pub(crate) volumes: Vec<ExportedVolume>,
    pub(crate) filesystems: Vec<ExportedFilesystem>,
    pub(crate) storages: Vec<ExportedStorage>,
    pub(crate) storage_pools: Vec<ExportedStoragePool>,
    pub(crate) secrets: Vec<ExportedSecret>,
    pub(crate) remote_applications: Vec<ExportedRemoteApplication>,
    pub(crate) external_controllers: Vec<ExportedExternalController>,
    pub(crate) offer_connections: Vec<ExportedOfferConnection>,
    pub(crate) remote_entities: Vec<ExportedRemoteEntity>,
    pub(crate) firewall_rules: Vec<ExportedFirewallRule>,
    pub(crate) relation_networks: Vec<ExportedRelationNetworks>,
    pub(crate) actions: Vec<ExportedAction>,
    pub(crate) operations: Vec<ExportedOperation>,
    pub(crate) cloud_image_metadata: Vec<ExportedCloudImageMetadata>,
    pub(crate) incomplete: bool,
    pub(crate) omissions: Vec<Omission>,
    pub(crate) partial: bool,
    pub(crate) broken_references: Vec<BrokenReference>,
}

impl Snapshot {
    /// An empty snapshot around a model
    pub(crate) fn new(model: ExportedModel) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            model,
            users: Vec::new(),
            sequences: BTreeMap::new(),
            blocks: Vec::new(),
            machines: Vec::new(),
            applications: Vec::new(),
            relations: Vec::new(),
            spaces: Vec::new(),
            subnets: Vec::new(),
            link_layer_devices: Vec::new(),
            ip_addresses: Vec::new(),
            ssh_host_keys: Vec::new(),
            volumes: Vec::new(),
            filesystems: Vec::new(),
            storages: Vec::new(),
            storage_pools: Vec::new(),
            secrets: Vec::new(),
            remote_applications: Vec::new(),
            external_controllers: Vec::new(),
            offer_connections: Vec::new(),
            remote_entities: Vec::new(),
            firewall_rules: Vec::new(),
            relation_networks: Vec::new(),
            actions: Vec::new(),
            operations: Vec::new(),
            cloud_image_metadata: Vec::new(),
            incomplete: false,
            omissions: Vec::new(),
            partial: false,
            broken_references: Vec::new(),
        }
    }

    /// Snapshot format version
    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    /// The model
    pub fn model(&self) -> &ExportedModel {
        &self.model
    }

    /// Model users
    pub fn users(&self) -> &[ExportedUser] {
        &self.users
    }

    /// Sequences: name → next value to hand out
    pub fn sequences(&self) -> &BTreeMap<String, u64> {
        &self.sequences
    }

    /// Change blocks
    pub fn blocks(&self) -> &[ExportedBlock] {
        &self.blocks
    }

    /// Top-level machines; containers are nested
    pub fn machines(&self) -> &[ExportedMachine] {
        &self.machines
    }

    /// Every machine including containers, depth first
    pub fn all_machines(&self) -> Vec<&ExportedMachine> {
        self.machines.iter().flat_map(|m| m.flatten()).collect()
    }

    /// Applications with their units and offers
    pub fn applications(&self) -> &[ExportedApplication] {
        &self.applications
    }

    /// Every unit of every application
    pub fn units(&self) -> impl Iterator<Item = &ExportedUnit> {
        self.applications.iter().flat_map(|a| a.units.iter())
    }

    /// Relations
    pub fn relations(&self) -> &[ExportedRelation] {
        &self.relations
    }

    /// Spaces
    pub fn spaces(&self) -> &[ExportedSpace] {
        &self.spaces
    }

    /// Subnets
    pub fn subnets(&self) -> &[ExportedSubnet] {
        &self.subnets
    }

    /// Link-layer devices
    pub fn link_layer_devices(&self) -> &[ExportedLinkLayerDevice] {
        &self.link_layer_devices
    }

    /// IP addresses
    pub fn ip_addresses(&self) -> &[ExportedIpAddress] {
        &self.ip_addresses
    }

    /// SSH host keys
    pub fn ssh_host_keys(&self) -> &[ExportedSshHostKeys] {
        &self.ssh_host_keys
    }

    /// Volumes
    pub fn volumes(&self) -> &[ExportedVolume] {
        &self.volumes
    }

    /// Filesystems
    pub fn filesystems(&self) -> &[ExportedFilesystem] {
        &self.filesystems
    }

    /// Storage instances
    pub fn storages(&self) -> &[ExportedStorage] {
        &self.storages
    }

    /// Storage pools
    pub fn storage_pools(&self) -> &[ExportedStoragePool] {
        &self.storage_pools
    }

    /// Secrets
    pub fn secrets(&self) -> &[ExportedSecret] {
        &self.secrets
    }

    /// Remote applications
    pub fn remote_applications(&self) -> &[ExportedRemoteApplication] {
        &self.remote_applications
    }

    /// External controllers
    pub fn external_controllers(&self) -> &[ExportedExternalController] {
        &self.external_controllers
    }

    /// Offer connections
    pub fn offer_connections(&self) -> &[ExportedOfferConnection] {
        &self.offer_connections
    }

    /// Remote entities
    pub fn remote_entities(&self) -> &[ExportedRemoteEntity] {
        &self.remote_entities
    }

    /// Firewall rules
    pub fn firewall_rules(&self) -> &[ExportedFirewallRule] {
        &self.firewall_rules
    }

    /// Relation networks
    pub fn relation_networks(&self) -> &[ExportedRelationNetworks] {
        &self.relation_networks
    }

    /// Actions
    pub fn actions(&self) -> &[ExportedAction] {
        &self.actions
    }

    /// Operations
    pub fn operations(&self) -> &[ExportedOperation] {
        &self.operations
    }

    /// Cloud image metadata
    pub fn cloud_image_metadata(&self) -> &[ExportedCloudImageMetadata] {
        &self.cloud_image_metadata
    }

    /// Whether tolerant mode left data out
    pub fn is_incomplete(&self) -> bool {
        self.incomplete
    }

    /// What tolerant mode left out
    pub fn omissions(&self) -> &[Omission] {
        &self.omissions
    }

    /// Whether tolerant mode kept references to missing entities
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// References to missing entities kept in tolerant mode
    pub fn broken_references(&self) -> &[BrokenReference] {
        &self.broken_references
    }

    /// Number of exported entries belonging to `category`
    pub fn entry_count(&self, category: Category) -> usize {
        let machines = self.all_machines();
        match category {
            Category::Actions => self.actions.len() + self.operations.len(),
            Category::Annotations => {
                let maps = std::iter::once(&self.model.annotations)
                    .chain(machines.iter().map(|m| &m.annotations))
                    .chain(self.applications.iter().map(|a| &a.annotations))
                    .chain(self.units().map(|u| &u.annotations));
                maps.filter(|m| !m.is_empty()).count()
            }
            Category::CloudImageMetadata => self.cloud_image_metadata.len(),
            Category::Credentials => usize::from(self.model.cloud_credential.is_some()),
            Category::IpAddresses => self.ip_addresses.len(),
            Category::Settings => {
                let apps = self.applications.iter().map(|a| {
                    usize::from(!a.charm_config.is_empty())
                        + usize::from(!a.application_config.is_empty())
                        + usize::from(!a.leadership_settings.is_empty())
                });
                let relations = self
                    .relations
                    .iter()
                    .flat_map(|r| r.endpoints.iter())
                    .filter(|ep| !ep.application_settings.is_empty())
                    .count();
                apps.sum::<usize>() + relations
            }
            Category::SshHostKeys => self.ssh_host_keys.len(),
            Category::StatusHistory => {
                let machine_entries: usize = machines
                    .iter()
                    .map(|m| m.status_history.len() + m.instance_status_history.len())
                    .sum();
                let app_entries: usize = self
                    .applications
                    .iter()
                    .map(|a| a.status_history.len())
                    .sum();
                let unit_entries: usize = self
                    .units()
                    .map(|u| {
                        u.agent_status_history.len()
                            + u.workload_status_history.len()
                            + u.workload_version_history.len()
                    })
                    .sum();
                let storage_entries: usize = self
                    .volumes
                    .iter()
                    .map(|v| v.status_history.len())
                    .chain(self.filesystems.iter().map(|f| f.status_history.len()))
                    .sum();
                self.model.status_history.len()
                    + machine_entries
                    + app_entries
                    + unit_entries
                    + storage_entries
            }
            Category::LinkLayerDevices => self.link_layer_devices.len(),
            Category::UnitAgentBinaries => self.units().filter(|u| u.tools.is_some()).count(),
            Category::MachineAgentBinaries => machines.iter().filter(|m| m.tools.is_some()).count(),
            Category::RelationData => self
                .relations
                .iter()
                .flat_map(|r| r.endpoints.iter())
                .map(ExportedEndpoint::unit_count)
                .sum(),
            Category::InstanceData => machines.iter().filter(|m| m.instance.is_some()).count(),
            Category::ApplicationOffers => self.applications.iter().map(|a| a.offers.len()).sum(),
            Category::OfferConnections => self.offer_connections.len(),
        }
    }

    /// Entity counts by kind, for summaries
    pub fn entity_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("users", self.users.len()),
            ("sequences", self.sequences.len()),
            ("blocks", self.blocks.len()),
            ("machines", self.all_machines().len()),
            ("applications", self.applications.len()),
            ("units", self.units().count()),
            ("relations", self.relations.len()),
            ("spaces", self.spaces.len()),
            ("subnets", self.subnets.len()),
            ("link-layer devices", self.link_layer_devices.len()),
            ("ip addresses", self.ip_addresses.len()),
            ("ssh host keys", self.ssh_host_keys.len()),
            ("volumes", self.volumes.len()),
            ("filesystems", self.filesystems.len()),
            ("storage instances", self.storages.len()),
            ("storage pools", self.storage_pools.len()),
            ("secrets", self.secrets.len()),
            ("remote applications", self.remote_applications.len()),
            ("external controllers", self.external_controllers.len()),
            ("offers", self.entry_count(Category::ApplicationOffers)),
            ("offer connections", self.offer_connections.len()),
            ("remote entities", self.remote_entities.len()),
            ("firewall rules", self.firewall_rules.len()),
            ("relation networks", self.relation_networks.len()),
            ("actions", self.actions.len()),
            ("operations", self.operations.len()),
            ("cloud image metadata", self.cloud_image_metadata.len()),
        ]
    }
}
