//! Storage documents

use super::Document;
use crate::collection::Collection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Raw block device
    Block,
    /// Mounted filesystem
    Filesystem,
}

/// Owner of a storage instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "lowercase")]
pub enum StorageOwner {
    /// Owned by a unit
    Unit(String),
    /// Owned by an application (shared storage)
    Application(String),
}

/// Pool and size a storage instance was created with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInstanceConstraints {
    /// Storage pool
    pub pool: String,
    /// Size in MiB
    pub size: u64,
}

/// A storage instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInstanceDoc {
    /// Storage id, e.g. `data/0`
    pub id: String,
    /// Storage kind
    pub kind: StorageKind,
    /// Owner
    #[serde(default)]
    pub owner: Option<StorageOwner>,
    /// Units the storage is attached to
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Creation constraints
    pub constraints: StorageInstanceConstraints,
}

impl Document for StorageInstanceDoc {
    const COLLECTION: Collection = Collection::StorageInstances;
    const KIND: &'static str = "storage instance";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// A configured storage pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePoolDoc {
    /// Pool name
    pub name: String,
    /// Storage provider
    pub provider: String,
    /// Provider attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Document for StoragePoolDoc {
    const COLLECTION: Collection = Collection::StoragePools;
    const KIND: &'static str = "storage pool";

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// What a volume or filesystem is attached to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum AttachmentHost {
    /// A machine
    Machine(String),
    /// A unit (CAAS)
    Unit(String),
}

impl fmt::Display for AttachmentHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentHost::Machine(id) => write!(f, "machine-{}", id.replace('/', "-")),
            AttachmentHost::Unit(name) => write!(f, "unit-{}", name.replace('/', "-")),
        }
    }
}

/// Provisioned details of a volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    /// Provider volume id
    pub volume_id: String,
    /// Hardware id
    #[serde(default)]
    pub hardware_id: String,
    /// World wide name
    #[serde(default)]
    pub wwn: String,
    /// Pool
    pub pool: String,
    /// Size in MiB
    pub size: u64,
    /// Whether the volume outlives its machine
    #[serde(default)]
    pub persistent: bool,
}

/// A volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDoc {
    /// Volume id, e.g. `0/1`
    pub id: String,
    /// Storage instance the volume backs
    #[serde(default)]
    pub storage_id: Option<String>,
    /// Requested pool
    pub pool: String,
    /// Requested size in MiB
    pub size: u64,
    /// Provisioned details, once provisioned
    #[serde(default)]
    pub info: Option<VolumeInfo>,
}

impl VolumeDoc {
    /// Global key for status
    pub fn global_key(&self) -> String {
        super::global_key::volume(&self.id)
    }
}

impl Document for VolumeDoc {
    const COLLECTION: Collection = Collection::Volumes;
    const KIND: &'static str = "volume";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Provisioned details of a volume attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeAttachmentInfo {
    /// Device name
    #[serde(default)]
    pub device_name: String,
    /// Device link
    #[serde(default)]
    pub device_link: String,
    /// Bus address
    #[serde(default)]
    pub bus_address: String,
    /// Read-only attachment
    #[serde(default)]
    pub read_only: bool,
}

/// A volume attached to a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeAttachmentDoc {
    /// Volume id
    pub volume_id: String,
    /// Host
    pub host: AttachmentHost,
    /// Requested read-only
    #[serde(default)]
    pub read_only: bool,
    /// Provisioned details
    #[serde(default)]
    pub info: Option<VolumeAttachmentInfo>,
}

impl Document for VolumeAttachmentDoc {
    const COLLECTION: Collection = Collection::VolumeAttachments;
    const KIND: &'static str = "volume attachment";

    fn key(&self) -> String {
        format!("{}#{}", self.volume_id, self.host)
    }
}

/// How an attachment plan's device is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Local device
    Local,
    /// iSCSI target
    Iscsi,
}

/// Block device discovered by the host agent for a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanBlockDevice {
    /// Device name
    pub device_name: String,
    /// Device links
    #[serde(default)]
    pub device_links: Vec<String>,
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
}

/// A plan for attaching a volume on a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeAttachmentPlanDoc {
    /// Volume id
    pub volume_id: String,
    /// Machine id
    pub machine_id: String,
    /// Device type
    pub device_type: DeviceType,
    /// Device attributes (e.g. iSCSI target details)
    #[serde(default)]
    pub device_attributes: BTreeMap<String, String>,
    /// Set by the host agent once the device shows up
    #[serde(default)]
    pub block_device: Option<PlanBlockDevice>,
}

impl Document for VolumeAttachmentPlanDoc {
    const COLLECTION: Collection = Collection::VolumeAttachmentPlans;
    const KIND: &'static str = "volume attachment plan";

    fn key(&self) -> String {
        format!("{}#{}", self.volume_id, self.machine_id)
    }
}

/// Provisioned details of a filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemInfo {
    /// Provider filesystem id
    pub filesystem_id: String,
    /// Pool
    pub pool: String,
    /// Size in MiB
    pub size: u64,
}

/// A filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemDoc {
    /// Filesystem id
    pub id: String,
    /// Storage instance the filesystem backs
    #[serde(default)]
    pub storage_id: Option<String>,
    /// Backing volume, for volume-backed filesystems
    #[serde(default)]
    pub volume_id: Option<String>,
    /// Requested pool
    pub pool: String,
    /// Requested size in MiB
    pub size: u64,
    /// Provisioned details
    #[serde(default)]
    pub info: Option<FilesystemInfo>,
}

impl FilesystemDoc {
    /// Global key for status
    pub fn global_key(&self) -> String {
        super::global_key::filesystem(&self.id)
    }
}

impl Document for FilesystemDoc {
    const COLLECTION: Collection = Collection::Filesystems;
    const KIND: &'static str = "filesystem";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Provisioned details of a filesystem attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemAttachmentInfo {
    /// Mount point
    pub mount_point: String,
    /// Read-only mount
    #[serde(default)]
    pub read_only: bool,
}

/// A filesystem attached to a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemAttachmentDoc {
    /// Filesystem id
    pub filesystem_id: String,
    /// Host
    pub host: AttachmentHost,
    /// Requested location
    #[serde(default)]
    pub location: String,
    /// Provisioned details
    #[serde(default)]
    pub info: Option<FilesystemAttachmentInfo>,
}

impl Document for FilesystemAttachmentDoc {
    const COLLECTION: Collection = Collection::FilesystemAttachments;
    const KIND: &'static str = "filesystem attachment";

    fn key(&self) -> String {
        format!("{}#{}", self.filesystem_id, self.host)
    }
}
