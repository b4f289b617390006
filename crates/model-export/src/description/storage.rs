//! Exported storage

use crate::history::StatusEntry;
use model_store::models::{
    AttachmentHost, DeviceType, FilesystemAttachmentInfo, FilesystemInfo, PlanBlockDevice,
    VolumeAttachmentInfo, VolumeInfo,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A volume attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedVolumeAttachment {
    /// Host
    pub host: AttachmentHost,
    /// Requested read-only
    pub read_only: bool,
    /// Provisioned details
    pub provisioned: Option<VolumeAttachmentInfo>,
}

/// A volume attachment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedAttachmentPlan {
    /// Machine
    pub machine: String,
    /// Device type
    pub device_type: DeviceType,
    /// Device attributes
    pub device_attributes: BTreeMap<String, String>,
    /// Block device, once the host agent has reported it
    pub block_device: Option<PlanBlockDevice>,
}

/// An exported volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedVolume {
    /// Volume id
    pub id: String,
    /// Storage instance
    pub storage_id: Option<String>,
    /// Requested pool
    pub pool: String,
    /// Requested size in MiB
    pub size: u64,
    /// Provisioned details
    pub provisioned: Option<VolumeInfo>,
    /// Status
    pub status: Option<StatusEntry>,
    /// Status history, newest first
    pub status_history: Vec<StatusEntry>,
    /// Attachments
    pub attachments: Vec<ExportedVolumeAttachment>,
    /// Attachment plans
    pub attachment_plans: Vec<ExportedAttachmentPlan>,
}

/// A filesystem attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFilesystemAttachment {
    /// Host
    pub host: AttachmentHost,
    /// Requested location
    pub location: String,
    /// Provisioned details
    pub provisioned: Option<FilesystemAttachmentInfo>,
}

/// An exported filesystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedFilesystem {
    /// Filesystem id
    pub id: String,
    /// Storage instance
    pub storage_id: Option<String>,
    /// Backing volume
    pub volume_id: Option<String>,
    /// Requested pool
    pub pool: String,
    /// Requested size in MiB
    pub size: u64,
    /// Provisioned details
    pub provisioned: Option<FilesystemInfo>,
    /// Status
    pub status: Option<StatusEntry>,
    /// Status history, newest first
    pub status_history: Vec<StatusEntry>,
    /// Attachments
    pub attachments: Vec<ExportedFilesystemAttachment>,
}
