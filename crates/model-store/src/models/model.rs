//! Model-level documents

use super::{Constraints, Document, MeterStatus, Settings};
use crate::collection::Collection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Model type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Machine-based model
    Iaas,
    /// Kubernetes model
    Caas,
}

/// Support level agreement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sla {
    /// Level, e.g. `essential`
    pub level: String,
    /// Owner of the agreement
    pub owner: String,
    /// Opaque credentials
    pub credentials: String,
}

/// The model document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDoc {
    /// Model UUID
    pub uuid: Uuid,
    /// Model name
    pub name: String,
    /// Model type
    pub model_type: ModelType,
    /// Owning user
    pub owner: String,
    /// Model configuration
    #[serde(default)]
    pub config: Settings,
    /// Model constraints
    #[serde(default)]
    pub constraints: Constraints,
    /// Agent password hash
    #[serde(default)]
    pub password_hash: String,
    /// Newest agent version seen by the model
    #[serde(default)]
    pub latest_tools_version: Option<String>,
    /// Environ upgrade step counter
    #[serde(default)]
    pub environ_version: u32,
    /// Cloud name
    pub cloud: String,
    /// Cloud region
    #[serde(default)]
    pub cloud_region: String,
    /// Credential id `<cloud>/<owner>/<name>`
    #[serde(default)]
    pub cloud_credential: Option<String>,
    /// Support agreement
    #[serde(default)]
    pub sla: Sla,
    /// Model meter status
    #[serde(default)]
    pub meter_status: MeterStatus,
    /// Controller hosting the model
    pub controller_uuid: Uuid,
}

impl Document for ModelDoc {
    const COLLECTION: Collection = Collection::Models;
    const KIND: &'static str = "model";

    fn key(&self) -> String {
        Self::KEY.to_string()
    }
}

impl ModelDoc {
    /// The single key the model document is stored under
    pub const KEY: &'static str = "model";

    /// An IAAS model with fresh UUIDs and empty settings
    pub fn new(name: impl Into<String>, owner: impl Into<String>, cloud: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            model_type: ModelType::Iaas,
            owner: owner.into(),
            config: Settings::new(),
            constraints: Constraints::default(),
            password_hash: String::new(),
            latest_tools_version: None,
            environ_version: 0,
            cloud: cloud.into(),
            cloud_region: String::new(),
            cloud_credential: None,
            sla: Sla::default(),
            meter_status: MeterStatus::default(),
            controller_uuid: Uuid::new_v4(),
        }
    }
}

/// A user with access to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUserDoc {
    /// User name
    pub name: String,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Access level: `read`, `write` or `admin`
    pub access: String,
    /// Who granted access
    pub created_by: String,
    /// When access was granted
    pub date_created: DateTime<Utc>,
    /// Last connection to the model
    #[serde(default)]
    pub last_connection: Option<DateTime<Utc>>,
}

impl Document for ModelUserDoc {
    const COLLECTION: Collection = Collection::ModelUsers;
    const KIND: &'static str = "model user";

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// A named monotonic counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDoc {
    /// Sequence name
    pub name: String,
    /// Next value to hand out
    pub counter: u64,
}

impl Document for SequenceDoc {
    const COLLECTION: Collection = Collection::Sequences;
    const KIND: &'static str = "sequence";

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// Kind of change block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    /// Block model destruction
    Destroy,
    /// Block removals
    Remove,
    /// Block all changes
    Change,
}

impl BlockType {
    /// Name of the block type
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Destroy => "destroy",
            BlockType::Remove => "remove",
            BlockType::Change => "change",
        }
    }
}

/// An active change block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDoc {
    /// Block type
    pub block_type: BlockType,
    /// Message shown to users
    pub message: String,
}

impl Document for BlockDoc {
    const COLLECTION: Collection = Collection::Blocks;
    const KIND: &'static str = "block";

    fn key(&self) -> String {
        self.block_type.as_str().to_string()
    }
}

/// A cloud credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudCredentialDoc {
    /// Cloud name
    pub cloud: String,
    /// Owning user
    pub owner: String,
    /// Credential name
    pub name: String,
    /// Authentication type
    pub auth_type: String,
    /// Credential attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl CloudCredentialDoc {
    /// Credential id as referenced by the model
    pub fn id(&self) -> String {
        format!("{}/{}/{}", self.cloud, self.owner, self.name)
    }
}

impl Document for CloudCredentialDoc {
    const COLLECTION: Collection = Collection::CloudCredentials;
    const KIND: &'static str = "cloud credential";

    fn key(&self) -> String {
        self.id()
    }
}
