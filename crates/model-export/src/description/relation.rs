//! Exported relations

use crate::history::StatusEntry;
use model_store::models::{RelationScope, Role, Settings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One side of an exported relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedEndpoint {
    /// Application (local or remote)
    pub application_name: String,
    /// Endpoint name
    pub name: String,
    /// Role
    pub role: Role,
    /// Interface
    pub interface: String,
    /// Optional flag
    pub optional: bool,
    /// Relation limit
    pub limit: u32,
    /// Scope
    pub scope: RelationScope,
    /// Settings shared by the application
    pub application_settings: Settings,
    /// unit name → settings, for units in scope
    pub unit_settings: BTreeMap<String, Settings>,
}

impl ExportedEndpoint {
    /// Number of units of this endpoint in scope
    pub fn unit_count(&self) -> usize {
        self.unit_settings.len()
    }
}

/// An exported relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRelation {
    /// Numeric id
    pub id: i64,
    /// Relation key
    pub key: String,
    /// Suspended flag
    pub suspended: bool,
    /// Suspension reason
    pub suspended_reason: String,
    /// Status; relations created before status tracking have none
    pub status: Option<StatusEntry>,
    /// Endpoints in canonical order
    pub endpoints: Vec<ExportedEndpoint>,
}
