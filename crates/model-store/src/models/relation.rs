//! Relation documents

use super::{Document, Settings};
use crate::collection::Collection;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Role of an endpoint in a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Provides the interface
    Provider,
    /// Requires the interface
    Requirer,
    /// Peer relation
    Peer,
}

impl Role {
    /// Role name
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Provider => "provider",
            Role::Requirer => "requirer",
            Role::Peer => "peer",
        }
    }
}

/// Relation scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationScope {
    /// Every unit sees every remote unit
    Global,
    /// Units only see units in the same container
    Container,
}

/// One application's side of a relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Application name (local or remote)
    pub application_name: String,
    /// Endpoint name from the charm metadata
    pub name: String,
    /// Role
    pub role: Role,
    /// Interface name
    pub interface: String,
    /// Whether the relation is optional
    #[serde(default)]
    pub optional: bool,
    /// Maximum number of relations (0 for unlimited)
    #[serde(default)]
    pub limit: u32,
    /// Scope
    pub scope: RelationScope,
}

impl Endpoint {
    /// A globally scoped endpoint
    pub fn new(application: &str, name: &str, role: Role, interface: &str) -> Self {
        Self {
            application_name: application.to_string(),
            name: name.to_string(),
            role,
            interface: interface.to_string(),
            optional: false,
            limit: 0,
            scope: RelationScope::Global,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.application_name, self.name)
    }
}

/// Canonical ordering of endpoints: requirer before provider before peer,
/// then by `application:name`
fn endpoint_order(a: &Endpoint, b: &Endpoint) -> Ordering {
    b.role
        .as_str()
        .cmp(a.role.as_str())
        .then_with(|| a.to_string().cmp(&b.to_string()))
}

/// Relation key for a set of endpoints, e.g. `wordpress:db mysql:server`
pub fn relation_key(endpoints: &[Endpoint]) -> String {
    let mut sorted: Vec<&Endpoint> = endpoints.iter().collect();
    sorted.sort_by(|a, b| endpoint_order(a, b));
    sorted
        .iter()
        .map(|ep| ep.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A relation between application endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDoc {
    /// Numeric id
    pub id: i64,
    /// Relation key
    pub key: String,
    /// Endpoints in canonical order
    pub endpoints: Vec<Endpoint>,
    /// Whether the relation is suspended
    #[serde(default)]
    pub suspended: bool,
    /// Why it was suspended
    #[serde(default)]
    pub suspended_reason: String,
    /// Units currently in scope, across all endpoints
    #[serde(default)]
    pub unit_count: u32,
}

impl RelationDoc {
    /// A relation with a derived key and canonical endpoint order
    pub fn new(id: i64, mut endpoints: Vec<Endpoint>) -> Self {
        endpoints.sort_by(endpoint_order);
        Self {
            id,
            key: relation_key(&endpoints),
            endpoints,
            suspended: false,
            suspended_reason: String::new(),
            unit_count: 0,
        }
    }

    /// Endpoint of `application`, if it takes part in the relation
    pub fn endpoint(&self, application: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|ep| ep.application_name == application)
    }

    /// Global key for status
    pub fn global_key(&self) -> String {
        super::global_key::relation(self.id)
    }
}

impl Document for RelationDoc {
    const COLLECTION: Collection = Collection::Relations;
    const KIND: &'static str = "relation";

    fn key(&self) -> String {
        self.key.clone()
    }
}

/// A unit that entered a relation's scope, with its settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationScopeDoc {
    /// Relation id
    pub relation_id: i64,
    /// Application whose endpoint the unit joined through
    pub application: String,
    /// Unit name
    pub unit: String,
    /// Settings written by the unit
    #[serde(default)]
    pub settings: Settings,
}

impl RelationScopeDoc {
    /// Key prefix covering every scope entry of a relation
    pub fn prefix(relation_id: i64) -> String {
        format!("r#{relation_id}#")
    }
}

impl Document for RelationScopeDoc {
    const COLLECTION: Collection = Collection::RelationScopes;
    const KIND: &'static str = "relation scope";

    fn key(&self) -> String {
        format!("{}{}#{}", Self::prefix(self.relation_id), self.application, self.unit)
    }
}

/// Relation settings shared by one application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationAppSettingsDoc {
    /// Relation id
    pub relation_id: i64,
    /// Application name
    pub application: String,
    /// Settings
    #[serde(default)]
    pub settings: Settings,
}

impl Document for RelationAppSettingsDoc {
    const COLLECTION: Collection = Collection::RelationSettings;
    const KIND: &'static str = "relation application settings";

    fn key(&self) -> String {
        format!("r#{}#{}", self.relation_id, self.application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_key_puts_requirer_first() {
        let endpoints = vec![
            Endpoint::new("mysql", "server", Role::Provider, "mysql"),
            Endpoint::new("wordpress", "db", Role::Requirer, "mysql"),
        ];
        assert_eq!(relation_key(&endpoints), "wordpress:db mysql:server");

        let doc = RelationDoc::new(0, endpoints);
        assert_eq!(doc.endpoints[0].application_name, "wordpress");
        assert_eq!(doc.key, "wordpress:db mysql:server");
    }

    #[test]
    fn test_peer_relation_key() {
        let endpoints = vec![Endpoint::new("riak", "ring", Role::Peer, "riak")];
        assert_eq!(relation_key(&endpoints), "riak:ring");
    }
}
