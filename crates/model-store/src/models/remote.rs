//! Cross-model relation documents

use super::{Document, Role};
use crate::collection::Collection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An endpoint offered by a remote application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEndpoint {
    /// Endpoint name
    pub name: String,
    /// Role
    pub role: Role,
    /// Interface name
    pub interface: String,
}

/// A subnet of a remote space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSubnet {
    /// CIDR
    pub cidr: String,
    /// Provider id
    #[serde(default)]
    pub provider_id: String,
    /// Provider network id
    #[serde(default)]
    pub provider_network_id: String,
    /// Provider space id
    #[serde(default)]
    pub provider_space_id: String,
    /// VLAN tag
    #[serde(default)]
    pub vlan_tag: u32,
    /// Availability zones
    #[serde(default)]
    pub availability_zones: Vec<String>,
}

/// A space in the offering model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSpace {
    /// Cloud type
    pub cloud_type: String,
    /// Space name
    pub name: String,
    /// Provider id
    #[serde(default)]
    pub provider_id: String,
    /// Provider attributes
    #[serde(default)]
    pub provider_attributes: BTreeMap<String, String>,
    /// Subnets
    #[serde(default)]
    pub subnets: Vec<RemoteSubnet>,
}

/// An application offered by another model and consumed here, or a
/// consumer proxy for an offer made by this model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteApplicationDoc {
    /// Local name
    pub name: String,
    /// Offer UUID
    pub offer_uuid: String,
    /// Offer URL
    #[serde(default)]
    pub url: String,
    /// Model that hosts the offer
    pub source_model_uuid: String,
    /// Controller that hosts the offer, when not this one
    #[serde(default)]
    pub external_controller_uuid: Option<String>,
    /// Offered endpoints
    #[serde(default)]
    pub endpoints: Vec<RemoteEndpoint>,
    /// Spaces of the offering model
    #[serde(default)]
    pub spaces: Vec<RemoteSpace>,
    /// Endpoint name → remote space name
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
    /// Whether this is a proxy for a consumer of a local offer
    #[serde(default)]
    pub is_consumer_proxy: bool,
}

impl RemoteApplicationDoc {
    /// Global key for status
    pub fn global_key(&self) -> String {
        super::global_key::remote_application(&self.name)
    }
}

impl Document for RemoteApplicationDoc {
    const COLLECTION: Collection = Collection::RemoteApplications;
    const KIND: &'static str = "remote application";

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// A controller hosting offers consumed by this model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalControllerDoc {
    /// Controller UUID
    pub id: String,
    /// Alias
    #[serde(default)]
    pub alias: String,
    /// API addresses
    pub addrs: Vec<String>,
    /// CA certificate
    #[serde(default)]
    pub ca_cert: String,
    /// Models on the controller with consumed offers
    #[serde(default)]
    pub models: Vec<String>,
}

impl Document for ExternalControllerDoc {
    const COLLECTION: Collection = Collection::ExternalControllers;
    const KIND: &'static str = "external controller";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// An application offer published by this model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationOfferDoc {
    /// Offer UUID
    pub offer_uuid: String,
    /// Offer name
    pub offer_name: String,
    /// Offered application
    pub application_name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Offered endpoint alias → application endpoint
    pub endpoints: BTreeMap<String, String>,
    /// User → access level
    #[serde(default)]
    pub acl: BTreeMap<String, String>,
}

impl Document for ApplicationOfferDoc {
    const COLLECTION: Collection = Collection::ApplicationOffers;
    const KIND: &'static str = "application offer";

    fn key(&self) -> String {
        self.offer_uuid.clone()
    }
}

/// A consumer's connection to one of this model's offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferConnectionDoc {
    /// Offer UUID
    pub offer_uuid: String,
    /// Local relation id
    pub relation_id: i64,
    /// Local relation key
    pub relation_key: String,
    /// Consuming model
    pub source_model_uuid: String,
    /// Consuming user
    pub username: String,
}

impl Document for OfferConnectionDoc {
    const COLLECTION: Collection = Collection::OfferConnections;
    const KIND: &'static str = "offer connection";

    fn key(&self) -> String {
        format!("{}#{}", self.offer_uuid, self.relation_id)
    }
}

/// Token by which an entity is known to another model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntityDoc {
    /// Entity tag, e.g. `application-mysql`
    pub id: String,
    /// Token
    pub token: String,
    /// Macaroon, if one was issued
    #[serde(default)]
    pub macaroon: String,
}

impl Document for RemoteEntityDoc {
    const COLLECTION: Collection = Collection::RemoteEntities;
    const KIND: &'static str = "remote entity";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Service a firewall rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WellKnownService {
    /// SSH
    Ssh,
    /// Controller API
    JujuController,
    /// Offers consumed cross-model
    JujuApplicationOffer,
}

impl WellKnownService {
    /// Service name
    pub fn as_str(self) -> &'static str {
        match self {
            WellKnownService::Ssh => "ssh",
            WellKnownService::JujuController => "juju-controller",
            WellKnownService::JujuApplicationOffer => "juju-application-offer",
        }
    }
}

/// Model firewall rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRuleDoc {
    /// Service
    pub service: WellKnownService,
    /// Allowed source CIDRs
    pub whitelist_cidrs: Vec<String>,
}

impl Document for FirewallRuleDoc {
    const COLLECTION: Collection = Collection::FirewallRules;
    const KIND: &'static str = "firewall rule";

    fn key(&self) -> String {
        self.service.as_str().to_string()
    }
}

/// Direction of relation network traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkDirection {
    /// Traffic into the model
    Ingress,
    /// Traffic out of the model
    Egress,
}

/// CIDRs allowed for a cross-model relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationNetworksDoc {
    /// Relation key
    pub relation_key: String,
    /// Direction
    pub direction: NetworkDirection,
    /// CIDRs
    pub cidrs: Vec<String>,
}

impl RelationNetworksDoc {
    /// Id of the document, derived from relation key and direction
    pub fn id(&self) -> String {
        let direction = match self.direction {
            NetworkDirection::Ingress => "ingress",
            NetworkDirection::Egress => "egress",
        };
        format!("{}#{}", self.relation_key, direction)
    }
}

impl Document for RelationNetworksDoc {
    const COLLECTION: Collection = Collection::RelationNetworks;
    const KIND: &'static str = "relation networks";

    fn key(&self) -> String {
        self.id()
    }
}
