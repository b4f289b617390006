//! Networking documents

use super::Document;
use crate::collection::Collection;
use serde::{Deserialize, Serialize};

/// Id of the default space every model starts with
pub const DEFAULT_SPACE_ID: &str = "0";

/// Name of the default space
pub const DEFAULT_SPACE_NAME: &str = "alpha";

/// A network space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceDoc {
    /// Space id
    pub id: String,
    /// Space name
    pub name: String,
    /// Provider id
    #[serde(default)]
    pub provider_id: String,
    /// Whether the space is public
    #[serde(default)]
    pub is_public: bool,
}

impl Document for SpaceDoc {
    const COLLECTION: Collection = Collection::Spaces;
    const KIND: &'static str = "space";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Fan networking pair; both values are kept as given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanNetwork {
    /// Local underlay CIDR
    pub local_underlay: String,
    /// Overlay CIDR
    pub overlay: String,
}

/// A subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetDoc {
    /// Subnet id
    pub id: String,
    /// CIDR
    pub cidr: String,
    /// Provider id
    #[serde(default)]
    pub provider_id: String,
    /// Provider network id
    #[serde(default)]
    pub provider_network_id: String,
    /// VLAN tag
    #[serde(default)]
    pub vlan_tag: u32,
    /// Availability zones
    #[serde(default)]
    pub availability_zones: Vec<String>,
    /// Space the subnet belongs to
    pub space_id: String,
    /// Fan networking pair
    #[serde(default)]
    pub fan: Option<FanNetwork>,
    /// Whether the subnet is public
    #[serde(default)]
    pub is_public: bool,
}

impl Document for SubnetDoc {
    const COLLECTION: Collection = Collection::Subnets;
    const KIND: &'static str = "subnet";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// A link-layer network device on a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkLayerDeviceDoc {
    /// Machine id
    pub machine_id: String,
    /// Device name
    pub name: String,
    /// MTU
    #[serde(default)]
    pub mtu: u32,
    /// Provider id
    #[serde(default)]
    pub provider_id: String,
    /// Device type, e.g. `ethernet`, `bridge`
    pub device_type: String,
    /// MAC address
    #[serde(default)]
    pub mac_address: String,
    /// Whether the device starts automatically
    #[serde(default)]
    pub is_auto_start: bool,
    /// Whether the device is up
    #[serde(default)]
    pub is_up: bool,
    /// Parent device name
    #[serde(default)]
    pub parent_name: String,
}

impl Document for LinkLayerDeviceDoc {
    const COLLECTION: Collection = Collection::LinkLayerDevices;
    const KIND: &'static str = "link-layer device";

    fn key(&self) -> String {
        format!("m#{}#d#{}", self.machine_id, self.name)
    }
}

/// An IP address assigned to a link-layer device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddressDoc {
    /// Machine id
    pub machine_id: String,
    /// Device name
    pub device_name: String,
    /// Address value
    pub value: String,
    /// CIDR of the subnet the address is in
    pub subnet_cidr: String,
    /// `static`, `dynamic`, `manual` or `loopback`
    pub config_method: String,
    /// Provider id
    #[serde(default)]
    pub provider_id: String,
    /// DNS servers
    #[serde(default)]
    pub dns_servers: Vec<String>,
    /// DNS search domains
    #[serde(default)]
    pub dns_search_domains: Vec<String>,
    /// Gateway address
    #[serde(default)]
    pub gateway_address: String,
    /// `provider` or `machine`
    #[serde(default)]
    pub origin: String,
}

impl Document for IpAddressDoc {
    const COLLECTION: Collection = Collection::IpAddresses;
    const KIND: &'static str = "ip address";

    fn key(&self) -> String {
        format!("m#{}#d#{}#ip#{}", self.machine_id, self.device_name, self.value)
    }
}
