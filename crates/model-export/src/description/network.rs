//! Exported networking

use model_store::models::IpAddressDoc;
use serde::{Deserialize, Serialize};

/// An exported IP address with its derived space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedIpAddress {
    /// Machine id
    pub machine_id: String,
    /// Device name
    pub device_name: String,
    /// Address value
    pub value: String,
    /// CIDR of its subnet
    pub subnet_cidr: String,
    /// Space of its subnet; empty when the subnet is unknown
    pub space_id: String,
    /// Configuration method
    pub config_method: String,
    /// Provider id
    pub provider_id: String,
    /// DNS servers
    pub dns_servers: Vec<String>,
    /// DNS search domains
    pub dns_search_domains: Vec<String>,
    /// Gateway
    pub gateway_address: String,
    /// Origin
    pub origin: String,
}

impl ExportedIpAddress {
    /// Export an address, placing it in `space_id`
    pub fn new(doc: IpAddressDoc, space_id: &str) -> Self {
        Self {
            machine_id: doc.machine_id,
            device_name: doc.device_name,
            value: doc.value,
            subnet_cidr: doc.subnet_cidr,
            space_id: space_id.to_string(),
            config_method: doc.config_method,
            provider_id: doc.provider_id,
            dns_servers: doc.dns_servers,
            dns_search_domains: doc.dns_search_domains,
            gateway_address: doc.gateway_address,
            origin: doc.origin,
        }
    }
}
