//! Export configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// An optional category of exported data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Actions and operations
    Actions,
    /// Annotations of every entity
    Annotations,
    /// Cloud image metadata
    CloudImageMetadata,
    /// The model's cloud credential
    Credentials,
    /// IP addresses
    IpAddresses,
    /// Application config, leadership settings and relation application settings
    Settings,
    /// SSH host keys
    SshHostKeys,
    /// Status history (current status is always exported)
    StatusHistory,
    /// Link-layer devices
    LinkLayerDevices,
    /// Unit agent binaries
    UnitAgentBinaries,
    /// Machine agent binaries
    MachineAgentBinaries,
    /// Per-unit relation settings
    RelationData,
    /// Machine instance data
    InstanceData,
    /// Application offers
    ApplicationOffers,
    /// Offer connections
    OfferConnections,
}

impl Category {
    /// Every category
    pub const ALL: [Category; 15] = [
        Category::Actions,
        Category::Annotations,
        Category::CloudImageMetadata,
        Category::Credentials,
        Category::IpAddresses,
        Category::Settings,
        Category::SshHostKeys,
        Category::StatusHistory,
        Category::LinkLayerDevices,
        Category::UnitAgentBinaries,
        Category::MachineAgentBinaries,
        Category::RelationData,
        Category::InstanceData,
        Category::ApplicationOffers,
        Category::OfferConnections,
    ];

    /// Category name
    pub fn name(self) -> &'static str {
        match self {
            Category::Actions => "actions",
            Category::Annotations => "annotations",
            Category::CloudImageMetadata => "cloud-image-metadata",
            Category::Credentials => "credentials",
            Category::IpAddresses => "ip-addresses",
            Category::Settings => "settings",
            Category::SshHostKeys => "ssh-host-keys",
            Category::StatusHistory => "status-history",
            Category::LinkLayerDevices => "link-layer-devices",
            Category::UnitAgentBinaries => "unit-agent-binaries",
            Category::MachineAgentBinaries => "machine-agent-binaries",
            Category::RelationData => "relation-data",
            Category::InstanceData => "instance-data",
            Category::ApplicationOffers => "application-offers",
            Category::OfferConnections => "offer-connections",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to leave out of an export, and whether to tolerate missing data.
///
/// Every toggle is independent: skipping one category leaves all others
/// exported in full. Unknown keys are rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Leave out actions and operations
    pub skip_actions: bool,
    /// Leave out annotations
    pub skip_annotations: bool,
    /// Leave out cloud image metadata
    pub skip_cloud_image_metadata: bool,
    /// Leave out the model's cloud credential
    pub skip_credentials: bool,
    /// Leave out IP addresses
    pub skip_ip_addresses: bool,
    /// Leave out application and relation settings
    pub skip_settings: bool,
    /// Leave out SSH host keys
    pub skip_ssh_host_keys: bool,
    /// Leave out status history
    pub skip_status_history: bool,
    /// Leave out link-layer devices
    pub skip_link_layer_devices: bool,
    /// Leave out unit agent binaries
    pub skip_unit_agent_binaries: bool,
    /// Leave out machine agent binaries
    pub skip_machine_agent_binaries: bool,
    /// Leave out per-unit relation settings
    pub skip_relation_data: bool,
    /// Leave out machine instance data
    pub skip_instance_data: bool,
    /// Leave out application offers
    pub skip_application_offers: bool,
    /// Leave out offer connections
    pub skip_offer_connections: bool,
    /// Record missing instance data, agent binaries and relation scope
    /// instead of failing
    pub ignore_incomplete_model: bool,
}

impl ExportConfig {
    /// Whether `category` is skipped
    pub fn skips(&self, category: Category) -> bool {
        match category {
            Category::Actions => self.skip_actions,
            Category::Annotations => self.skip_annotations,
            Category::CloudImageMetadata => self.skip_cloud_image_metadata,
            Category::Credentials => self.skip_credentials,
            Category::IpAddresses => self.skip_ip_addresses,
            Category::Settings => self.skip_settings,
            Category::SshHostKeys => self.skip_ssh_host_keys,
            Category::StatusHistory => self.skip_status_history,
            Category::LinkLayerDevices => self.skip_link_layer_devices,
            Category::UnitAgentBinaries => self.skip_unit_agent_binaries,
            Category::MachineAgentBinaries => self.skip_machine_agent_binaries,
            Category::RelationData => self.skip_relation_data,
            Category::InstanceData => self.skip_instance_data,
            Category::ApplicationOffers => self.skip_application_offers,
            Category::OfferConnections => self.skip_offer_connections,
        }
    }

    /// Set whether `category` is skipped
    pub fn set_skip(&mut self, category: Category, skip: bool) {
        let flag = match category {
            Category::Actions => &mut self.skip_actions,
            Category::Annotations => &mut self.skip_annotations,
            Category::CloudImageMetadata => &mut self.skip_cloud_image_metadata,
            Category::Credentials => &mut self.skip_credentials,
            Category::IpAddresses => &mut self.skip_ip_addresses,
            Category::Settings => &mut self.skip_settings,
            Category::SshHostKeys => &mut self.skip_ssh_host_keys,
            Category::StatusHistory => &mut self.skip_status_history,
            Category::LinkLayerDevices => &mut self.skip_link_layer_devices,
            Category::UnitAgentBinaries => &mut self.skip_unit_agent_binaries,
            Category::MachineAgentBinaries => &mut self.skip_machine_agent_binaries,
            Category::RelationData => &mut self.skip_relation_data,
            Category::InstanceData => &mut self.skip_instance_data,
            Category::ApplicationOffers => &mut self.skip_application_offers,
            Category::OfferConnections => &mut self.skip_offer_connections,
        };
        *flag = skip;
    }

    /// A configuration skipping exactly `categories`
    pub fn skipping(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut config = Self::default();
        for category in categories {
            config.set_skip(category, true);
        }
        config
    }

    /// Same configuration with tolerant mode switched on
    pub fn tolerant(mut self) -> Self {
        self.ignore_incomplete_model = true;
        self
    }

    /// Categories currently skipped
    pub fn skipped(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.skips(*c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipping_sets_only_named_categories() {
        let config = ExportConfig::skipping([Category::Actions, Category::IpAddresses]);
        for category in Category::ALL {
            let expected = matches!(category, Category::Actions | Category::IpAddresses);
            assert_eq!(config.skips(category), expected, "{category}");
        }
        assert!(!config.ignore_incomplete_model);
    }

    #[test]
    fn test_deserialize_rejects_unknown_toggle() {
        let err = serde_json::from_str::<ExportConfig>(r#"{"skip_everything": true}"#);
        assert!(err.is_err());

        let config: ExportConfig =
            serde_json::from_str(r#"{"skip_settings": true, "ignore_incomplete_model": true}"#)
                .unwrap();
        assert!(config.skip_settings);
        assert!(config.ignore_incomplete_model);
    }
}
