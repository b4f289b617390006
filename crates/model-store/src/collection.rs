//! Named document collections

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every collection a model store holds.
///
/// The set is closed: backends create all of them on [`init`] and a
/// collection that has gone missing afterwards is reported as
/// [`Error::MissingCollection`] rather than silently treated as empty.
///
/// [`init`]: crate::backend::StoreBackend::init
/// [`Error::MissingCollection`]: crate::Error::MissingCollection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    /// The model document itself
    Models,
    /// Users with access to the model
    ModelUsers,
    /// Named monotonic counters
    Sequences,
    /// Change blocks
    Blocks,
    /// Annotations keyed by global key
    Annotations,
    /// Current status keyed by global key
    Statuses,
    /// Status transitions keyed by global key and sequence
    StatusHistory,
    /// Agent binaries keyed by global key
    Tools,
    /// Machines
    Machines,
    /// Provider instance data for provisioned machines
    InstanceData,
    /// Block devices seen on machines
    BlockDevices,
    /// Opened port ranges per machine
    OpenedPorts,
    /// SSH host keys per machine
    SshHostKeys,
    /// Applications
    Applications,
    /// Units
    Units,
    /// Application and unit resources
    Resources,
    /// Leases (application leadership and others)
    Leases,
    /// Relations
    Relations,
    /// Units that entered a relation scope, with their settings
    RelationScopes,
    /// Per-application relation settings
    RelationSettings,
    /// Storage instances
    StorageInstances,
    /// Storage pools
    StoragePools,
    /// Volumes
    Volumes,
    /// Volume attachments
    VolumeAttachments,
    /// Volume attachment plans
    VolumeAttachmentPlans,
    /// Filesystems
    Filesystems,
    /// Filesystem attachments
    FilesystemAttachments,
    /// Network spaces
    Spaces,
    /// Subnets
    Subnets,
    /// Link-layer devices
    LinkLayerDevices,
    /// IP addresses on link-layer devices
    IpAddresses,
    /// Secret metadata
    Secrets,
    /// Immutable secret revisions
    SecretRevisions,
    /// Applications offered by other models
    RemoteApplications,
    /// Controllers hosting consumed offers
    ExternalControllers,
    /// Offers published by this model
    ApplicationOffers,
    /// Connections made to published offers
    OfferConnections,
    /// Cross-model entity tokens
    RemoteEntities,
    /// Model firewall rules
    FirewallRules,
    /// Ingress/egress networks of cross-model relations
    RelationNetworks,
    /// Actions
    Actions,
    /// Operations grouping actions
    Operations,
    /// Cloud image metadata
    CloudImageMetadata,
    /// Cloud credentials
    CloudCredentials,
}

impl Collection {
    /// All collections, in declaration order
    pub const ALL: [Collection; 44] = [
        Collection::Models,
        Collection::ModelUsers,
        Collection::Sequences,
        Collection::Blocks,
        Collection::Annotations,
        Collection::Statuses,
        Collection::StatusHistory,
        Collection::Tools,
        Collection::Machines,
        Collection::InstanceData,
        Collection::BlockDevices,
        Collection::OpenedPorts,
        Collection::SshHostKeys,
        Collection::Applications,
        Collection::Units,
        Collection::Resources,
        Collection::Leases,
        Collection::Relations,
        Collection::RelationScopes,
        Collection::RelationSettings,
        Collection::StorageInstances,
        Collection::StoragePools,
        Collection::Volumes,
        Collection::VolumeAttachments,
        Collection::VolumeAttachmentPlans,
        Collection::Filesystems,
        Collection::FilesystemAttachments,
        Collection::Spaces,
        Collection::Subnets,
        Collection::LinkLayerDevices,
        Collection::IpAddresses,
        Collection::Secrets,
        Collection::SecretRevisions,
        Collection::RemoteApplications,
        Collection::ExternalControllers,
        Collection::ApplicationOffers,
        Collection::OfferConnections,
        Collection::RemoteEntities,
        Collection::FirewallRules,
        Collection::RelationNetworks,
        Collection::Actions,
        Collection::Operations,
        Collection::CloudImageMetadata,
        Collection::CloudCredentials,
    ];

    /// Stable name used as the backend tree name
    pub fn name(self) -> &'static str {
        match self {
            Collection::Models => "models",
            Collection::ModelUsers => "model-users",
            Collection::Sequences => "sequences",
            Collection::Blocks => "blocks",
            Collection::Annotations => "annotations",
            Collection::Statuses => "statuses",
            Collection::StatusHistory => "status-history",
            Collection::Tools => "tools",
            Collection::Machines => "machines",
            Collection::InstanceData => "instance-data",
            Collection::BlockDevices => "block-devices",
            Collection::OpenedPorts => "opened-ports",
            Collection::SshHostKeys => "ssh-host-keys",
            Collection::Applications => "applications",
            Collection::Units => "units",
            Collection::Resources => "resources",
            Collection::Leases => "leases",
            Collection::Relations => "relations",
            Collection::RelationScopes => "relation-scopes",
            Collection::RelationSettings => "relation-settings",
            Collection::StorageInstances => "storage-instances",
            Collection::StoragePools => "storage-pools",
            Collection::Volumes => "volumes",
            Collection::VolumeAttachments => "volume-attachments",
            Collection::VolumeAttachmentPlans => "volume-attachment-plans",
            Collection::Filesystems => "filesystems",
            Collection::FilesystemAttachments => "filesystem-attachments",
            Collection::Spaces => "spaces",
            Collection::Subnets => "subnets",
            Collection::LinkLayerDevices => "link-layer-devices",
            Collection::IpAddresses => "ip-addresses",
            Collection::Secrets => "secrets",
            Collection::SecretRevisions => "secret-revisions",
            Collection::RemoteApplications => "remote-applications",
            Collection::ExternalControllers => "external-controllers",
            Collection::ApplicationOffers => "application-offers",
            Collection::OfferConnections => "offer-connections",
            Collection::RemoteEntities => "remote-entities",
            Collection::FirewallRules => "firewall-rules",
            Collection::RelationNetworks => "relation-networks",
            Collection::Actions => "actions",
            Collection::Operations => "operations",
            Collection::CloudImageMetadata => "cloud-image-metadata",
            Collection::CloudCredentials => "cloud-credentials",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
