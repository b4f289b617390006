//! Phased snapshot assembly
//!
//! Phases run strictly in order. Within a phase independent readers run
//! concurrently; the resolver is written only once a phase's reads have
//! all completed, so every phase sees exactly the registrations of the
//! phases before it.

use crate::{
    description::{ExportedIpAddress, ExportedMachine, Snapshot},
    error::{BrokenReference, Error, Result},
    readers::*,
    resolver::{RefKind, ReferenceResolver, ReferenceTable},
};
use futures::try_join;
use model_store::models::{container_depth, parent_machine_id};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Deepest allowed container nesting (host machines are depth 0)
pub const MAX_CONTAINER_DEPTH: usize = 8;

/// Export phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Model root
    Model,
    /// Users, sequences and blocks
    SequencesBlocks,
    /// Machines and containers
    Machines,
    /// Applications
    Applications,
    /// Units and leadership
    Units,
    /// Relations
    Relations,
    /// Storage
    Storage,
    /// Spaces, subnets, devices and addresses
    Networking,
    /// Secrets
    Secrets,
    /// Remote applications, controllers, offers and connections
    CrossModel,
    /// Firewall rules and relation networks
    Firewall,
    /// Actions, operations and image metadata
    Ancillary,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Model => "model",
            Phase::SequencesBlocks => "sequences and blocks",
            Phase::Machines => "machines",
            Phase::Applications => "applications",
            Phase::Units => "units",
            Phase::Relations => "relations",
            Phase::Storage => "storage",
            Phase::Networking => "networking",
            Phase::Secrets => "secrets",
            Phase::CrossModel => "cross-model",
            Phase::Firewall => "firewall",
            Phase::Ancillary => "ancillary",
        };
        f.write_str(name)
    }
}

/// Result of assembly, before validation
pub(crate) struct Assembly {
    pub(crate) snapshot: Snapshot,
    pub(crate) table: ReferenceTable,
    /// Entities dropped during assembly because their owner is missing
    pub(crate) broken: Vec<BrokenReference>,
}

pub(crate) struct Assembler {
    ctx: ReadContext,
    resolver: ReferenceResolver,
    broken: Vec<BrokenReference>,
}

impl Assembler {
    pub(crate) fn new(ctx: ReadContext) -> Self {
        Self {
            ctx,
            resolver: ReferenceResolver::new(),
            broken: Vec::new(),
        }
    }

    fn enter(&self, phase: Phase) -> Result<()> {
        self.ctx.cancel.check()?;
        info!("Export phase: {}", phase);
        Ok(())
    }

    pub(crate) async fn run(mut self) -> Result<Assembly> {
        self.enter(Phase::Model)?;
        let model = read_model(&self.ctx).await?;
        let mut snapshot = Snapshot::new(model);

        self.enter(Phase::SequencesBlocks)?;
        let (users, sequences, blocks) = try_join!(
            read_users(&self.ctx),
            read_sequences(&self.ctx),
            read_blocks(&self.ctx),
        )?;
        snapshot.users = users;
        snapshot.sequences = sequences;
        snapshot.blocks = blocks;

        self.enter(Phase::Machines)?;
        let (machines, ssh_host_keys) =
            try_join!(read_machines(&self.ctx), read_ssh_host_keys(&self.ctx))?;
        snapshot.machines = self.build_machine_tree(machines)?;
        for machine in snapshot.machines.iter().flat_map(ExportedMachine::flatten) {
            self.resolver.register_id(RefKind::Machine, &machine.id)?;
        }
        snapshot.ssh_host_keys = ssh_host_keys;

        self.enter(Phase::Applications)?;
        let applications = read_applications(&self.ctx).await?;
        for app in &applications {
            self.resolver.register_id(RefKind::Application, &app.name)?;
        }
        snapshot.applications = applications;

        self.enter(Phase::Units)?;
        let (units, leaders) = try_join!(read_units(&self.ctx), read_leaders(&self.ctx))?;
        self.attach_units(&mut snapshot, units, leaders)?;

        self.enter(Phase::Relations)?;
        let relations = read_relations(&self.ctx).await?;
        for relation in &relations {
            self.resolver
                .register(RefKind::Relation, &relation.key, &relation.id.to_string())?;
        }
        snapshot.relations = relations;

        self.enter(Phase::Storage)?;
        let (storages, pools, volumes, filesystems) = try_join!(
            read_storages(&self.ctx),
            read_storage_pools(&self.ctx),
            read_volumes(&self.ctx),
            read_filesystems(&self.ctx),
        )?;
        for storage in &storages {
            self.resolver.register_id(RefKind::StorageInstance, &storage.id)?;
        }
        for volume in &volumes {
            self.resolver.register_id(RefKind::Volume, &volume.id)?;
        }
        for filesystem in &filesystems {
            self.resolver.register_id(RefKind::Filesystem, &filesystem.id)?;
        }
        snapshot.storages = storages;
        snapshot.storage_pools = pools;
        snapshot.volumes = volumes;
        snapshot.filesystems = filesystems;

        self.enter(Phase::Networking)?;
        let (spaces, subnets, devices, addresses) = try_join!(
            read_spaces(&self.ctx),
            read_subnets(&self.ctx),
            read_link_layer_devices(&self.ctx),
            read_ip_addresses(&self.ctx),
        )?;
        for space in &spaces {
            self.resolver.register_id(RefKind::Space, &space.id)?;
            self.resolver.register(RefKind::SpaceName, &space.name, &space.id)?;
        }
        let mut subnet_spaces = BTreeMap::new();
        for subnet in &subnets {
            self.resolver.register(RefKind::Subnet, &subnet.cidr, &subnet.id)?;
            subnet_spaces.insert(subnet.id.clone(), subnet.space_id.clone());
        }
        for device in &devices {
            let key = format!("{}:{}", device.machine_id, device.name);
            self.resolver.register(RefKind::LinkLayerDevice, &key, &device.name)?;
        }
        snapshot.ip_addresses = addresses
            .into_iter()
            .map(|doc| {
                // Advisory: an address outside every known subnet gets the
                // empty space and is reported by validation.
                let space_id = self
                    .resolver
                    .resolve(RefKind::Subnet, &doc.subnet_cidr)
                    .and_then(|subnet_id| subnet_spaces.get(subnet_id))
                    .map_or("", String::as_str);
                ExportedIpAddress::new(doc, space_id)
            })
            .collect();
        snapshot.spaces = spaces;
        snapshot.subnets = subnets;
        snapshot.link_layer_devices = devices;

        self.enter(Phase::Secrets)?;
        snapshot.secrets = read_secrets(&self.ctx).await?;

        self.enter(Phase::CrossModel)?;
        let (remotes, controllers, offers, connections, entities) = try_join!(
            read_remote_applications(&self.ctx),
            read_external_controllers(&self.ctx),
            read_offers(&self.ctx),
            read_offer_connections(&self.ctx),
            read_remote_entities(&self.ctx),
        )?;
        for remote in &remotes {
            self.resolver.register_id(RefKind::RemoteApplication, &remote.name)?;
        }
        for (application, offer) in offers {
            let Some(app) = snapshot.applications.iter_mut().find(|a| a.name == application) else {
                self.broken.push(BrokenReference::new(
                    format!("offer {:?}", offer.offer_name),
                    "application",
                    application,
                ));
                continue;
            };
            self.resolver.register_id(RefKind::Offer, &offer.offer_uuid)?;
            app.offers.push(offer);
        }
        snapshot.remote_applications = remotes;
        snapshot.external_controllers = controllers;
        snapshot.offer_connections = connections;
        snapshot.remote_entities = entities;

        self.enter(Phase::Firewall)?;
        let (rules, networks) =
            try_join!(read_firewall_rules(&self.ctx), read_relation_networks(&self.ctx))?;
        snapshot.firewall_rules = rules;
        snapshot.relation_networks = networks;

        self.enter(Phase::Ancillary)?;
        let (actions, operations, images) = try_join!(
            read_actions(&self.ctx),
            read_operations(&self.ctx),
            read_cloud_image_metadata(&self.ctx),
        )?;
        snapshot.actions = actions;
        snapshot.operations = operations;
        snapshot.cloud_image_metadata = images;

        self.ctx.cancel.check()?;
        let omissions = self.ctx.into_omissions();
        snapshot.incomplete = !omissions.is_empty();
        snapshot.omissions = omissions;

        Ok(Assembly {
            snapshot,
            table: self.resolver.freeze(),
            broken: self.broken,
        })
    }

    /// Nest containers under their hosts. Containers whose parent is
    /// absent are dropped and recorded as broken `parent` references; their
    /// descendants are dropped too and recorded against the missing
    /// `ancestor`.
    fn build_machine_tree(&mut self, machines: Vec<ExportedMachine>) -> Result<Vec<ExportedMachine>> {
        for machine in &machines {
            let depth = container_depth(&machine.id);
            if depth > MAX_CONTAINER_DEPTH {
                return Err(Error::ContainerDepth {
                    machine: machine.id.clone(),
                    depth,
                    max: MAX_CONTAINER_DEPTH,
                });
            }
        }

        let mut arena: BTreeMap<String, ExportedMachine> =
            machines.into_iter().map(|m| (m.id.clone(), m)).collect();
        let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut roots = Vec::new();
        for id in arena.keys() {
            match parent_machine_id(id) {
                Some(parent) if arena.contains_key(parent) => {
                    children.entry(parent.to_string()).or_default().push(id.clone());
                }
                Some(parent) => {
                    self.broken.push(BrokenReference::new(
                        format!("machine {id:?}"),
                        "parent",
                        parent,
                    ));
                }
                None => roots.push(id.clone()),
            }
        }

        let tree = roots
            .iter()
            .filter_map(|id| nest(id, &children, &mut arena))
            .collect();
        // Whatever is left hangs off a dropped container.
        for orphan in arena.keys() {
            let Some(parent) = parent_machine_id(orphan) else {
                continue;
            };
            if !arena.contains_key(parent) {
                continue;
            }
            let mut missing = parent;
            while let Some(next) = parent_machine_id(missing) {
                missing = next;
                if !arena.contains_key(missing) {
                    break;
                }
            }
            debug!("Dropping machine {} with missing ancestor {}", orphan, missing);
            self.broken.push(BrokenReference::new(
                format!("machine {orphan:?}"),
                "ancestor",
                missing,
            ));
        }
        Ok(tree)
    }

    /// Attach units and leaders to their applications
    fn attach_units(
        &mut self,
        snapshot: &mut Snapshot,
        units: Vec<(String, crate::description::ExportedUnit)>,
        mut leaders: BTreeMap<String, String>,
    ) -> Result<()> {
        for (application, unit) in units {
            let Some(app) = snapshot.applications.iter_mut().find(|a| a.name == application) else {
                self.broken.push(BrokenReference::new(
                    format!("unit {:?}", unit.name),
                    "application",
                    application,
                ));
                continue;
            };
            self.resolver.register_id(RefKind::Unit, &unit.name)?;
            app.units.push(unit);
        }
        for app in &mut snapshot.applications {
            app.leader = leaders.remove(&app.name);
        }
        Ok(())
    }
}

fn nest(
    id: &str,
    children: &BTreeMap<String, Vec<String>>,
    arena: &mut BTreeMap<String, ExportedMachine>,
) -> Option<ExportedMachine> {
    let mut machine = arena.remove(id)?;
    if let Some(ids) = children.get(id) {
        machine.containers = ids
            .iter()
            .filter_map(|child| nest(child, children, arena))
            .collect();
    }
    Some(machine)
}
