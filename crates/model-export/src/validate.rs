//! Referential validation of an assembled snapshot

use crate::{
    config::{Category, ExportConfig},
    description::Snapshot,
    error::BrokenReference,
    resolver::{RefKind, ReferenceTable},
};
use model_store::models::{Address, AttachmentHost, StorageOwner};
use std::collections::BTreeSet;

struct Checker<'a> {
    table: &'a ReferenceTable,
    broken: Vec<BrokenReference>,
}

impl Checker<'_> {
    fn check(&mut self, kind: RefKind, entity: &str, field: &str, target: &str) {
        if !self.table.contains(kind, target) {
            self.broken.push(BrokenReference::new(entity, field, target));
        }
    }

    fn check_any(&mut self, kinds: &[RefKind], entity: &str, field: &str, target: &str) {
        if !kinds.iter().any(|kind| self.table.contains(*kind, target)) {
            self.broken.push(BrokenReference::new(entity, field, target));
        }
    }

    fn check_host(&mut self, entity: &str, host: &AttachmentHost) {
        match host {
            AttachmentHost::Machine(id) => self.check(RefKind::Machine, entity, "host", id),
            AttachmentHost::Unit(name) => self.check(RefKind::Unit, entity, "host", name),
        }
    }

    fn check_addresses(&mut self, entity: &str, field: &str, addresses: &[Address]) {
        for address in addresses {
            if let Some(space) = address.space_id.as_deref().filter(|s| !s.is_empty()) {
                self.check(RefKind::Space, entity, field, space);
            }
        }
    }
}

/// Every foreign-key field of `snapshot` whose target is not in `table`
pub(crate) fn validate(snapshot: &Snapshot, table: &ReferenceTable, config: &ExportConfig) -> Vec<BrokenReference> {
    let mut c = Checker {
        table,
        broken: Vec::new(),
    };

    for machine in snapshot.all_machines() {
        let entity = format!("machine {:?}", machine.id);
        c.check_addresses(&entity, "provider address space", &machine.provider_addresses);
        c.check_addresses(&entity, "machine address space", &machine.machine_addresses);
        for unit in machine.opened_ports.keys() {
            c.check(RefKind::Unit, &entity, "opened ports unit", unit);
        }
    }

    for app in snapshot.applications() {
        let entity = format!("application {:?}", app.name);
        if let Some(leader) = &app.leader {
            if !app.units.iter().any(|u| &u.name == leader) {
                c.broken.push(BrokenReference::new(&entity, "leader", leader));
            }
        }
        for space in app.endpoint_bindings.values().filter(|s| !s.is_empty()) {
            c.check(RefKind::Space, &entity, "endpoint binding", space);
        }
        for rule in app.exposed_endpoints.values() {
            for space in &rule.expose_to_space_ids {
                c.check(RefKind::Space, &entity, "expose space", space);
            }
        }
        for unit in &app.units {
            let entity = format!("unit {:?}", unit.name);
            if let Some(machine) = &unit.machine {
                c.check(RefKind::Machine, &entity, "machine", machine);
            }
            if let Some(principal) = &unit.principal {
                c.check(RefKind::Unit, &entity, "principal", principal);
            }
            for sub in &unit.subordinates {
                c.check(RefKind::Unit, &entity, "subordinate", sub);
            }
        }
    }

    for relation in snapshot.relations() {
        let entity = format!("relation {:?}", relation.key);
        for ep in &relation.endpoints {
            c.check_any(
                &[RefKind::Application, RefKind::RemoteApplication],
                &entity,
                "endpoint application",
                &ep.application_name,
            );
            // Units of the remote side are not part of this model.
            if table.contains(RefKind::RemoteApplication, &ep.application_name) {
                continue;
            }
            for unit in ep.unit_settings.keys() {
                c.check(RefKind::Unit, &entity, "unit settings", unit);
            }
        }
    }

    for subnet in snapshot.subnets() {
        c.check(RefKind::Space, &format!("subnet {:?}", subnet.cidr), "space", &subnet.space_id);
    }
    for address in snapshot.ip_addresses() {
        let entity = format!("ip address {:?}", address.value);
        c.check(RefKind::Machine, &entity, "machine", &address.machine_id);
        if !config.skips(Category::LinkLayerDevices) {
            let device = format!("{}:{}", address.machine_id, address.device_name);
            c.check(RefKind::LinkLayerDevice, &entity, "device", &device);
        }
        if address.space_id.is_empty() {
            if address.config_method != "loopback" {
                c.broken.push(BrokenReference::new(&entity, "subnet", &address.subnet_cidr));
            }
        } else {
            c.check(RefKind::Space, &entity, "space", &address.space_id);
        }
    }
    for device in snapshot.link_layer_devices() {
        let entity = format!("link-layer device {:?}", device.name);
        c.check(RefKind::Machine, &entity, "machine", &device.machine_id);
    }
    for keys in snapshot.ssh_host_keys() {
        c.check(RefKind::Machine, "ssh host keys", "machine", &keys.machine_id);
    }

    for volume in snapshot.volumes() {
        let entity = format!("volume {:?}", volume.id);
        if let Some(storage) = &volume.storage_id {
            c.check(RefKind::StorageInstance, &entity, "storage", storage);
        }
        for attachment in &volume.attachments {
            c.check_host(&entity, &attachment.host);
        }
        for plan in &volume.attachment_plans {
            c.check(RefKind::Machine, &entity, "attachment plan machine", &plan.machine);
        }
    }
    for filesystem in snapshot.filesystems() {
        let entity = format!("filesystem {:?}", filesystem.id);
        if let Some(storage) = &filesystem.storage_id {
            c.check(RefKind::StorageInstance, &entity, "storage", storage);
        }
        if let Some(volume) = &filesystem.volume_id {
            c.check(RefKind::Volume, &entity, "volume", volume);
        }
        for attachment in &filesystem.attachments {
            c.check_host(&entity, &attachment.host);
        }
    }
    for storage in snapshot.storages() {
        let entity = format!("storage {:?}", storage.id);
        match &storage.owner {
            Some(StorageOwner::Unit(unit)) => c.check(RefKind::Unit, &entity, "owner", unit),
            Some(StorageOwner::Application(app)) => {
                c.check(RefKind::Application, &entity, "owner", app)
            }
            None => {}
        }
        for unit in &storage.attachments {
            c.check(RefKind::Unit, &entity, "attachment", unit);
        }
    }

    for connection in snapshot.offer_connections() {
        let entity = format!("offer connection {:?}", connection.relation_key);
        match table.resolve(RefKind::Relation, &connection.relation_key) {
            Some(id) if id == connection.relation_id.to_string() => {}
            Some(_) => c.broken.push(BrokenReference::new(
                &entity,
                "relation id",
                connection.relation_id.to_string(),
            )),
            None => c
                .broken
                .push(BrokenReference::new(&entity, "relation", &connection.relation_key)),
        }
        if !config.skips(Category::ApplicationOffers) {
            c.check(RefKind::Offer, &entity, "offer", &connection.offer_uuid);
        }
    }
    for networks in snapshot.relation_networks() {
        c.check(RefKind::Relation, "relation networks", "relation", &networks.relation_key);
    }
    for remote in snapshot.remote_applications() {
        let spaces: BTreeSet<&str> = remote.spaces.iter().map(|s| s.name.as_str()).collect();
        for space in remote.bindings.values() {
            if !spaces.contains(space.as_str()) {
                c.broken.push(BrokenReference::new(
                    format!("remote application {:?}", remote.name),
                    "binding",
                    space,
                ));
            }
        }
    }

    c.broken
}
