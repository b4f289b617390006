//! Machines and their per-machine data

use super::ReadContext;
use crate::{
    config::Category,
    description::{AgentTools, CloudInstance, ExportedMachine, ExportedSshHostKeys},
    error::Result,
};
use model_store::models::{
    BlockDeviceDoc, InstanceDataDoc, MachineDoc, OpenedPortsDoc, ToolsDoc, global_key,
};

/// Every machine and container as a flat list ordered by id; nesting is
/// left to the assembler
pub(crate) async fn read_machines(ctx: &ReadContext) -> Result<Vec<ExportedMachine>> {
    let docs = ctx.all::<MachineDoc>("machines").await?;
    let mut machines = Vec::with_capacity(docs.len());
    for doc in docs {
        ctx.cancel.check()?;
        machines.push(read_machine(ctx, doc).await?);
    }
    Ok(machines)
}

async fn read_machine(ctx: &ReadContext, doc: MachineDoc) -> Result<ExportedMachine> {
    let entity = format!("machine {:?}", doc.id);
    let key = doc.global_key();

    let instance = if ctx.skips(Category::InstanceData) {
        None
    } else {
        let data = ctx.get::<InstanceDataDoc>("instance data", &doc.id).await?;
        if data.is_none() {
            ctx.incomplete(&entity, "missing instance data").await?;
        }
        data.map(cloud_instance)
    };

    let tools = if ctx.skips(Category::MachineAgentBinaries) {
        None
    } else {
        let tools = ctx.get::<ToolsDoc>("machine agent binaries", &key).await?;
        if tools.is_none() {
            ctx.incomplete(&entity, "missing agent binaries").await?;
        }
        tools.map(AgentTools::from)
    };

    let instance_key = global_key::machine_instance(&doc.id);
    let block_devices = ctx
        .all_with_prefix::<BlockDeviceDoc>("block devices", &format!("{}#", doc.id))
        .await?;
    let opened_ports = ctx
        .get::<OpenedPortsDoc>("opened ports", &doc.id)
        .await?
        .map(|ports| ports.unit_ranges)
        .unwrap_or_default();

    Ok(ExportedMachine {
        instance,
        instance_status: ctx.status(&instance_key).await?,
        instance_status_history: ctx.status_history(&instance_key).await?,
        tools,
        block_devices,
        opened_ports,
        status: ctx.status(&key).await?,
        status_history: ctx.status_history(&key).await?,
        annotations: ctx.annotations(&key).await?,
        containers: Vec::new(),
        id: doc.id,
        nonce: doc.nonce,
        series: doc.series,
        container_type: doc.container_type,
        jobs: doc.jobs,
        constraints: doc.constraints,
        provider_addresses: doc.provider_addresses,
        machine_addresses: doc.machine_addresses,
        password_hash: doc.password_hash,
        supported_containers: doc.supported_containers,
        placement: doc.placement,
    })
}

fn cloud_instance(data: InstanceDataDoc) -> CloudInstance {
    CloudInstance {
        instance_id: data.instance_id,
        arch: data.arch,
        mem: data.mem,
        root_disk: data.root_disk,
        cpu_cores: data.cpu_cores,
        cpu_power: data.cpu_power,
        tags: data.tags,
        availability_zone: data.availability_zone,
        charm_profiles: data.charm_profiles,
    }
}

pub(crate) async fn read_ssh_host_keys(ctx: &ReadContext) -> Result<Vec<ExportedSshHostKeys>> {
    if ctx.skips(Category::SshHostKeys) {
        return Ok(Vec::new());
    }
    ctx.all("ssh host keys").await
}
