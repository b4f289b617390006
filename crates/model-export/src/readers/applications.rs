//! Applications, units, leadership and offers

use super::ReadContext;
use crate::{
    config::Category,
    description::{AgentTools, ExportedApplication, ExportedOffer, ExportedResource, ExportedUnit},
    error::Result,
};
use model_store::models::{
    APPLICATION_LEADERSHIP, ApplicationDoc, ApplicationOfferDoc, Channel, CharmOrigin, LeaseDoc,
    ResourceDoc, Settings, ToolsDoc, UnitDoc, global_key,
};
use std::collections::BTreeMap;

/// Applications without units, offers or leader; those are attached by
/// later phases
pub(crate) async fn read_applications(ctx: &ReadContext) -> Result<Vec<ExportedApplication>> {
    let docs = ctx.all::<ApplicationDoc>("applications").await?;
    let mut applications = Vec::with_capacity(docs.len());
    for doc in docs {
        ctx.cancel.check()?;
        applications.push(read_application(ctx, doc).await?);
    }
    Ok(applications)
}

async fn read_application(ctx: &ReadContext, doc: ApplicationDoc) -> Result<ExportedApplication> {
    let key = doc.global_key();
    let resources = read_resources(ctx, &doc.name).await?;
    let (charm_config, application_config, leadership_settings) = if ctx.skips(Category::Settings) {
        (Settings::new(), Settings::new(), BTreeMap::new())
    } else {
        (doc.charm_config, doc.application_config, doc.leadership_settings)
    };

    Ok(ExportedApplication {
        status: ctx.status(&key).await?,
        status_history: ctx.status_history(&key).await?,
        annotations: ctx.annotations(&key).await?,
        name: doc.name,
        series: doc.series,
        subordinate: doc.subordinate,
        charm_url: doc.charm_url,
        charm_origin: normalize_origin(doc.charm_origin),
        charm_modified_version: doc.charm_modified_version,
        force_charm: doc.force_charm,
        exposed: doc.exposed,
        exposed_endpoints: doc.exposed_endpoints,
        min_units: doc.min_units,
        desired_scale: doc.desired_scale,
        cloud_service: doc.cloud_service,
        pod_spec: doc.pod_spec,
        password_hash: doc.password_hash,
        constraints: doc.constraints,
        endpoint_bindings: doc.endpoint_bindings,
        storage_constraints: doc.storage_constraints,
        metric_credentials: doc.metric_credentials,
        charm_config,
        application_config,
        leadership_settings,
        leader: None,
        resources,
        units: Vec::new(),
        offers: Vec::new(),
    })
}

/// A channel recorded without a risk tracks stable
fn normalize_origin(mut origin: CharmOrigin) -> CharmOrigin {
    if let Some(channel) = origin.channel.as_mut()
        && channel.risk.is_empty()
    {
        channel.risk = Channel::STABLE.to_string();
    }
    origin
}

/// Application resources with the revisions their units use. Unit records
/// for a resource the application no longer has are dropped.
async fn read_resources(ctx: &ReadContext, application: &str) -> Result<Vec<ExportedResource>> {
    let docs = ctx
        .all_with_prefix::<ResourceDoc>("resources", &format!("{application}/"))
        .await?;
    let mut resources: BTreeMap<String, ExportedResource> = BTreeMap::new();
    let mut unit_records = Vec::new();
    for doc in docs {
        match doc.unit {
            Some(unit) => unit_records.push((doc.name, unit, doc.revision)),
            None => {
                resources.insert(
                    doc.name.clone(),
                    ExportedResource {
                        name: doc.name,
                        revision: doc.revision,
                        origin: doc.origin,
                        fingerprint: doc.fingerprint,
                        size: doc.size,
                        unit_revisions: BTreeMap::new(),
                    },
                );
            }
        }
    }
    for (name, unit, revision) in unit_records {
        if let Some(resource) = resources.get_mut(&name) {
            resource.unit_revisions.insert(unit, revision);
        }
    }
    Ok(resources.into_values().collect())
}

/// Units paired with the name of their application
pub(crate) async fn read_units(ctx: &ReadContext) -> Result<Vec<(String, ExportedUnit)>> {
    let docs = ctx.all::<UnitDoc>("units").await?;
    let mut units = Vec::with_capacity(docs.len());
    for doc in docs {
        ctx.cancel.check()?;
        let application = doc.application.clone();
        units.push((application, read_unit(ctx, doc).await?));
    }
    Ok(units)
}

async fn read_unit(ctx: &ReadContext, doc: UnitDoc) -> Result<ExportedUnit> {
    let agent_key = doc.global_key();
    let workload_key = global_key::unit_workload(&doc.name);
    let version_key = global_key::unit_workload_version(&doc.name);

    let tools = if ctx.skips(Category::UnitAgentBinaries) {
        None
    } else {
        let tools = ctx.get::<ToolsDoc>("unit agent binaries", &agent_key).await?;
        if tools.is_none() {
            ctx.incomplete(format!("unit {:?}", doc.name), "missing agent binaries")
                .await?;
        }
        tools.map(AgentTools::from)
    };

    let workload_version = ctx
        .status(&version_key)
        .await?
        .map(|status| status.message)
        .unwrap_or_default();

    Ok(ExportedUnit {
        tools,
        workload_version,
        workload_version_history: ctx.status_history(&version_key).await?,
        agent_status: ctx.status(&agent_key).await?,
        agent_status_history: ctx.status_history(&agent_key).await?,
        workload_status: ctx.status(&workload_key).await?,
        workload_status_history: ctx.status_history(&workload_key).await?,
        annotations: ctx.annotations(&agent_key).await?,
        name: doc.name,
        series: doc.series,
        principal: doc.principal,
        subordinates: doc.subordinates,
        machine: doc.machine_id,
        password_hash: doc.password_hash,
        meter_status: doc.meter_status,
        state: doc.state,
        cloud_container: doc.cloud_container,
        payloads: doc.payloads,
    })
}

/// Application name → leader unit
pub(crate) async fn read_leaders(ctx: &ReadContext) -> Result<BTreeMap<String, String>> {
    Ok(ctx
        .all::<LeaseDoc>("leases")
        .await?
        .into_iter()
        .filter(|lease| lease.namespace == APPLICATION_LEADERSHIP)
        .map(|lease| (lease.name, lease.holder))
        .collect())
}

/// Offers paired with the name of the offered application
pub(crate) async fn read_offers(ctx: &ReadContext) -> Result<Vec<(String, ExportedOffer)>> {
    if ctx.skips(Category::ApplicationOffers) {
        return Ok(Vec::new());
    }
    Ok(ctx
        .all::<ApplicationOfferDoc>("application offers")
        .await?
        .into_iter()
        .map(|doc| {
            let offer = ExportedOffer {
                offer_uuid: doc.offer_uuid,
                offer_name: doc.offer_name,
                description: doc.description,
                endpoints: doc.endpoints,
                acl: doc.acl,
            };
            (doc.application_name, offer)
        })
        .collect())
}
