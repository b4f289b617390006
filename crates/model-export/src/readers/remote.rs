//! Cross-model state, firewall rules and relation networks

use super::ReadContext;
use crate::{
    config::Category,
    description::{
        ExportedExternalController, ExportedFirewallRule, ExportedOfferConnection,
        ExportedRelationNetworks, ExportedRemoteApplication, ExportedRemoteEntity,
    },
    error::Result,
};
use model_store::models::RemoteApplicationDoc;

pub(crate) async fn read_remote_applications(ctx: &ReadContext) -> Result<Vec<ExportedRemoteApplication>> {
    let docs = ctx.all::<RemoteApplicationDoc>("remote applications").await?;
    let mut remotes = Vec::with_capacity(docs.len());
    for doc in docs {
        ctx.cancel.check()?;
        remotes.push(ExportedRemoteApplication {
            status: ctx.status(&doc.global_key()).await?,
            name: doc.name,
            offer_uuid: doc.offer_uuid,
            url: doc.url,
            source_model_uuid: doc.source_model_uuid,
            external_controller_uuid: doc.external_controller_uuid,
            endpoints: doc.endpoints,
            spaces: doc.spaces,
            bindings: doc.bindings,
            is_consumer_proxy: doc.is_consumer_proxy,
        });
    }
    Ok(remotes)
}

pub(crate) async fn read_external_controllers(ctx: &ReadContext) -> Result<Vec<ExportedExternalController>> {
    ctx.all("external controllers").await
}

pub(crate) async fn read_offer_connections(ctx: &ReadContext) -> Result<Vec<ExportedOfferConnection>> {
    if ctx.skips(Category::OfferConnections) {
        return Ok(Vec::new());
    }
    ctx.all("offer connections").await
}

pub(crate) async fn read_remote_entities(ctx: &ReadContext) -> Result<Vec<ExportedRemoteEntity>> {
    ctx.all("remote entities").await
}

pub(crate) async fn read_firewall_rules(ctx: &ReadContext) -> Result<Vec<ExportedFirewallRule>> {
    ctx.all("firewall rules").await
}

pub(crate) async fn read_relation_networks(ctx: &ReadContext) -> Result<Vec<ExportedRelationNetworks>> {
    ctx.all("relation networks").await
}
