//! Relations with their endpoint settings

use super::ReadContext;
use crate::{
    config::Category,
    description::{ExportedEndpoint, ExportedRelation},
    error::Result,
};
use model_store::models::{RelationAppSettingsDoc, RelationDoc, RelationScopeDoc, Settings};
use std::collections::BTreeMap;

pub(crate) async fn read_relations(ctx: &ReadContext) -> Result<Vec<ExportedRelation>> {
    let docs = ctx.all::<RelationDoc>("relations").await?;
    let mut relations = Vec::with_capacity(docs.len());
    for doc in docs {
        ctx.cancel.check()?;
        relations.push(read_relation(ctx, doc).await?);
    }
    Ok(relations)
}

async fn read_relation(ctx: &ReadContext, doc: RelationDoc) -> Result<ExportedRelation> {
    let scopes = if ctx.skips(Category::RelationData) {
        Vec::new()
    } else {
        let scopes = ctx
            .all_with_prefix::<RelationScopeDoc>("relation data", &RelationScopeDoc::prefix(doc.id))
            .await?;
        if scopes.len() != doc.unit_count as usize {
            ctx.incomplete(
                format!("relation {:?}", doc.key),
                format!(
                    "{} unit(s) recorded in scope but {} scope entries found",
                    doc.unit_count,
                    scopes.len()
                ),
            )
            .await?;
        }
        scopes
    };

    let mut endpoints = Vec::with_capacity(doc.endpoints.len());
    for ep in &doc.endpoints {
        let application_settings = if ctx.skips(Category::Settings) {
            Settings::new()
        } else {
            let key = format!("r#{}#{}", doc.id, ep.application_name);
            ctx.get::<RelationAppSettingsDoc>("settings", &key)
                .await?
                .map(|s| s.settings)
                .unwrap_or_default()
        };
        let unit_settings: BTreeMap<String, Settings> = scopes
            .iter()
            .filter(|scope| scope.application == ep.application_name)
            .map(|scope| (scope.unit.clone(), scope.settings.clone()))
            .collect();
        endpoints.push(ExportedEndpoint {
            application_name: ep.application_name.clone(),
            name: ep.name.clone(),
            role: ep.role,
            interface: ep.interface.clone(),
            optional: ep.optional,
            limit: ep.limit,
            scope: ep.scope,
            application_settings,
            unit_settings,
        });
    }

    Ok(ExportedRelation {
        status: ctx.status(&doc.global_key()).await?,
        id: doc.id,
        key: doc.key,
        suspended: doc.suspended,
        suspended_reason: doc.suspended_reason,
        endpoints,
    })
}
