//! Model, users, sequences and blocks

use super::ReadContext;
use crate::{
    config::Category,
    description::{ExportedBlock, ExportedCloudCredential, ExportedModel, ExportedUser},
    error::{Error, Result},
};
use model_store::models::{CloudCredentialDoc, SequenceDoc, global_key};
use std::collections::BTreeMap;

/// The model root. Without it there is nothing to export, so a missing
/// model is fatal even in tolerant mode.
pub(crate) async fn read_model(ctx: &ReadContext) -> Result<ExportedModel> {
    let doc = ctx.store.model().await.map_err(|err| match err {
        model_store::Error::MissingCollection(collection) => Error::MissingCollection {
            category: "model",
            collection,
        },
        other => other.into(),
    })?;

    let cloud_credential = match &doc.cloud_credential {
        Some(id) if !ctx.skips(Category::Credentials) => {
            let credential = ctx.get::<CloudCredentialDoc>("credentials", id).await?;
            if credential.is_none() {
                ctx.incomplete(format!("model {:?}", doc.name), format!("cloud credential {id:?} not found"))
                    .await?;
            }
            credential.map(|c| ExportedCloudCredential {
                cloud: c.cloud,
                owner: c.owner,
                name: c.name,
                auth_type: c.auth_type,
                attributes: c.attributes,
            })
        }
        _ => None,
    };

    Ok(ExportedModel {
        uuid: doc.uuid.to_string(),
        status: ctx.status(global_key::MODEL).await?,
        status_history: ctx.status_history(global_key::MODEL).await?,
        annotations: ctx.annotations(global_key::MODEL).await?,
        name: doc.name,
        model_type: doc.model_type,
        owner: doc.owner,
        config: doc.config,
        constraints: doc.constraints,
        password_hash: doc.password_hash,
        latest_tools_version: doc.latest_tools_version,
        environ_version: doc.environ_version,
        cloud: doc.cloud,
        cloud_region: doc.cloud_region,
        cloud_credential,
        sla: doc.sla,
        meter_status: doc.meter_status,
    })
}

pub(crate) async fn read_users(ctx: &ReadContext) -> Result<Vec<ExportedUser>> {
    ctx.all("users").await
}

/// Sequence name → next value to hand out
pub(crate) async fn read_sequences(ctx: &ReadContext) -> Result<BTreeMap<String, u64>> {
    Ok(ctx
        .all::<SequenceDoc>("sequences")
        .await?
        .into_iter()
        .map(|seq| (seq.name, seq.counter))
        .collect())
}

pub(crate) async fn read_blocks(ctx: &ReadContext) -> Result<Vec<ExportedBlock>> {
    ctx.all("blocks").await
}
