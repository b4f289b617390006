//! Secrets and their revisions

use super::ReadContext;
use crate::{
    description::{ExportedSecret, ExportedSecretRevision},
    error::Result,
};
use model_store::{
    SecretMetadata,
    secrets::{SecretDoc, SecretRevisionDoc},
};

pub(crate) async fn read_secrets(ctx: &ReadContext) -> Result<Vec<ExportedSecret>> {
    let docs = ctx.all::<SecretDoc>("secrets").await?;
    let mut secrets = Vec::with_capacity(docs.len());
    for doc in docs {
        ctx.cancel.check()?;
        let revisions = ctx
            .all_with_prefix::<SecretRevisionDoc>("secret revisions", &SecretRevisionDoc::prefix(&doc.path))
            .await?
            .into_iter()
            .filter(|rev| rev.path == doc.path)
            .map(|rev| ExportedSecretRevision {
                revision: rev.revision,
                create_time: rev.create_time,
                data: rev.data,
            })
            .collect();
        let url = SecretMetadata::from(&doc).url.to_string();
        secrets.push(ExportedSecret {
            id: doc.id,
            url,
            path: doc.path,
            version: doc.version,
            secret_type: doc.secret_type,
            provider: doc.provider,
            provider_id: doc.provider_id,
            rotate_interval: doc.rotate_interval,
            description: doc.description,
            tags: doc.tags,
            params: doc.params,
            revision: doc.revision,
            create_time: doc.create_time,
            update_time: doc.update_time,
            revisions,
        });
    }
    Ok(secrets)
}
