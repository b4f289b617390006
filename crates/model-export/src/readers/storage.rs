//! Storage instances, pools, volumes and filesystems

use super::ReadContext;
use crate::{
    description::{
        ExportedAttachmentPlan, ExportedFilesystem, ExportedFilesystemAttachment, ExportedStorage,
        ExportedStoragePool, ExportedVolume, ExportedVolumeAttachment,
    },
    error::Result,
};
use model_store::models::{
    FilesystemAttachmentDoc, FilesystemDoc, VolumeAttachmentDoc, VolumeAttachmentPlanDoc,
    VolumeDoc,
};

pub(crate) async fn read_storages(ctx: &ReadContext) -> Result<Vec<ExportedStorage>> {
    ctx.all("storage instances").await
}

pub(crate) async fn read_storage_pools(ctx: &ReadContext) -> Result<Vec<ExportedStoragePool>> {
    ctx.all("storage pools").await
}

pub(crate) async fn read_volumes(ctx: &ReadContext) -> Result<Vec<ExportedVolume>> {
    let docs = ctx.all::<VolumeDoc>("volumes").await?;
    let mut volumes = Vec::with_capacity(docs.len());
    for doc in docs {
        ctx.cancel.check()?;
        let prefix = format!("{}#", doc.id);
        let attachments = ctx
            .all_with_prefix::<VolumeAttachmentDoc>("volume attachments", &prefix)
            .await?
            .into_iter()
            .map(|a| ExportedVolumeAttachment {
                host: a.host,
                read_only: a.read_only,
                provisioned: a.info,
            })
            .collect();
        // The block device stays absent until the host agent reports it.
        let attachment_plans = ctx
            .all_with_prefix::<VolumeAttachmentPlanDoc>("volume attachment plans", &prefix)
            .await?
            .into_iter()
            .map(|p| ExportedAttachmentPlan {
                machine: p.machine_id,
                device_type: p.device_type,
                device_attributes: p.device_attributes,
                block_device: p.block_device,
            })
            .collect();
        let key = doc.global_key();
        volumes.push(ExportedVolume {
            status: ctx.status(&key).await?,
            status_history: ctx.status_history(&key).await?,
            id: doc.id,
            storage_id: doc.storage_id,
            pool: doc.pool,
            size: doc.size,
            provisioned: doc.info,
            attachments,
            attachment_plans,
        });
    }
    Ok(volumes)
}

pub(crate) async fn read_filesystems(ctx: &ReadContext) -> Result<Vec<ExportedFilesystem>> {
    let docs = ctx.all::<FilesystemDoc>("filesystems").await?;
    let mut filesystems = Vec::with_capacity(docs.len());
    for doc in docs {
        ctx.cancel.check()?;
        let attachments = ctx
            .all_with_prefix::<FilesystemAttachmentDoc>("filesystem attachments", &format!("{}#", doc.id))
            .await?
            .into_iter()
            .map(|a| ExportedFilesystemAttachment {
                host: a.host,
                location: a.location,
                provisioned: a.info,
            })
            .collect();
        let key = doc.global_key();
        filesystems.push(ExportedFilesystem {
            status: ctx.status(&key).await?,
            status_history: ctx.status_history(&key).await?,
            id: doc.id,
            storage_id: doc.storage_id,
            volume_id: doc.volume_id,
            pool: doc.pool,
            size: doc.size,
            provisioned: doc.info,
            attachments,
        });
    }
    Ok(filesystems)
}
