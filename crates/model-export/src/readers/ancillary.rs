//! Actions, operations and cloud image metadata

use super::ReadContext;
use crate::{
    config::Category,
    description::{ExportedAction, ExportedCloudImageMetadata, ExportedOperation},
    error::Result,
};

pub(crate) async fn read_actions(ctx: &ReadContext) -> Result<Vec<ExportedAction>> {
    if ctx.skips(Category::Actions) {
        return Ok(Vec::new());
    }
    ctx.all("actions").await
}

pub(crate) async fn read_operations(ctx: &ReadContext) -> Result<Vec<ExportedOperation>> {
    if ctx.skips(Category::Actions) {
        return Ok(Vec::new());
    }
    ctx.all("operations").await
}

pub(crate) async fn read_cloud_image_metadata(ctx: &ReadContext) -> Result<Vec<ExportedCloudImageMetadata>> {
    if ctx.skips(Category::CloudImageMetadata) {
        return Ok(Vec::new());
    }
    ctx.all("cloud image metadata").await
}
