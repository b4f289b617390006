//! Spaces, subnets, link-layer devices and IP addresses

use super::ReadContext;
use crate::{
    config::Category,
    description::{ExportedLinkLayerDevice, ExportedSpace, ExportedSubnet},
    error::Result,
};
use model_store::models::IpAddressDoc;

pub(crate) async fn read_spaces(ctx: &ReadContext) -> Result<Vec<ExportedSpace>> {
    ctx.all("spaces").await
}

pub(crate) async fn read_subnets(ctx: &ReadContext) -> Result<Vec<ExportedSubnet>> {
    ctx.all("subnets").await
}

pub(crate) async fn read_link_layer_devices(ctx: &ReadContext) -> Result<Vec<ExportedLinkLayerDevice>> {
    if ctx.skips(Category::LinkLayerDevices) {
        return Ok(Vec::new());
    }
    ctx.all("link-layer devices").await
}

/// Raw addresses; their space is derived from the subnet once subnets
/// are registered
pub(crate) async fn read_ip_addresses(ctx: &ReadContext) -> Result<Vec<IpAddressDoc>> {
    if ctx.skips(Category::IpAddresses) {
        return Ok(Vec::new());
    }
    ctx.all("ip addresses").await
}
