//! Refresh from the legacy charm store

use super::{DEFAULT_ARCHITECTURE, Refresher, resolve_charm};
use crate::{
    collaborators::{CharmAdder, CharmResolver},
    config::{CharmId, RefresherConfig},
    error::Result,
};
use async_trait::async_trait;
use model_store::models::{CharmOrigin, CharmUrl, OriginSource, Schema};
use std::sync::Arc;
use tracing::info;

/// Resolves and adds `cs:` charms
pub struct CharmStoreRefresher {
    adder: Arc<dyn CharmAdder>,
    resolver: Arc<dyn CharmResolver>,
}

impl CharmStoreRefresher {
    /// Create a charm store refresher
    pub fn new(adder: Arc<dyn CharmAdder>, resolver: Arc<dyn CharmResolver>) -> Self {
        Self { adder, resolver }
    }
}

fn charm_store_origin(config: &RefresherConfig) -> CharmOrigin {
    let mut origin = CharmOrigin::new(OriginSource::CharmStore);
    origin.platform.architecture = DEFAULT_ARCHITECTURE.to_string();
    if !config.channel.is_empty() {
        origin.channel = Some(config.channel.clone());
    }
    origin
}

#[async_trait]
impl Refresher for CharmStoreRefresher {
    fn name(&self) -> &'static str {
        "charm-store"
    }

    async fn allowed(&self, config: &RefresherConfig) -> Result<bool> {
        Ok(config
            .charm_ref
            .parse::<CharmUrl>()
            .is_ok_and(|url| url.schema == Schema::CharmStore))
    }

    async fn refresh(&self, config: &RefresherConfig) -> Result<CharmId> {
        let (url, origin) =
            resolve_charm(config, self.resolver.as_ref(), charm_store_origin(config)).await?;
        let origin = self.adder.add_charm(&url, &origin, config.force).await?;
        info!("Added charm {:?} to the model", url.to_string());
        Ok(CharmId {
            url,
            origin: Some(origin),
        })
    }
}
