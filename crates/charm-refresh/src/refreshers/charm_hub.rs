//! Refresh from charm hub

use super::{DEFAULT_ARCHITECTURE, Refresher, resolve_charm};
use crate::{
    collaborators::{CharmAdder, CharmResolver},
    config::{CharmId, RefresherConfig},
    error::Result,
};
use async_trait::async_trait;
use model_store::models::{Channel, CharmOrigin, CharmUrl, OriginSource, Schema};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves and adds charm hub charms
pub struct CharmHubRefresher {
    adder: Arc<dyn CharmAdder>,
    resolver: Arc<dyn CharmResolver>,
}

impl CharmHubRefresher {
    /// Create a charm hub refresher
    pub fn new(adder: Arc<dyn CharmAdder>, resolver: Arc<dyn CharmResolver>) -> Self {
        Self { adder, resolver }
    }
}

/// Apply a requested channel to the application's current origin.
///
/// An empty request keeps the origin as is. Otherwise the requested track,
/// risk and branch replace the current channel, with the risk defaulting
/// to `stable`. An origin without a channel only takes the request when it
/// names a track; a bare risk leaves it with an empty channel.
pub fn charm_hub_origin(origin: &CharmOrigin, channel: &Channel) -> CharmOrigin {
    let mut origin = origin.clone();
    if channel.is_empty() {
        return origin;
    }

    if origin.channel.is_none() && channel.track.is_none() {
        origin.channel = Some(Channel::default());
        return origin;
    }

    let risk = if channel.risk.is_empty() {
        Channel::STABLE.to_string()
    } else {
        channel.risk.clone()
    };
    origin.channel = Some(Channel {
        track: channel.track.clone(),
        risk,
        branch: channel.branch.clone(),
    });
    origin
}

#[async_trait]
impl Refresher for CharmHubRefresher {
    fn name(&self) -> &'static str {
        "charm-hub"
    }

    async fn allowed(&self, config: &RefresherConfig) -> Result<bool> {
        if config.charm_origin.source != OriginSource::CharmHub {
            return Ok(false);
        }
        let Ok(url) = config.charm_ref.parse::<CharmUrl>() else {
            return Ok(false);
        };
        if url.schema != Schema::CharmHub {
            return Ok(false);
        }

        if config.switch {
            self.adder
                .check_charm_placement(&config.application_name, &url)
                .await?;
        }
        Ok(true)
    }

    async fn refresh(&self, config: &RefresherConfig) -> Result<CharmId> {
        let mut origin = charm_hub_origin(&config.charm_origin, &config.channel);
        if config.switch {
            let reference: CharmUrl = config.charm_ref.parse()?;
            origin.platform.architecture = DEFAULT_ARCHITECTURE.to_string();
            origin.revision = reference.revision;
        }
        debug!("Charm hub origin for {}: {:?}", config.application_name, origin.channel);

        let (url, origin) = resolve_charm(config, self.resolver.as_ref(), origin).await?;
        let origin = self.adder.add_charm(&url, &origin, config.force).await?;
        info!("Added charm {:?} to the model", url.to_string());
        Ok(CharmId {
            url,
            origin: Some(origin),
        })
    }
}
