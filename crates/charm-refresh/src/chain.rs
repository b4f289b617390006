//! Ordered refresher chain
//!
//! Refreshers are consulted strictly in registration order.

use crate::{
    collaborators::{CharmAdder, CharmRepository, CharmResolver},
    config::{CharmId, RefresherConfig},
    error::{RefreshError, Result},
    refreshers::{CharmHubRefresher, CharmStoreRefresher, LocalRefresher, Refresher},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Chain of refreshers tried in order until one resolves a charm
#[derive(Default)]
pub struct RefreshChain {
    refreshers: Vec<Box<dyn Refresher>>,
}

impl RefreshChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain with the built-in refreshers: local, charm store, charm hub
    pub fn with_defaults(
        adder: Arc<dyn CharmAdder>,
        resolver: Arc<dyn CharmResolver>,
        repository: Arc<dyn CharmRepository>,
    ) -> Self {
        let mut chain = Self::new();
        chain.register(Box::new(LocalRefresher::new(adder.clone(), repository)));
        chain.register(Box::new(CharmStoreRefresher::new(
            adder.clone(),
            resolver.clone(),
        )));
        chain.register(Box::new(CharmHubRefresher::new(adder, resolver)));
        chain
    }

    /// Append a refresher to the end of the chain
    pub fn register(&mut self, refresher: Box<dyn Refresher>) {
        self.refreshers.push(refresher);
    }

    /// Names of the registered refreshers, in order
    pub fn list_refreshers(&self) -> Vec<&'static str> {
        self.refreshers.iter().map(|r| r.name()).collect()
    }

    /// Run the chain for one request
    pub async fn run(&self, config: &RefresherConfig) -> Result<CharmId> {
        for refresher in &self.refreshers {
            if !refresher.allowed(config).await? {
                debug!("Refresher {} does not apply to {:?}", refresher.name(), config.charm_ref);
                continue;
            }

            match refresher.refresh(config).await {
                Ok(charm) => {
                    info!(
                        "Refreshing {} to {} via {}",
                        config.application_name,
                        charm.url,
                        refresher.name()
                    );
                    return Ok(charm);
                }
                Err(RefreshError::Exhausted) => {
                    debug!("Refresher {} exhausted for {:?}", refresher.name(), config.charm_ref);
                }
                Err(e) => return Err(e),
            }
        }

        Err(RefreshError::Unable(config.charm_ref.clone()))
    }
}
