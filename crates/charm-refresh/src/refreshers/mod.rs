//! Refresher implementations, one per charm source

pub mod charm_hub;
pub mod charm_store;
pub mod local;

pub use charm_hub::{CharmHubRefresher, charm_hub_origin};
pub use charm_store::CharmStoreRefresher;
pub use local::LocalRefresher;

use crate::{
    collaborators::{CharmResolver, ResolvedCharm},
    config::{CharmId, RefresherConfig},
    error::{RefreshError, Result},
};
use async_trait::async_trait;
use model_store::models::{CharmOrigin, CharmUrl};
use tracing::debug;

/// Architecture assumed when the origin does not name one
pub const DEFAULT_ARCHITECTURE: &str = "amd64";

/// One candidate strategy in a [`RefreshChain`](crate::RefreshChain)
#[async_trait]
pub trait Refresher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this refresher applies to the request.
    ///
    /// An error here ends the whole chain.
    async fn allowed(&self, config: &RefresherConfig) -> Result<bool>;

    /// Resolve the charm to refresh to.
    ///
    /// [`RefreshError::Exhausted`] hands the request to the next refresher.
    async fn refresh(&self, config: &RefresherConfig) -> Result<CharmId>;
}

/// Resolve `config.charm_ref` with `origin` against a remote store and
/// reject results that would not change anything.
pub(crate) async fn resolve_charm(
    config: &RefresherConfig,
    resolver: &dyn CharmResolver,
    origin: CharmOrigin,
) -> Result<(CharmUrl, CharmOrigin)> {
    let reference: CharmUrl = config.charm_ref.parse()?;
    debug!("Resolving {} from {:?}", reference, origin.source);

    let ResolvedCharm {
        url,
        origin,
        supported_series,
    } = resolver
        .resolve_charm(&reference, &origin, config.switch)
        .await?;

    if let Some(series) = &config.deployed_series {
        if !config.force_series
            && !supported_series.is_empty()
            && !supported_series.contains(series)
        {
            return Err(RefreshError::SeriesMismatch {
                series: series.clone(),
                supported: supported_series,
            });
        }
    }

    let current = config
        .charm_url
        .as_ref()
        .ok_or(RefreshError::UnexpectedCharmUrl)?;
    if &url == current {
        return Err(match reference.revision {
            Some(revision) => RefreshError::AlreadySpecified {
                name: reference.name,
                revision,
            },
            None => RefreshError::AlreadyLatest {
                name: reference.name,
            },
        });
    }

    Ok((url, origin))
}
