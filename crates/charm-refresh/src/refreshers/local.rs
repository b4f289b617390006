//! Refresh from a charm on the local filesystem

use super::Refresher;
use crate::{
    collaborators::{CharmAdder, CharmRepository, RepositoryError},
    config::{CharmId, RefresherConfig},
    error::{RefreshError, Result},
};
use async_trait::async_trait;
use std::{path::Path, sync::Arc};
use tracing::{debug, info};

/// Uploads a charm read from a `local:` reference or a filesystem path
pub struct LocalRefresher {
    adder: Arc<dyn CharmAdder>,
    repository: Arc<dyn CharmRepository>,
}

impl LocalRefresher {
    /// Create a local refresher
    pub fn new(adder: Arc<dyn CharmAdder>, repository: Arc<dyn CharmRepository>) -> Self {
        Self { adder, repository }
    }
}

fn is_local_reference(reference: &str) -> bool {
    reference.starts_with("local:") || reference.starts_with('.') || Path::new(reference).is_absolute()
}

#[async_trait]
impl Refresher for LocalRefresher {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn allowed(&self, config: &RefresherConfig) -> Result<bool> {
        Ok(is_local_reference(&config.charm_ref))
    }

    async fn refresh(&self, config: &RefresherConfig) -> Result<CharmId> {
        let (charm, url) = match self.repository.charm_at_path(
            &config.charm_ref,
            config.deployed_series.as_deref(),
            config.force_series,
        ) {
            Ok(found) => found,
            Err(RepositoryError::NotExist(path)) => {
                debug!("Nothing at {}, trying other sources", path);
                return Err(RefreshError::Exhausted);
            }
            Err(RepositoryError::NotFound(_)) => {
                return Err(RefreshError::NoCharmFound(config.charm_ref.clone()));
            }
            Err(e @ RepositoryError::Other(_)) => return Err(RefreshError::collaborator(e.to_string())),
        };

        if let Some(current) = &config.charm_url {
            if current.name != charm.name {
                return Err(RefreshError::collaborator(format!(
                    "cannot refresh {:?} to {:?}",
                    current.name, charm.name
                )));
            }
        }

        let added = self.adder.add_local_charm(&url, &charm, config.force).await?;
        info!("Added charm {:?} to the model", added.to_string());
        Ok(CharmId::from(added))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_references() {
        assert!(is_local_reference("local:meshuggah"));
        assert!(is_local_reference("./meshuggah"));
        assert!(is_local_reference("/srv/charms/meshuggah"));
        assert!(!is_local_reference("cs:meshuggah"));
        assert!(!is_local_reference("meshuggah"));
    }
}
