//! Services the refreshers depend on

use crate::{config::CharmId, error::Result};
use async_trait::async_trait;
use model_store::models::{CharmOrigin, CharmUrl};
use thiserror::Error;

/// Outcome of asking a charm store which charm a reference resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCharm {
    /// Resolved URL, with revision
    pub url: CharmUrl,
    /// Origin as normalized by the store
    pub origin: CharmOrigin,
    /// Series the charm supports; empty when unrestricted
    pub supported_series: Vec<String>,
}

/// Resolves charm references against a remote store
#[async_trait]
pub trait CharmResolver: Send + Sync {
    /// Resolve `url` with `origin`; `switch` marks a cross-charm switch
    async fn resolve_charm(
        &self,
        url: &CharmUrl,
        origin: &CharmOrigin,
        switch: bool,
    ) -> Result<ResolvedCharm>;
}

/// Adds charms to the controller
#[async_trait]
pub trait CharmAdder: Send + Sync {
    /// Add a store charm, returning the origin the controller recorded
    async fn add_charm(&self, url: &CharmUrl, origin: &CharmOrigin, force: bool)
    -> Result<CharmOrigin>;

    /// Upload a local charm, returning the URL the controller assigned
    async fn add_local_charm(&self, url: &CharmUrl, charm: &LocalCharm, force: bool)
    -> Result<CharmUrl>;

    /// Check that the application's units can run `url`
    async fn check_charm_placement(&self, application: &str, url: &CharmUrl) -> Result<()>;
}

/// A charm read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCharm {
    /// Name from the charm metadata
    pub name: String,
    /// Series listed in the metadata
    pub series: Vec<String>,
}

/// Failures reading a charm from disk
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Nothing exists at the path
    #[error("path does not exist: {0}")]
    NotExist(String),

    /// Something exists at the path but it is not a charm
    #[error("no charm found at {0:?}")]
    NotFound(String),

    /// Any other read failure
    #[error("{0}")]
    Other(String),
}

/// Reads charms from the local filesystem
pub trait CharmRepository: Send + Sync {
    /// Read the charm at `path` for `series`, honouring `force_series`
    fn charm_at_path(
        &self,
        path: &str,
        series: Option<&str>,
        force_series: bool,
    ) -> std::result::Result<(LocalCharm, CharmUrl), RepositoryError>;
}

impl From<CharmUrl> for CharmId {
    fn from(url: CharmUrl) -> Self {
        Self { url, origin: None }
    }
}
