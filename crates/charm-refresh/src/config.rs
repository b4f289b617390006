//! Refresh request and result types

use model_store::models::{Channel, CharmOrigin, CharmUrl, OriginSource};

/// Everything a refresher needs to know about one refresh request
#[derive(Debug, Clone, PartialEq)]
pub struct RefresherConfig {
    /// Application being refreshed
    pub application_name: String,
    /// URL of the charm the application currently runs
    pub charm_url: Option<CharmUrl>,
    /// Where the current charm came from
    pub charm_origin: CharmOrigin,
    /// Reference the user asked for (`local:meshuggah`, `./charm`, `cs:mysql-5`, ...)
    pub charm_ref: String,
    /// Requested channel (empty keeps the current one)
    pub channel: Channel,
    /// Series the application is deployed on, if known
    pub deployed_series: Option<String>,
    /// Switch to a different charm rather than a newer revision
    pub switch: bool,
    /// Add the charm even if it fails validation
    pub force: bool,
    /// Allow the charm even if it does not support the deployed series
    pub force_series: bool,
}

impl RefresherConfig {
    /// A request to refresh `application` from `charm_url` to `charm_ref`
    pub fn new(
        application: impl Into<String>,
        charm_url: Option<CharmUrl>,
        charm_ref: impl Into<String>,
    ) -> Self {
        Self {
            application_name: application.into(),
            charm_url,
            charm_origin: CharmOrigin::new(OriginSource::CharmHub),
            charm_ref: charm_ref.into(),
            channel: Channel::default(),
            deployed_series: None,
            switch: false,
            force: false,
            force_series: false,
        }
    }

    /// Set the current charm origin
    pub fn with_origin(mut self, origin: CharmOrigin) -> Self {
        self.charm_origin = origin;
        self
    }

    /// Set the deployed series
    pub fn with_deployed_series(mut self, series: impl Into<String>) -> Self {
        self.deployed_series = Some(series.into());
        self
    }
}

/// The charm an application will be refreshed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharmId {
    /// Resolved charm URL
    pub url: CharmUrl,
    /// Origin of the resolved charm; local charms have none
    pub origin: Option<CharmOrigin>,
}
