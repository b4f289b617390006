//! Charm refresh resolution
//!
//! Decides which charm an application is refreshed to. A [`RefreshChain`]
//! consults an ordered list of [`Refresher`]s, one per charm source:
//!
//! - [`LocalRefresher`] for `local:` references and filesystem paths
//! - [`CharmStoreRefresher`] for legacy `cs:` URLs
//! - [`CharmHubRefresher`] for charm hub origins
//!
//! A refresher that declines, or that reports [`RefreshError::Exhausted`],
//! hands over to the next one. Any other error ends the run.
//!
//! The refreshers talk to the controller and the filesystem only through
//! the [`CharmAdder`], [`CharmResolver`] and [`CharmRepository`] traits.
//!
//! # Example
//!
//! ```no_run
//! use charm_refresh::{RefreshChain, RefresherConfig};
//! # use std::sync::Arc;
//! # async fn example(
//! #     adder: Arc<dyn charm_refresh::CharmAdder>,
//! #     resolver: Arc<dyn charm_refresh::CharmResolver>,
//! #     repository: Arc<dyn charm_refresh::CharmRepository>,
//! #     config: RefresherConfig,
//! # ) -> charm_refresh::Result<()> {
//! let chain = RefreshChain::with_defaults(adder, resolver, repository);
//! let charm = chain.run(&config).await?;
//! println!("refreshing to {}", charm.url);
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod refreshers;

pub use chain::RefreshChain;
pub use collaborators::{
    CharmAdder, CharmRepository, CharmResolver, LocalCharm, RepositoryError, ResolvedCharm,
};
pub use config::{CharmId, RefresherConfig};
pub use error::{RefreshError, Result};
pub use refreshers::{
    CharmHubRefresher, CharmStoreRefresher, LocalRefresher, Refresher, charm_hub_origin,
};
