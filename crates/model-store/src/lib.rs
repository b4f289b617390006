//! Backing store for a model's live state
//!
//! Documents (machines, applications, units, relations, storage,
//! networking, secrets, cross-model state and more) are stored as JSON in
//! named collections behind a pluggable [`StoreBackend`]. Two backends are
//! provided: [`MemoryBackend`] and the persistent [`SledBackend`].
//!
//! # Example
//!
//! ```no_run
//! use model_store::{Store, models::MachineDoc};
//!
//! # async fn example(model: model_store::models::ModelDoc) -> model_store::Result<()> {
//! let store = Store::in_memory();
//! store.initialize_model(model).await?;
//! store.add_machine(MachineDoc::new("0", "focal")).await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod collection;
pub mod error;
pub mod models;
pub mod secrets;
pub mod store;

pub use backend::{MemoryBackend, SledBackend, StoreBackend};
pub use collection::Collection;
pub use error::{Error, Result};
pub use secrets::{CreateSecretParams, SecretMetadata, SecretUrl, SecretsFilter, SecretsStore, UpdateSecretParams};
pub use store::Store;
