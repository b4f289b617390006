//! Model export
//!
//! Reads every live entity of a model from a [`Store`] and assembles a
//! single [`Snapshot`] that another controller can import. The export is
//! read-only, deterministic and referentially checked: every cross
//! reference in the snapshot points at an entity that is also in it.
//!
//! Optional categories of data can be left out through [`ExportConfig`].
//! With `ignore_incomplete_model` set, missing data and broken references
//! are recorded on the snapshot instead of failing the export.
//!
//! # Example
//!
//! ```no_run
//! use model_export::{Category, ExportConfig, export};
//! use model_store::Store;
//!
//! # async fn example(store: Store) -> model_export::Result<()> {
//! let config = ExportConfig::skipping([Category::StatusHistory, Category::Actions]);
//! let snapshot = export(&store, &config).await?;
//! println!("{} machines", snapshot.all_machines().len());
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod cancel;
pub mod config;
pub mod description;
pub mod error;
pub mod history;
mod readers;
pub mod resolver;
mod validate;

pub use assembler::{MAX_CONTAINER_DEPTH, Phase};
pub use cancel::CancelToken;
pub use config::{Category, ExportConfig};
pub use description::{FORMAT_VERSION, Omission, Snapshot};
pub use error::{BrokenReference, Error, Result};
pub use history::{STATUS_HISTORY_CAP, StatusEntry, trim_status_history};
pub use resolver::{RefKind, ReferenceResolver, ReferenceTable};

use assembler::Assembler;
use model_store::Store;
use readers::ReadContext;
use tracing::{info, warn};

/// Export the model held in `store`
pub async fn export(store: &Store, config: &ExportConfig) -> Result<Snapshot> {
    export_with_cancel(store, config, &CancelToken::new()).await
}

/// Export the model held in `store`, stopping early once `cancel` fires.
///
/// A cancelled export returns [`Error::Cancelled`], never a partial
/// snapshot.
pub async fn export_with_cancel(store: &Store, config: &ExportConfig, cancel: &CancelToken) -> Result<Snapshot> {
    info!("Exporting model (skipping {:?})", config.skipped());
    let ctx = ReadContext::new(store.clone(), config.clone(), cancel.clone());
    let assembly = Assembler::new(ctx).run().await?;

    let mut snapshot = assembly.snapshot;
    let mut broken = assembly.broken;
    broken.extend(validate::validate(&snapshot, &assembly.table, config));

    if !broken.is_empty() {
        if !config.ignore_incomplete_model {
            return Err(Error::BrokenReferences(broken));
        }
        for reference in &broken {
            warn!("Broken reference kept in export: {}", reference);
        }
        snapshot.partial = true;
        snapshot.broken_references = broken;
    }

    info!(
        "Exported model {} ({} machines, {} applications, {} relations)",
        snapshot.model().name,
        snapshot.all_machines().len(),
        snapshot.applications().len(),
        snapshot.relations().len()
    );
    Ok(snapshot)
}
