//! Entity readers
//!
//! One reader per entity kind turns live store documents into their
//! exported shape. Readers never write to the store. A reader whose
//! category is skipped returns nothing without touching the store.

mod ancillary;
mod applications;
mod machines;
mod model;
mod networking;
mod relations;
mod remote;
mod secrets;
mod storage;

pub(crate) use ancillary::*;
pub(crate) use applications::*;
pub(crate) use machines::*;
pub(crate) use model::*;
pub(crate) use networking::*;
pub(crate) use relations::*;
pub(crate) use remote::*;
pub(crate) use secrets::*;
pub(crate) use storage::*;

use crate::{
    cancel::CancelToken,
    config::{Category, ExportConfig},
    description::Omission,
    error::{Error, Result},
    history::{STATUS_HISTORY_CAP, StatusEntry, trim_status_history},
};
use futures::lock::Mutex;
use model_store::{
    Store,
    models::{AnnotationsDoc, Document},
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Everything a reader needs: the store, the configuration and a place to
/// record what tolerant mode left out
pub(crate) struct ReadContext {
    pub(crate) store: Store,
    pub(crate) config: ExportConfig,
    pub(crate) cancel: CancelToken,
    omissions: Mutex<Vec<Omission>>,
}

impl ReadContext {
    pub(crate) fn new(store: Store, config: ExportConfig, cancel: CancelToken) -> Self {
        Self {
            store,
            config,
            cancel,
            omissions: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn skips(&self, category: Category) -> bool {
        self.config.skips(category)
    }

    pub(crate) fn tolerant(&self) -> bool {
        self.config.ignore_incomplete_model
    }

    /// Every document of a kind
    pub(crate) async fn all<D: Document>(&self, category: &'static str) -> Result<Vec<D>> {
        debug!("Reading {}", category);
        match self.store.all::<D>().await {
            Ok(docs) => Ok(docs),
            Err(err) => self.recover(category, err, Vec::new()).await,
        }
    }

    /// Documents of a kind under a key prefix
    pub(crate) async fn all_with_prefix<D: Document>(
        &self,
        category: &'static str,
        prefix: &str,
    ) -> Result<Vec<D>> {
        match self.store.all_with_prefix::<D>(prefix).await {
            Ok(docs) => Ok(docs),
            Err(err) => self.recover(category, err, Vec::new()).await,
        }
    }

    /// One document by key
    pub(crate) async fn get<D: Document>(&self, category: &'static str, key: &str) -> Result<Option<D>> {
        match self.store.get::<D>(key).await {
            Ok(doc) => Ok(doc),
            Err(err) => self.recover(category, err, None).await,
        }
    }

    /// A missing collection is fatal unless tolerant mode is on, in which
    /// case `fallback` stands in for its contents
    async fn recover<T>(&self, category: &'static str, err: model_store::Error, fallback: T) -> Result<T> {
        match err {
            model_store::Error::MissingCollection(collection) if self.tolerant() => {
                self.tolerate(category, format!("collection {collection} is missing"))
                    .await;
                Ok(fallback)
            }
            model_store::Error::MissingCollection(collection) => {
                Err(Error::MissingCollection { category, collection })
            }
            other => Err(other.into()),
        }
    }

    /// Record data left out in tolerant mode; repeated records are folded
    pub(crate) async fn tolerate(&self, entity: impl Into<String>, reason: impl Into<String>) {
        let omission = Omission {
            entity: entity.into(),
            reason: reason.into(),
        };
        let mut omissions = self.omissions.lock().await;
        if !omissions.contains(&omission) {
            warn!("Omitting from export: {}: {}", omission.entity, omission.reason);
            omissions.push(omission);
        }
    }

    /// Missing per-entity data: fatal unless tolerant mode is on
    pub(crate) async fn incomplete(&self, entity: impl Into<String>, reason: impl Into<String>) -> Result<()> {
        if self.tolerant() {
            self.tolerate(entity, reason).await;
            Ok(())
        } else {
            Err(Error::incomplete(entity, reason))
        }
    }

    /// Current status of an entity
    pub(crate) async fn status(&self, global_key: &str) -> Result<Option<StatusEntry>> {
        match self.store.status(global_key).await {
            Ok(doc) => Ok(doc.map(StatusEntry::from)),
            Err(err) => self.recover("status", err, None).await,
        }
    }

    /// Trimmed status history of an entity, empty when skipped
    pub(crate) async fn status_history(&self, global_key: &str) -> Result<Vec<StatusEntry>> {
        if self.skips(Category::StatusHistory) {
            return Ok(Vec::new());
        }
        let entries = match self.store.status_history(global_key).await {
            Ok(docs) => docs.into_iter().map(StatusEntry::from).collect(),
            Err(err) => self.recover("status history", err, Vec::new()).await?,
        };
        Ok(trim_status_history(entries, STATUS_HISTORY_CAP))
    }

    /// Annotations of an entity, empty when skipped
    pub(crate) async fn annotations(&self, global_key: &str) -> Result<BTreeMap<String, String>> {
        if self.skips(Category::Annotations) {
            return Ok(BTreeMap::new());
        }
        Ok(self
            .get::<AnnotationsDoc>("annotations", global_key)
            .await?
            .map(|doc| doc.annotations)
            .unwrap_or_default())
    }

    pub(crate) fn into_omissions(self) -> Vec<Omission> {
        self.omissions.into_inner()
    }
}
