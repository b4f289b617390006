//! Sled database backend for the model store

use super::{RawEntry, StoreBackend};
use crate::{
    collection::Collection,
    error::{Error, Result},
};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, error, info};

/// Sled-based store backend, one tree per collection
pub struct SledBackend {
    /// Database instance
    db: sled::Db,
}

impl SledBackend {
    /// Open (or create) a sled database at `path`
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening sled database at {:?}", path);
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Create a temporary sled database (for testing)
    pub async fn in_memory() -> Result<Self> {
        info!("Creating in-memory sled database");
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    fn has_tree(&self, collection: Collection) -> bool {
        self.db
            .tree_names()
            .iter()
            .any(|name| name.as_ref() == collection.name().as_bytes())
    }

    /// Open the tree for an existing collection without creating it
    fn tree(&self, collection: Collection) -> Result<sled::Tree> {
        if !self.has_tree(collection) {
            return Err(Error::MissingCollection(collection));
        }
        Ok(self.db.open_tree(collection.name())?)
    }

    fn decode(entry: sled::Result<(sled::IVec, sled::IVec)>) -> Result<RawEntry> {
        let (key, value) = entry?;
        Ok((String::from_utf8_lossy(&key).into_owned(), value.to_vec()))
    }
}

#[async_trait]
impl StoreBackend for SledBackend {
    async fn init(&self) -> Result<()> {
        for collection in Collection::ALL {
            self.db.open_tree(collection.name())?;
        }
        self.db.flush_async().await?;
        Ok(())
    }

    async fn has_collection(&self, collection: Collection) -> Result<bool> {
        Ok(self.has_tree(collection))
    }

    async fn drop_collection(&self, collection: Collection) -> Result<()> {
        debug!("Dropping collection {}", collection);
        self.db.drop_tree(collection.name())?;
        Ok(())
    }

    async fn put(&self, collection: Collection, key: &str, value: Vec<u8>) -> Result<()> {
        debug!("Storing {}/{}", collection, key);
        let tree = self.tree(collection)?;
        tree.insert(key.as_bytes(), value)?;
        tree.flush_async().await?;
        Ok(())
    }

    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>> {
        let tree = self.tree(collection)?;
        Ok(tree.get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    async fn remove(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>> {
        debug!("Removing {}/{}", collection, key);
        let tree = self.tree(collection)?;
        let existing = tree.remove(key.as_bytes())?;
        if existing.is_some() {
            tree.flush_async().await?;
        }
        Ok(existing.map(|v| v.to_vec()))
    }

    async fn scan(&self, collection: Collection) -> Result<Vec<RawEntry>> {
        debug!("Scanning {}", collection);
        self.tree(collection)?.iter().map(Self::decode).collect()
    }

    async fn scan_prefix(&self, collection: Collection, prefix: &str) -> Result<Vec<RawEntry>> {
        self.tree(collection)?
            .scan_prefix(prefix.as_bytes())
            .map(Self::decode)
            .collect()
    }
}

impl Drop for SledBackend {
    fn drop(&mut self) {
        if let Err(e) = self.db.flush() {
            error!("Failed to flush database on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[smol_potat::test]
    async fn test_sled_backend_basic() {
        let backend = SledBackend::in_memory().await.unwrap();
        backend.init().await.unwrap();

        backend
            .put(Collection::Applications, "wordpress", b"{}".to_vec())
            .await
            .unwrap();
        let value = backend
            .get(Collection::Applications, "wordpress")
            .await
            .unwrap();
        assert!(value.is_some());

        let entries = backend.scan(Collection::Applications).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "wordpress");

        backend
            .remove(Collection::Applications, "wordpress")
            .await
            .unwrap();
        assert!(
            backend
                .get(Collection::Applications, "wordpress")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[smol_potat::test]
    async fn test_sled_backend_dropped_collection() {
        let backend = SledBackend::in_memory().await.unwrap();
        backend.init().await.unwrap();
        backend
            .drop_collection(Collection::InstanceData)
            .await
            .unwrap();

        let err = backend.scan(Collection::InstanceData).await.unwrap_err();
        assert!(matches!(
            err,
            Error::MissingCollection(Collection::InstanceData)
        ));
    }

    #[smol_potat::test]
    async fn test_sled_backend_persistence() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let db_path = dir.path().join("model.db");

        {
            let backend = SledBackend::new(&db_path).await.unwrap();
            backend.init().await.unwrap();
            for i in 0..5 {
                backend
                    .put(Collection::Machines, &i.to_string(), b"{}".to_vec())
                    .await
                    .unwrap();
            }
        }

        let backend = SledBackend::new(&db_path).await.unwrap();
        let entries = backend.scan(Collection::Machines).await.unwrap();
        assert_eq!(entries.len(), 5);
    }
}
