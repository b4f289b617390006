//! In-memory backend for the model store

use super::{RawEntry, StoreBackend};
use crate::{
    collection::Collection,
    error::{Error, Result},
};
use async_trait::async_trait;
use futures::lock::Mutex;
use std::collections::BTreeMap;

type Tree = BTreeMap<String, Vec<u8>>;

/// In-memory store backend
pub struct MemoryBackend {
    /// Collections keyed by name; a `BTreeMap` keeps scans ordered by key
    trees: Mutex<BTreeMap<Collection, Tree>>,
}

impl MemoryBackend {
    /// Create a new in-memory backend
    pub fn new() -> Self {
        Self {
            trees: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn init(&self) -> Result<()> {
        let mut trees = self.trees.lock().await;
        for collection in Collection::ALL {
            trees.entry(collection).or_default();
        }
        Ok(())
    }

    async fn has_collection(&self, collection: Collection) -> Result<bool> {
        Ok(self.trees.lock().await.contains_key(&collection))
    }

    async fn drop_collection(&self, collection: Collection) -> Result<()> {
        self.trees.lock().await.remove(&collection);
        Ok(())
    }

    async fn put(&self, collection: Collection, key: &str, value: Vec<u8>) -> Result<()> {
        let mut trees = self.trees.lock().await;
        let tree = trees
            .get_mut(&collection)
            .ok_or(Error::MissingCollection(collection))?;
        tree.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>> {
        let trees = self.trees.lock().await;
        let tree = trees
            .get(&collection)
            .ok_or(Error::MissingCollection(collection))?;
        Ok(tree.get(key).cloned())
    }

    async fn remove(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>> {
        let mut trees = self.trees.lock().await;
        let tree = trees
            .get_mut(&collection)
            .ok_or(Error::MissingCollection(collection))?;
        Ok(tree.remove(key))
    }

    async fn scan(&self, collection: Collection) -> Result<Vec<RawEntry>> {
        let trees = self.trees.lock().await;
        let tree = trees
            .get(&collection)
            .ok_or(Error::MissingCollection(collection))?;
        Ok(tree.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    async fn scan_prefix(&self, collection: Collection, prefix: &str) -> Result<Vec<RawEntry>> {
        let trees = self.trees.lock().await;
        let tree = trees
            .get(&collection)
            .ok_or(Error::MissingCollection(collection))?;
        Ok(tree
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[smol_potat::test]
    async fn test_memory_backend_basic() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();

        backend
            .put(Collection::Machines, "1", b"one".to_vec())
            .await
            .unwrap();
        backend
            .put(Collection::Machines, "0", b"zero".to_vec())
            .await
            .unwrap();

        let value = backend.get(Collection::Machines, "0").await.unwrap();
        assert_eq!(value.as_deref(), Some(&b"zero"[..]));

        let keys: Vec<String> = backend
            .scan(Collection::Machines)
            .await
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["0", "1"]);

        let removed = backend.remove(Collection::Machines, "1").await.unwrap();
        assert!(removed.is_some());
        assert!(backend.get(Collection::Machines, "1").await.unwrap().is_none());
    }

    #[smol_potat::test]
    async fn test_memory_backend_scan_prefix() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();

        for key in ["u#a/0#1", "u#a/0#2", "u#a/1#1", "u#b/0#1"] {
            backend
                .put(Collection::StatusHistory, key, Vec::new())
                .await
                .unwrap();
        }

        let entries = backend
            .scan_prefix(Collection::StatusHistory, "u#a/0#")
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[smol_potat::test]
    async fn test_memory_backend_missing_collection() {
        let backend = MemoryBackend::new();
        backend.init().await.unwrap();
        backend.drop_collection(Collection::Subnets).await.unwrap();

        assert!(!backend.has_collection(Collection::Subnets).await.unwrap());
        let err = backend.scan(Collection::Subnets).await.unwrap_err();
        assert!(matches!(err, Error::MissingCollection(Collection::Subnets)));
    }
}
