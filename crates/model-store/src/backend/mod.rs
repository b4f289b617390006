//! Store backend implementations

pub mod memory;
pub mod sled;

use crate::{collection::Collection, error::Result};
use async_trait::async_trait;

pub use self::memory::MemoryBackend;
pub use self::sled::SledBackend;

/// A raw key/value entry read from a collection
pub type RawEntry = (String, Vec<u8>);

/// Trait for model store storage backends.
///
/// Backends store opaque bytes; encoding is the [`Store`]'s concern.
/// Every scan returns entries ordered by key so that reads are
/// deterministic regardless of the backend.
///
/// [`Store`]: crate::Store
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Initialize the backend, creating every collection
    async fn init(&self) -> Result<()>;

    /// Whether the collection exists
    async fn has_collection(&self, collection: Collection) -> Result<bool>;

    /// Drop a whole collection (used by repair tooling and tests)
    async fn drop_collection(&self, collection: Collection) -> Result<()>;

    /// Store a value
    async fn put(&self, collection: Collection, key: &str, value: Vec<u8>) -> Result<()>;

    /// Get a value by key
    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove a value, returning it if present
    async fn remove(&self, collection: Collection, key: &str) -> Result<Option<Vec<u8>>>;

    /// All entries of a collection, ordered by key.
    ///
    /// Fails with `MissingCollection` if the collection does not exist.
    async fn scan(&self, collection: Collection) -> Result<Vec<RawEntry>>;

    /// Entries whose key starts with `prefix`, ordered by key
    async fn scan_prefix(&self, collection: Collection, prefix: &str) -> Result<Vec<RawEntry>>;
}
