//! Process-local key-value store.
//!
//! Backed by a [`DashMap`], which shards its locks internally so concurrent
//! request tasks can read and write without caller-side synchronization.

use crate::models::KeyValuePair;
use crate::storage::traits::KeyValueStore;
use crate::{Error, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::OnceLock;

/// Backend name reported in errors and metrics.
const BACKEND: &str = "inmemory";

/// In-memory key-value store.
///
/// The map is allocated lazily by [`MemoryStore::initialize`]; until then
/// every operation fails with [`Error::NotInitialized`]. Data is lost when the
/// process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: OnceLock<DashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an uninitialized store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that is already initialized.
    #[must_use]
    pub fn initialized() -> Self {
        let store = Self::new();
        store.initialize();
        store
    }

    /// Allocates the backing map. Calling this again keeps the existing map.
    pub fn initialize(&self) {
        self.entries.get_or_init(DashMap::new);
    }

    /// Returns true once [`MemoryStore::initialize`] has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Returns the number of stored keys (0 when uninitialized).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.get().map_or(0, DashMap::len)
    }

    /// Returns true if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Result<&DashMap<String, String>> {
        self.entries
            .get()
            .ok_or(Error::NotInitialized { backend: BACKEND })
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn get(&self, key: &str) -> Result<KeyValuePair> {
        self.entries()?
            .get(key)
            .map(|entry| KeyValuePair::new(key, entry.value().clone()))
            .ok_or(Error::KeyNotFound { backend: BACKEND })
    }

    async fn set(&self, pair: &KeyValuePair) -> Result<()> {
        self.entries()?.insert(pair.key.clone(), pair.value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::initialized();
        let err = store.get("test").await.unwrap_err();
        assert!(matches!(err, Error::KeyNotFound { .. }));
        assert_eq!(err.to_string(), "inmemory: nil");
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::initialized();
        store
            .set(&KeyValuePair::new("test", "testinmemory"))
            .await
            .unwrap();

        let pair = store.get("test").await.unwrap();
        assert_eq!(pair, KeyValuePair::new("test", "testinmemory"));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemoryStore::initialized();
        store.set(&KeyValuePair::new("k", "first")).await.unwrap();
        store.set(&KeyValuePair::new("k", "second")).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().value, "second");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_set_before_initialize_fails() {
        let store = MemoryStore::new();
        let err = store
            .set(&KeyValuePair::new("test", "testinmemory"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotInitialized { .. }));
        assert_eq!(err.to_string(), "inmemory: initialize inmemory first");
    }

    #[tokio::test]
    async fn test_get_before_initialize_fails() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get("test").await,
            Err(Error::NotInitialized { .. })
        ));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let store = MemoryStore::new();
        assert!(!store.is_initialized());

        store.initialize();
        store.set(&KeyValuePair::new("kept", "yes")).await.unwrap();
        store.initialize();

        assert!(store.is_initialized());
        assert_eq!(store.get("kept").await.unwrap().value, "yes");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_and_readers() {
        let store = Arc::new(MemoryStore::initialized());
        let mut tasks = Vec::new();

        for i in 0..64 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                let pair = KeyValuePair::new(format!("key-{i}"), format!("value-{i}"));
                store.set(&pair).await.unwrap();
                store.get(&pair.key).await.unwrap()
            }));
        }

        for (i, task) in tasks.into_iter().enumerate() {
            let pair = task.await.unwrap();
            assert_eq!(pair.value, format!("value-{i}"));
        }
        assert_eq!(store.len(), 64);
    }
}
