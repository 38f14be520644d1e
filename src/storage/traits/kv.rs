//! Key-value backend trait.
//!
//! # Available Implementations
//!
//! | Backend | Use Case | Configuration |
//! |---------|----------|---------------|
//! | `MemoryStore` | Process-local map, lost on restart | `"type": "inmemory"` |
//! | `RedisStore` | Remote cache service | `"type": "redis"`, Redis URL |
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use kvgate::models::KeyValuePair;
//! use kvgate::storage::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.initialize();
//! store.set(&KeyValuePair::new("greeting", "hello")).await?;
//! let pair = store.get("greeting").await?;
//! assert_eq!(pair.value, "hello");
//! ```

use crate::Result;
use crate::models::KeyValuePair;
use async_trait::async_trait;

/// Trait for key-value storage backends.
///
/// Implementations must be safe to call concurrently from many request
/// tasks; callers never add their own locking.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short backend name used in logs, metrics and error messages.
    fn name(&self) -> &'static str;

    /// Gets the pair stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::KeyNotFound`] if the key was never written, or
    /// the backend's own error if the store cannot be reached.
    async fn get(&self, key: &str) -> Result<KeyValuePair>;

    /// Stores a pair, overwriting any previous value (last write wins).
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable or rejects the write.
    async fn set(&self, pair: &KeyValuePair) -> Result<()>;
}
