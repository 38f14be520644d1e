//! # kvgate
//!
//! A small HTTP facade over swappable key-value stores and a read-only
//! document-store aggregation query.
//!
//! ## Features
//!
//! - One [`KeyValueStore`] capability with two backends: a process-local
//!   concurrent map and a Redis-backed remote store
//! - One [`AggregationClient`] capability backed by a MongoDB aggregation
//!   pipeline (group by key, sum a count field, optional date/count bounds)
//! - JSON configuration that dispatches backend initialization by declared type
//! - axum HTTP surface with bounded graceful shutdown
//!
//! ## Example
//!
//! ```rust,ignore
//! use kvgate::config::AppConfig;
//! use kvgate::services::BackendSet;
//!
//! let config = AppConfig::load_from_file("config.json".as_ref())?;
//! let backends = BackendSet::from_descriptors(&config.databases).await?;
//! let app = kvgate::server::build_router(&backends);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod models;
pub mod observability;
pub mod server;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::{AppConfig, ApplicationSettings, BackendDescriptor, BackendKind};
pub use models::{AggregationFilter, AggregationRecord, KeyValuePair};
pub use services::BackendSet;
pub use storage::{AggregationClient, KeyValueStore, MemoryStore};

/// Error type for kvgate operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
/// Backend client errors are wrapped transparently so their messages reach
/// HTTP callers unchanged.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing required startup input (empty config path) |
/// | `OperationFailed` | Config file I/O or parse failure, bind/serve failure |
/// | `FeatureNotEnabled` | A backend type is configured but compiled out |
/// | `KeyNotFound` | `get` on a key that was never written |
/// | `NotInitialized` | The local store is used before `initialize` |
/// | `NotConfigured` | A route is called whose backend is absent from the config |
/// | `Redis` | Any error reported by the Redis client |
/// | `MongoDb` | Any error reported by the MongoDB driver |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Feature not enabled (requires feature flag).
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),

    /// The requested key does not exist in the store.
    ///
    /// Kept distinct from transport failures so callers can tell an absent
    /// key from an unreachable backend.
    #[error("{backend}: nil")]
    KeyNotFound {
        /// Short name of the backend that was asked.
        backend: &'static str,
    },

    /// The store was used before it was initialized.
    #[error("{backend}: initialize {backend} first")]
    NotInitialized {
        /// Short name of the uninitialized backend.
        backend: &'static str,
    },

    /// No backend of this type was configured.
    #[error("{backend}: not configured")]
    NotConfigured {
        /// Short name of the missing backend.
        backend: &'static str,
    },

    /// Error reported by the Redis client.
    #[cfg(feature = "redis")]
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    /// Error reported by the MongoDB driver.
    #[cfg(feature = "mongodb")]
    #[error(transparent)]
    MongoDb(#[from] mongodb::error::Error),
}

/// Result type alias for kvgate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("config file value not given".to_string());
        assert_eq!(err.to_string(), "invalid input: config file value not given");

        let err = Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "operation 'read_config_file' failed: No such file or directory"
        );

        let err = Error::KeyNotFound {
            backend: "inmemory",
        };
        assert_eq!(err.to_string(), "inmemory: nil");

        let err = Error::NotInitialized {
            backend: "inmemory",
        };
        assert_eq!(err.to_string(), "inmemory: initialize inmemory first");

        let err = Error::NotConfigured { backend: "redis" };
        assert_eq!(err.to_string(), "redis: not configured");
    }
}
