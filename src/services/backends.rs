//! Backend registry built from the configured descriptors.
//!
//! ```text
//! BackendSet
//!   ├── local   → Option<Arc<dyn KeyValueStore>>    (type "inmemory")
//!   ├── remote  → Option<Arc<dyn KeyValueStore>>    (type "redis")
//!   └── records → Option<Arc<dyn AggregationClient>> (type "mongodb")
//! ```
//!
//! The set is owned by the entry point and handed to the router. Each slot is
//! filled at most once; a second descriptor of the same type reuses the
//! instance created for the first.

use crate::Result;
use crate::config::{BackendDescriptor, BackendKind};
use crate::storage::{
    AggregationClient, KeyValueStore, MemoryStore, MongoAggregationClient, RedisStore,
};
use std::sync::Arc;

/// Initialized backends, one per type at most.
#[derive(Clone, Default)]
pub struct BackendSet {
    /// Process-local key-value store.
    pub local: Option<Arc<dyn KeyValueStore>>,
    /// Remote key-value store.
    pub remote: Option<Arc<dyn KeyValueStore>>,
    /// Aggregation query client.
    pub records: Option<Arc<dyn AggregationClient>>,
}

impl std::fmt::Debug for BackendSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSet")
            .field("local", &self.local.is_some())
            .field("remote", &self.remote.is_some())
            .field("records", &self.records.is_some())
            .finish()
    }
}

impl BackendSet {
    /// Initializes every recognized descriptor in declaration order.
    ///
    /// Descriptors with an unrecognized type are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns the first backend initialization error; startup cannot
    /// continue with a backend that was configured but is unreachable.
    pub async fn from_descriptors(descriptors: &[BackendDescriptor]) -> Result<Self> {
        let mut set = Self::default();

        for descriptor in descriptors {
            let Some(kind) = descriptor.kind() else {
                tracing::warn!(
                    name = %descriptor.name,
                    backend_type = %descriptor.backend_type,
                    "Ignoring database with unknown type"
                );
                continue;
            };

            match kind {
                BackendKind::InMemory => {
                    set.init_local();
                },
                BackendKind::Redis => {
                    set.init_remote(&descriptor.connection_string).await?;
                },
                BackendKind::MongoDb => {
                    set.init_records(&descriptor.connection_string, &descriptor.name)
                        .await?;
                },
            }
            tracing::info!(name = %descriptor.name, backend = %kind, "Initialized backend");
        }

        Ok(set)
    }

    /// Returns the local store, creating it on first call.
    pub fn init_local(&mut self) -> Arc<dyn KeyValueStore> {
        let store = self.local.get_or_insert_with(|| {
            let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::initialized());
            store
        });
        Arc::clone(store)
    }

    /// Returns the remote store, connecting on first call.
    ///
    /// # Errors
    ///
    /// Returns the client error if the connection or liveness check fails.
    pub async fn init_remote(&mut self, connection_url: &str) -> Result<Arc<dyn KeyValueStore>> {
        if let Some(existing) = &self.remote {
            return Ok(Arc::clone(existing));
        }

        let store: Arc<dyn KeyValueStore> = Arc::new(RedisStore::connect(connection_url).await?);
        self.remote = Some(Arc::clone(&store));
        Ok(store)
    }

    /// Returns the aggregation client, connecting on first call.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the connection or liveness check fails.
    pub async fn init_records(
        &mut self,
        connection_url: &str,
        database: &str,
    ) -> Result<Arc<dyn AggregationClient>> {
        if let Some(existing) = &self.records {
            return Ok(Arc::clone(existing));
        }

        let client: Arc<dyn AggregationClient> =
            Arc::new(MongoAggregationClient::connect(connection_url, database).await?);
        self.records = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Returns true if no backend was configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.local.is_none() && self.remote.is_none() && self.records.is_none()
    }
}
