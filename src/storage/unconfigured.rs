//! Stand-in for a backend type absent from the configuration.

use crate::models::{AggregationFilter, AggregationRecord, KeyValuePair};
use crate::storage::traits::{AggregationClient, KeyValueStore};
use crate::{Error, Result};
use async_trait::async_trait;

/// Answers every call with [`Error::NotConfigured`].
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured {
    backend: &'static str,
}

impl Unconfigured {
    /// Creates a stand-in reporting itself as `backend`.
    #[must_use]
    pub const fn new(backend: &'static str) -> Self {
        Self { backend }
    }

    const fn error(&self) -> Error {
        Error::NotConfigured {
            backend: self.backend,
        }
    }
}

#[async_trait]
impl KeyValueStore for Unconfigured {
    fn name(&self) -> &'static str {
        self.backend
    }

    async fn get(&self, _key: &str) -> Result<KeyValuePair> {
        Err(self.error())
    }

    async fn set(&self, _pair: &KeyValuePair) -> Result<()> {
        Err(self.error())
    }
}

#[async_trait]
impl AggregationClient for Unconfigured {
    async fn fetch(&self, _filter: &AggregationFilter) -> Result<Vec<AggregationRecord>> {
        Err(self.error())
    }
}
