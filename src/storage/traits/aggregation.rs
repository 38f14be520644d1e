//! Aggregation query trait.

use crate::Result;
use crate::models::{AggregationFilter, AggregationRecord};
use async_trait::async_trait;

/// Trait for read-only aggregation backends.
///
/// The result order carries no meaning. An empty result is not an error.
#[async_trait]
pub trait AggregationClient: Send + Sync {
    /// Returns grouped totals for the documents matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the driver error unchanged if the query or transport fails.
    async fn fetch(&self, filter: &AggregationFilter) -> Result<Vec<AggregationRecord>>;
}
