//! MongoDB-backed aggregation client.

/// Backend name reported in errors and metrics.
const BACKEND: &str = "mongodb";

/// Collection the aggregation runs against.
pub const RECORDS_COLLECTION: &str = "records";

#[cfg(feature = "mongodb")]
mod implementation {
    use super::{BACKEND, RECORDS_COLLECTION};
    use crate::Result;
    use crate::models::{AggregationFilter, AggregationRecord};
    use crate::storage::aggregation::pipeline::build_pipeline;
    use crate::storage::traits::AggregationClient;
    use async_trait::async_trait;
    use mongodb::bson::{Bson, Document, doc};
    use mongodb::{Client, Collection};

    /// MongoDB aggregation client.
    ///
    /// The driver's [`Client`] pools connections internally, so one instance
    /// is shared by every request.
    #[derive(Clone, Debug)]
    pub struct MongoAggregationClient {
        /// Collection holding the source documents.
        collection: Collection<Document>,
    }

    impl MongoAggregationClient {
        /// Connects to MongoDB, checks liveness with `ping`, and binds the
        /// `records` collection of `database`.
        ///
        /// # Errors
        ///
        /// Returns the driver error if the URI is invalid or the server does
        /// not answer the ping.
        pub async fn connect(connection_url: &str, database: &str) -> Result<Self> {
            let client = Client::with_uri_str(connection_url).await?;
            let db = client.database(database);
            db.run_command(doc! { "ping": 1 }).await?;

            tracing::debug!(
                backend = BACKEND,
                database,
                collection = RECORDS_COLLECTION,
                "MongoDB connection established"
            );

            Ok(Self {
                collection: db.collection(RECORDS_COLLECTION),
            })
        }
    }

    #[async_trait]
    impl AggregationClient for MongoAggregationClient {
        async fn fetch(&self, filter: &AggregationFilter) -> Result<Vec<AggregationRecord>> {
            let mut cursor = self.collection.aggregate(build_pipeline(filter)).await?;

            let mut records = Vec::new();
            while cursor.advance().await? {
                let group = cursor.deserialize_current()?;
                records.push(record_from_group(&group));
            }
            Ok(records)
        }
    }

    /// Converts one `$group` output document into a record.
    pub(super) fn record_from_group(group: &Document) -> AggregationRecord {
        let key = match group.get("_id") {
            Some(Bson::String(key)) => key.clone(),
            None | Some(Bson::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        let created_at = match group.get("createdAt") {
            Some(Bson::String(value)) => value.clone(),
            Some(Bson::DateTime(value)) => value.try_to_rfc3339_string().unwrap_or_default(),
            _ => String::new(),
        };

        AggregationRecord {
            key,
            created_at,
            total_count: total_count(group.get("totalCount")),
        }
    }

    /// Reads a `$sum` result regardless of the numeric width MongoDB chose.
    #[allow(clippy::cast_possible_truncation)]
    fn total_count(value: Option<&Bson>) -> i64 {
        match value {
            Some(Bson::Int32(n)) => i64::from(*n),
            Some(Bson::Int64(n)) => *n,
            Some(Bson::Double(n)) => n.round() as i64,
            _ => 0,
        }
    }
}

#[cfg(feature = "mongodb")]
pub use implementation::MongoAggregationClient;

#[cfg(not(feature = "mongodb"))]
mod stub {
    use super::BACKEND;
    use crate::models::{AggregationFilter, AggregationRecord};
    use crate::storage::traits::AggregationClient;
    use crate::{Error, Result};
    use async_trait::async_trait;

    /// Stub aggregation client when feature is not enabled.
    pub struct MongoAggregationClient;

    impl MongoAggregationClient {
        /// Connects to MongoDB (stub).
        ///
        /// # Errors
        ///
        /// Always returns an error because the feature is not enabled.
        pub async fn connect(_connection_url: &str, _database: &str) -> Result<Self> {
            Err(Error::FeatureNotEnabled(BACKEND.to_string()))
        }
    }

    #[async_trait]
    impl AggregationClient for MongoAggregationClient {
        async fn fetch(&self, _filter: &AggregationFilter) -> Result<Vec<AggregationRecord>> {
            Err(Error::FeatureNotEnabled(BACKEND.to_string()))
        }
    }
}

#[cfg(not(feature = "mongodb"))]
pub use stub::MongoAggregationClient;
