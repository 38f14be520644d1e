//! Storage layer abstraction.
//!
//! Two capabilities, each behind a flat trait:
//! - **Key-value**: `get`/`set` over opaque strings (process-local map, Redis)
//! - **Aggregation**: read-only grouped totals from a document store (MongoDB)

pub mod aggregation;
pub mod kv;
pub mod traits;
mod unconfigured;

pub use aggregation::MongoAggregationClient;
pub use kv::{MemoryStore, RedisStore};
pub use traits::{AggregationClient, KeyValueStore};
pub use unconfigured::Unconfigured;
