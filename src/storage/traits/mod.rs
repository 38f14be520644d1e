//! Storage backend traits.

mod aggregation;
mod kv;

pub use aggregation::AggregationClient;
pub use kv::KeyValueStore;
