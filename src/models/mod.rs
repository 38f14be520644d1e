//! Data models for kvgate.
//!
//! Wire types shared by the storage backends and the HTTP handlers.

mod aggregation;
mod kv;

pub use aggregation::{AggregationFilter, AggregationRecord, DATE_FORMAT};
pub use kv::KeyValuePair;
