//! Document-store aggregation backends.
//!
//! | Backend | Source | Configuration |
//! |---------|--------|---------------|
//! | `MongoAggregationClient` | `records` collection | `"type": "mongodb"`, database = descriptor name |

mod mongodb;
#[cfg(feature = "mongodb")]
pub mod pipeline;

pub use self::mongodb::{MongoAggregationClient, RECORDS_COLLECTION};
