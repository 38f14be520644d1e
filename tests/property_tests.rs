//! Property-based tests.
//!
//! Uses proptest to verify invariants across random inputs:
//! - `set` followed by `get` returns the exact pair on the local store
//! - keys never written are reported as missing, never as a value
//! - the last write to a key wins
//! - well-formed filter dates always decode; out-of-range months never do

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use kvgate::models::AggregationFilter;
use kvgate::{Error, KeyValuePair, KeyValueStore, MemoryStore};
use proptest::prelude::*;

proptest! {
    /// Property: a stored pair reads back unchanged.
    #[test]
    fn prop_set_then_get_roundtrips(key in "\\PC{1,64}", value in "\\PC{1,256}") {
        let store = MemoryStore::initialized();
        let pair = KeyValuePair::new(key.clone(), value);

        let fetched = tokio_test::block_on(async {
            store.set(&pair).await.unwrap();
            store.get(&key).await.unwrap()
        });
        prop_assert_eq!(fetched, pair);
    }

    /// Property: a key that was never written is not found.
    #[test]
    fn prop_unwritten_key_is_not_found(
        written in "[a-m]{1,16}",
        missing in "[n-z]{1,16}",
    ) {
        let store = MemoryStore::initialized();

        let result = tokio_test::block_on(async {
            store.set(&KeyValuePair::new(written, "value")).await.unwrap();
            store.get(&missing).await
        });
        prop_assert!(
            matches!(result, Err(Error::KeyNotFound { backend: "inmemory" })),
            "expected KeyNotFound from inmemory, got {:?}",
            result
        );
    }

    /// Property: the last write wins.
    #[test]
    fn prop_last_write_wins(key in "[a-z]{1,16}", values in prop::collection::vec("[a-z0-9]{1,16}", 1..10)) {
        let store = MemoryStore::initialized();

        let fetched = tokio_test::block_on(async {
            for value in &values {
                store.set(&KeyValuePair::new(key.clone(), value.clone())).await.unwrap();
            }
            store.get(&key).await.unwrap()
        });
        prop_assert_eq!(&fetched.value, values.last().unwrap());
        prop_assert_eq!(store.len(), 1);
    }

    /// Property: every real calendar date decodes.
    #[test]
    fn prop_valid_dates_decode(year in 1970i32..3000, month in 1u32..=12, day in 1u32..=28) {
        let body = format!(r#"{{"startDate":"{year:04}-{month:02}-{day:02}"}}"#);
        let filter: AggregationFilter = serde_json::from_str(&body).unwrap();
        prop_assert!(filter.start_date.is_some());
        prop_assert!(filter.has_no_count_bounds());
    }

    /// Property: a month outside 1..=12 never decodes.
    #[test]
    fn prop_invalid_months_fail(year in 1970i32..3000, month in 13u32..100, day in 1u32..=28) {
        let body = format!(r#"{{"endDate":"{year:04}-{month:02}-{day:02}"}}"#);
        prop_assert!(serde_json::from_str::<AggregationFilter>(&body).is_err());
    }
}
