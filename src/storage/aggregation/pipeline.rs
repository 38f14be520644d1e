//! Aggregation pipeline construction.
//!
//! A filter becomes two independent predicate fragments, one over the
//! creation timestamp and one over the count field. Each fragment holds only
//! the bounds that are present; a fragment with no bounds is the empty
//! document, which matches every document. The fragments are conjoined in a
//! `$match` stage and followed by a `$group` stage that sums the count field
//! per key.

use crate::models::AggregationFilter;
use chrono::{NaiveDate, NaiveTime};
use mongodb::bson::{self, Document, doc};

/// Field holding the document creation timestamp.
pub const CREATED_AT_FIELD: &str = "created_at";

/// Field holding the per-document count.
pub const COUNT_FIELD: &str = "count";

/// Field the documents are grouped by.
pub const KEY_FIELD: &str = "key";

/// Builds the date-range fragment.
#[must_use]
pub fn date_predicate(filter: &AggregationFilter) -> Document {
    let mut bounds = Document::new();
    if let Some(start) = filter.start_date {
        bounds.insert("$gte", midnight_utc(start));
    }
    if let Some(end) = filter.end_date {
        bounds.insert("$lte", midnight_utc(end));
    }

    if bounds.is_empty() {
        Document::new()
    } else {
        doc! { CREATED_AT_FIELD: bounds }
    }
}

/// Builds the count-range fragment.
#[must_use]
pub fn count_predicate(filter: &AggregationFilter) -> Document {
    let mut bounds = Document::new();
    if let Some(min) = filter.min_count {
        bounds.insert("$gte", min);
    }
    if let Some(max) = filter.max_count {
        bounds.insert("$lte", max);
    }

    if bounds.is_empty() {
        Document::new()
    } else {
        doc! { COUNT_FIELD: bounds }
    }
}

/// Builds the full `$match` + `$group` pipeline for a filter.
#[must_use]
pub fn build_pipeline(filter: &AggregationFilter) -> Vec<Document> {
    let match_stage = doc! {
        "$match": {
            "$and": [date_predicate(filter), count_predicate(filter)]
        }
    };
    let group_stage = doc! {
        "$group": {
            "_id": format!("${KEY_FIELD}"),
            "totalCount": { "$sum": format!("${COUNT_FIELD}") }
        }
    };

    vec![match_stage, group_stage]
}

/// Start of the given day in UTC as a BSON date.
fn midnight_utc(date: NaiveDate) -> bson::DateTime {
    let millis = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    bson::DateTime::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unbounded_filter_matches_everything() {
        let filter = AggregationFilter::new();
        assert!(date_predicate(&filter).is_empty());
        assert!(count_predicate(&filter).is_empty());

        let pipeline = build_pipeline(&filter);
        assert_eq!(
            pipeline[0],
            doc! { "$match": { "$and": [Document::new(), Document::new()] } }
        );
    }

    #[test]
    fn test_empty_body_and_empty_filter_build_the_same_pipeline() {
        let decoded: AggregationFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(
            build_pipeline(&decoded),
            build_pipeline(&AggregationFilter::default())
        );
    }

    #[test]
    fn test_single_date_bound_only_contributes_its_clause() {
        let filter = AggregationFilter::new().with_start_date(date(2016, 1, 26));
        let predicate = date_predicate(&filter);

        let bounds = predicate.get_document(CREATED_AT_FIELD).unwrap();
        assert_eq!(bounds.len(), 1);
        assert_eq!(
            bounds.get_datetime("$gte").unwrap().timestamp_millis(),
            1_453_766_400_000
        );
        assert!(count_predicate(&filter).is_empty());
    }

    #[test]
    fn test_full_date_range() {
        let filter = AggregationFilter::new()
            .with_start_date(date(2016, 1, 26))
            .with_end_date(date(2018, 2, 2));
        let bounds = date_predicate(&filter);
        let bounds = bounds.get_document(CREATED_AT_FIELD).unwrap();

        assert!(bounds.contains_key("$gte"));
        assert!(bounds.contains_key("$lte"));
    }

    #[test]
    fn test_count_range() {
        let filter = AggregationFilter::new()
            .with_min_count(2700)
            .with_max_count(3000);

        assert_eq!(
            count_predicate(&filter),
            doc! { COUNT_FIELD: { "$gte": 2700_i64, "$lte": 3000_i64 } }
        );
        assert!(date_predicate(&filter).is_empty());
    }

    #[test]
    fn test_group_stage_sums_count_per_key() {
        let pipeline = build_pipeline(&AggregationFilter::new().with_max_count(10));
        assert_eq!(pipeline.len(), 2);
        assert_eq!(
            pipeline[1],
            doc! { "$group": { "_id": "$key", "totalCount": { "$sum": "$count" } } }
        );
    }
}
