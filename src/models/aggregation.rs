//! Aggregation filter and record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for calendar dates in aggregation filters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional bounds for an aggregation query.
///
/// Every bound is independent; present bounds combine conjunctively and an
/// absent bound imposes no constraint. The default filter matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationFilter {
    /// Inclusive lower bound on the creation date.
    #[serde(
        default,
        with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date.
    #[serde(
        default,
        with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    /// Inclusive lower bound on the per-document count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<i64>,
    /// Inclusive upper bound on the per-document count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<i64>,
}

impl AggregationFilter {
    /// Creates an empty filter (matches all).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start_date: None,
            end_date: None,
            min_count: None,
            max_count: None,
        }
    }

    /// Sets the inclusive start date.
    #[must_use]
    pub const fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the inclusive end date.
    #[must_use]
    pub const fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the inclusive minimum count.
    #[must_use]
    pub const fn with_min_count(mut self, count: i64) -> Self {
        self.min_count = Some(count);
        self
    }

    /// Sets the inclusive maximum count.
    #[must_use]
    pub const fn with_max_count(mut self, count: i64) -> Self {
        self.max_count = Some(count);
        self
    }

    /// Returns true if no date bound is set.
    #[must_use]
    pub const fn has_no_date_bounds(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    /// Returns true if no count bound is set.
    #[must_use]
    pub const fn has_no_count_bounds(&self) -> bool {
        self.min_count.is_none() && self.max_count.is_none()
    }

    /// Returns true if the filter restricts nothing.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.has_no_date_bounds() && self.has_no_count_bounds()
    }
}

/// One group produced by the aggregation query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationRecord {
    /// Group identity.
    pub key: String,
    /// Creation marker of the group; empty when the pipeline does not project one.
    #[serde(default)]
    pub created_at: String,
    /// Sum of the count field across the grouped documents.
    pub total_count: i64,
}

impl AggregationRecord {
    /// Creates a record without a creation marker.
    #[must_use]
    pub fn new(key: impl Into<String>, total_count: i64) -> Self {
        Self {
            key: key.into(),
            created_at: String::new(),
            total_count,
        }
    }
}

/// `YYYY-MM-DD` codec for optional dates.
///
/// `null` and the empty string both decode to `None`.
mod optional_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(value) if !has_date_shape(value) => Err(D::Error::custom(format!(
                "invalid date '{value}': expected YYYY-MM-DD"
            ))),
            Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid date '{value}': {e}"))),
        }
    }

    /// Exactly ten ASCII bytes: four digits, `-`, two digits, `-`, two digits.
    ///
    /// chrono alone accepts signs and unpadded fields.
    fn has_date_shape(value: &str) -> bool {
        value.len() == 10
            && value.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r#"{"startDate":"2023-02-12"}"#, true ; "valid date")]
    #[test_case(r#"{"startDate":"2023-02-30"}"#, false ; "impossible day")]
    #[test_case(r#"{"startDate":"2023-34-12"}"#, false ; "impossible month")]
    #[test_case(r#"{"startDate":"3333-33-33"}"#, false ; "garbage date")]
    #[test_case(r#"{"endDate":"33-3333-33"}"#, false ; "wrong layout")]
    #[test_case(r#"{"startDate":"2016-1-26"}"#, false ; "unpadded month")]
    #[test_case(r#"{"startDate":"2016-01-6"}"#, false ; "unpadded day")]
    #[test_case(r#"{"startDate":" 2016-01-26 "}"#, false ; "surrounding spaces")]
    #[test_case(r#"{"startDate":"+2016-01-26"}"#, false ; "signed year")]
    #[test_case(r#"{"endDate":"2016/01/26"}"#, false ; "slash separators")]
    #[test_case(r#"{"startDate":null}"#, true ; "null date")]
    #[test_case(r#"{"endDate":""}"#, true ; "empty date")]
    #[test_case(r#"{"minCount":"1a"}"#, false ; "non numeric min")]
    #[test_case(r#"{"maxCount":"1a"}"#, false ; "non numeric max")]
    #[test_case(r#"{"minCount":1,"maxCount":10}"#, true ; "count range")]
    fn test_filter_decoding(input: &str, ok: bool) {
        let result: Result<AggregationFilter, _> = serde_json::from_str(input);
        assert_eq!(result.is_ok(), ok, "input: {input}");
    }

    #[test]
    fn test_empty_object_is_unbounded() {
        let filter: AggregationFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter, AggregationFilter::new());
        assert!(filter.is_unbounded());
    }

    #[test]
    fn test_date_round_trips_in_wire_format() {
        let date = NaiveDate::from_ymd_opt(2022, 1, 22).unwrap();
        let filter = AggregationFilter::new().with_start_date(date);
        let encoded = serde_json::to_string(&filter).unwrap();
        assert_eq!(encoded, r#"{"startDate":"2022-01-22"}"#);

        let decoded: AggregationFilter = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.start_date, Some(date));
        assert!(decoded.has_no_count_bounds());
        assert!(!decoded.has_no_date_bounds());
    }

    #[test]
    fn test_record_wire_shape() {
        let record = AggregationRecord::new("a", 1);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"key":"a","createdAt":"","totalCount":1}"#
        );
    }
}
