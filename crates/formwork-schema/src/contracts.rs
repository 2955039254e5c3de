//! # Shared Request Contracts
//!
//! Pre-built records for inbound request parameters.
//!
//! - [`Pagination`]: `pageIndex` (default 0) and `pageSize` (default 20).
//!   No upper bound is enforced here; callers that need one merge their own
//!   constraint into the schema.
//! - [`DateRange`]: optional `from` and `to` dates. No ordering between the
//!   two bounds is enforced; range semantics belong to the caller.
//!
//! Both are ordinary [`Record`](crate::Record) types: they validate on their
//! own, nest as sub-fields, or combine as `(Pagination, DateRange)` to
//! validate a flat query string in one pass.

use chrono::{DateTime, Utc};

use crate::field;

crate::record! {
    /// Zero-based page selection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Pagination {
        /// Zero-based page number.
        page_index: i64 = "pageIndex" => field::number().int().default(0),
        /// Items per page.
        page_size: i64 = "pageSize" => field::number().int().default(20),
    }
}

impl Pagination {
    /// Number of items to skip. Negative inputs clamp to zero.
    pub fn offset(&self) -> usize {
        clamp(self.page_index).saturating_mul(self.limit())
    }

    /// Number of items to take. Negative inputs clamp to zero.
    pub fn limit(&self) -> usize {
        clamp(self.page_size)
    }
}

fn clamp(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

crate::record! {
    /// An optional, unordered pair of date bounds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DateRange {
        /// Inclusive lower bound.
        from: Option<DateTime<Utc>> = "from" => field::date().optional(),
        /// Inclusive upper bound.
        to: Option<DateTime<Utc>> = "to" => field::date().optional(),
    }
}

impl DateRange {
    /// Whether `at` falls within every bound that is present.
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| *at >= from) && self.to.map_or(true, |to| *at <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorReason;
    use crate::record::Record;
    use crate::schema::{string_input, RawInput};
    use chrono::TimeZone;

    #[test]
    fn pagination_defaults_on_empty_input() {
        let page = Pagination::validate(&RawInput::new()).unwrap();
        assert_eq!(*page.page_index(), 0);
        assert_eq!(*page.page_size(), 20);

        let fields = Pagination::schema().validate(&RawInput::new()).unwrap();
        assert_eq!(
            fields.to_json(),
            serde_json::json!({ "pageIndex": 0, "pageSize": 20 })
        );
    }

    #[test]
    fn pagination_coerces_query_strings() {
        let page = Pagination::validate(&string_input([("pageIndex", "3"), ("pageSize", "50")])).unwrap();
        assert_eq!(*page.page_index(), 3);
        assert_eq!(page.offset(), 150);
        assert_eq!(page.limit(), 50);
    }

    #[test]
    fn pagination_has_no_upper_bound() {
        let page = Pagination::validate(&string_input([("pageSize", "1000000")])).unwrap();
        assert_eq!(*page.page_size(), 1_000_000);
    }

    #[test]
    fn pagination_reports_both_bad_fields() {
        let errors =
            Pagination::validate(&string_input([("pageIndex", "first"), ("pageSize", "2.5")])).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_path("pageIndex").unwrap().reason, ErrorReason::TypeMismatch);
        assert_eq!(errors.for_path("pageSize").unwrap().reason, ErrorReason::ConstraintViolation);
    }

    #[test]
    fn negative_pagination_clamps() {
        let page = Pagination::validate(&string_input([("pageIndex", "-2"), ("pageSize", "-1")])).unwrap();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 0);
    }

    #[test]
    fn date_range_is_optional_on_both_ends() {
        let range = DateRange::validate(&RawInput::new()).unwrap();
        assert!(range.from().is_none());
        assert!(range.to().is_none());
        assert!(range.contains(&Utc::now()));
    }

    #[test]
    fn date_range_does_not_enforce_ordering() {
        let range = DateRange::validate(&string_input([("from", "2026-02-01"), ("to", "2026-01-01")])).unwrap();
        assert!(range.from().unwrap() > range.to().unwrap());
        let mid = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        assert!(!range.contains(&mid));
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let range = DateRange::validate(&string_input([("from", "2026-01-01"), ("to", "2026-01-31")])).unwrap();
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap();
        assert!(range.contains(&start));
        assert!(range.contains(&end));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn date_range_rejects_malformed_dates() {
        let errors = DateRange::validate(&string_input([("from", "last week"), ("to", "2026-13-01")])).unwrap_err();
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["from", "to"]);
    }

    #[test]
    fn contracts_combine_over_one_query_string() {
        let raw = string_input([("pageSize", "10"), ("from", "2026-01-01"), ("q", "ignored")]);
        let (page, range) = <(Pagination, DateRange)>::validate(&raw).unwrap();
        assert_eq!(page.limit(), 10);
        assert!(range.from().is_some());
    }

    #[test]
    fn contracts_nest_as_sub_fields() {
        let schema = crate::Schema::builder()
            .field("page", field::record::<Pagination>())
            .field("range", field::record::<DateRange>().optional())
            .build();
        let raw: RawInput = serde_json::from_value(serde_json::json!({ "page": {} })).unwrap();
        let fields = schema.validate(&raw).unwrap();
        assert_eq!(fields.get_record("page").unwrap().get_number("pageSize"), Some(20.0));
        assert!(!fields.contains("range"));
    }
}
