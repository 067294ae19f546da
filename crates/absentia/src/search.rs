//! Case-insensitive substring search over district records.
//!
//! The filter is pure and stateless: it is re-run in full on every query
//! change against the loaded snapshot. Ranking, fuzzy matching, and
//! multi-field search are out of scope.

use crate::dataset::DistrictRecord;

/// Minimum normalized query length before a search is attempted.
///
/// Queries shorter than this are suppressed by the caller entirely; the
/// results view stays hidden. This is a UX threshold, not a filter error.
pub const MIN_QUERY_LEN: usize = 2;

/// Placeholder row shown when a search matches nothing.
pub const NO_MATCH_PLACEHOLDER: &str = "No districts found.";

/// Normalize a query for matching: trim surrounding whitespace, lowercase.
#[must_use]
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Check whether a query is long enough to search with.
#[must_use]
pub fn is_searchable(query: &str) -> bool {
    normalize(query).chars().count() >= MIN_QUERY_LEN
}

/// Return every record whose name contains the query, case-insensitively.
///
/// Relative order of `records` is preserved. An empty result is a valid,
/// non-error outcome. The [`MIN_QUERY_LEN`] gate is the caller's job; this
/// function filters whatever it is given.
#[must_use]
pub fn search<'a>(records: &'a [DistrictRecord], query: &str) -> Vec<&'a DistrictRecord> {
    let needle = normalize(query);
    records
        .iter()
        .filter(|record| record.name.to_lowercase().contains(&needle))
        .collect()
}
