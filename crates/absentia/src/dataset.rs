//! Dataset loading and record types.
//!
//! This module owns the source-of-truth data model: the fixed list of
//! reporting periods, the per-district record shape, and the loader that
//! turns the delimited source file into an immutable in-memory snapshot.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Column holding the district display/search name.
pub const NAME_COLUMN: &str = "clean_name";

/// Literal marker in source data meaning a value is not available.
pub const NA_SENTINEL: &str = "NA";

/// One reporting period of the source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearPeriod {
    /// Source column name for this period.
    pub key: &'static str,
    /// Human-readable period name.
    pub label: &'static str,
}

/// Known reporting periods, newest to oldest.
///
/// Fixed at compile time and never mutated. Table rows follow this order;
/// chart rendering uses the reversed (chronological) view.
pub const YEAR_PERIODS: [YearPeriod; 6] = [
    YearPeriod {
        key: "20242025",
        label: "2024-2025",
    },
    YearPeriod {
        key: "20232024",
        label: "2023-2024",
    },
    YearPeriod {
        key: "20222023",
        label: "2022-2023",
    },
    YearPeriod {
        key: "20212022",
        label: "2021-2022",
    },
    YearPeriod {
        key: "20202021",
        label: "2020-2021",
    },
    YearPeriod {
        key: "20192020",
        label: "2019-2020",
    },
];

/// One row of the source dataset.
///
/// Rates are raw strings exactly as read from the source; numeric
/// interpretation is deferred to the history derivation. Names are not
/// guaranteed unique; duplicates are distinct records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictRecord {
    /// District display/search name.
    pub name: String,
    /// Raw rate strings, aligned with [`YEAR_PERIODS`] (newest first).
    rates: Vec<String>,
}

impl DistrictRecord {
    /// Create a record from a name and per-period raw values.
    ///
    /// `rates` must be aligned with [`YEAR_PERIODS`].
    #[must_use]
    pub fn new(name: impl Into<String>, rates: Vec<String>) -> Self {
        debug_assert_eq!(rates.len(), YEAR_PERIODS.len());
        Self {
            name: name.into(),
            rates,
        }
    }

    /// Get the raw value for a period by its source key.
    ///
    /// Returns `None` only for keys outside [`YEAR_PERIODS`].
    #[must_use]
    pub fn rate(&self, key: &str) -> Option<&str> {
        YEAR_PERIODS
            .iter()
            .position(|p| p.key == key)
            .map(|i| self.rates[i].as_str())
    }

    /// Raw values aligned with [`YEAR_PERIODS`] (newest first).
    #[must_use]
    pub fn rates(&self) -> &[String] {
        &self.rates
    }
}

/// An immutable snapshot of all district records.
///
/// Created once on successful load and read-only thereafter; no record is
/// added, removed, or edited for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<DistrictRecord>,
}

impl Dataset {
    /// Load and parse the dataset from a file.
    ///
    /// Runs exactly once per session, at startup. Suspends during the read
    /// so the rest of the system stays interactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. No retry is
    /// attempted.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::dataset_read(path, source))?;
        let dataset = Self::parse(&text)?;
        debug!("loaded {} districts from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Parse dataset text into records.
    ///
    /// The first row is a header naming fields. Every subsequent non-empty
    /// row becomes one record; values are kept as raw strings. Rows without
    /// a district name are skipped. A year column absent from the header
    /// yields the empty string (treated as missing) for every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the header lacks the name column or a row is
    /// malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let name_idx = headers
            .iter()
            .position(|h| h == NAME_COLUMN)
            .ok_or_else(|| Error::missing_column(NAME_COLUMN))?;
        let year_indices: Vec<Option<usize>> = YEAR_PERIODS
            .iter()
            .map(|period| headers.iter().position(|h| h == period.key))
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let name = row.get(name_idx).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let rates = year_indices
                .iter()
                .map(|idx| idx.and_then(|i| row.get(i)).unwrap_or_default().to_string())
                .collect();
            records.push(DistrictRecord::new(name, rates));
        }

        Ok(Self { records })
    }

    /// All records in source order.
    #[must_use]
    pub fn records(&self) -> &[DistrictRecord] {
        &self.records
    }

    /// Number of records in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
clean_name,20242025,20232024,20222023,20212022,20202021,20192020
Lakeview USD,12.5,14.1,15.0,18.2,NA,NA
Riverside ESD,8.3,9.0,,10.1,11.4,9.9
Harbor City USD,22.0,24.5,26.1,30.3,28.7,25.2
";

    #[test]
    fn test_year_periods_newest_first() {
        assert_eq!(YEAR_PERIODS[0].key, "20242025");
        assert_eq!(YEAR_PERIODS[0].label, "2024-2025");
        assert_eq!(YEAR_PERIODS[5].key, "20192020");
        assert_eq!(YEAR_PERIODS[5].label, "2019-2020");
    }

    #[test]
    fn test_parse_sample() {
        let dataset = Dataset::parse(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[0].name, "Lakeview USD");
        assert_eq!(dataset.records()[2].name, "Harbor City USD");
    }

    #[test]
    fn test_parse_preserves_raw_values() {
        let dataset = Dataset::parse(SAMPLE).unwrap();
        let lakeview = &dataset.records()[0];
        assert_eq!(lakeview.rate("20242025"), Some("12.5"));
        assert_eq!(lakeview.rate("20192020"), Some("NA"));

        let riverside = &dataset.records()[1];
        assert_eq!(riverside.rate("20222023"), Some(""));
    }

    #[test]
    fn test_rate_unknown_key() {
        let dataset = Dataset::parse(SAMPLE).unwrap();
        assert_eq!(dataset.records()[0].rate("20182019"), None);
    }

    #[test]
    fn test_parse_missing_name_column() {
        let text = "district,20242025\nLakeview USD,12.5\n";
        let err = Dataset::parse(text).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { .. }));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_parse_missing_year_column_yields_empty() {
        let text = "clean_name,20242025\nLakeview USD,12.5\n";
        let dataset = Dataset::parse(text).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.rate("20242025"), Some("12.5"));
        // Absent columns read as empty strings, i.e. missing data.
        assert_eq!(record.rate("20232024"), Some(""));
        assert_eq!(record.rate("20192020"), Some(""));
    }

    #[test]
    fn test_parse_skips_unnamed_rows() {
        let text = "\
clean_name,20242025,20232024,20222023,20212022,20202021,20192020
,1.0,2.0,3.0,4.0,5.0,6.0
Lakeview USD,12.5,14.1,15.0,18.2,NA,NA
";
        let dataset = Dataset::parse(text).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].name, "Lakeview USD");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\
clean_name,20242025,20232024,20222023,20212022,20202021,20192020

Lakeview USD,12.5,14.1,15.0,18.2,NA,NA

";
        let dataset = Dataset::parse(text).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_parse_header_only() {
        let text = "clean_name,20242025,20232024,20222023,20212022,20202021,20192020\n";
        let dataset = Dataset::parse(text).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_parse_keeps_source_order() {
        let dataset = Dataset::parse(SAMPLE).unwrap();
        let names: Vec<&str> = dataset.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Lakeview USD", "Riverside ESD", "Harbor City USD"]
        );
    }

    #[test]
    fn test_parse_duplicate_names_stay_distinct() {
        let text = "\
clean_name,20242025,20232024,20222023,20212022,20202021,20192020
Lakeview USD,12.5,14.1,15.0,18.2,NA,NA
Lakeview USD,1.0,2.0,3.0,4.0,5.0,6.0
";
        let dataset = Dataset::parse(text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_ne!(dataset.records()[0], dataset.records()[1]);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = Dataset::load("/nonexistent/district_data.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DatasetRead { .. }));
        assert!(err.is_load_error());
    }
}
