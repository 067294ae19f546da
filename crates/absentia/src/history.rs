//! Per-district rate history derivation.
//!
//! Turns one selected [`DistrictRecord`] into the two presentations of its
//! multi-year history: a chronological chart series and a newest-first
//! table. Derivation is pure, so rendering the same record twice yields
//! the same output both times.

use serde::Serialize;

use crate::dataset::{DistrictRecord, NA_SENTINEL, YEAR_PERIODS};

/// Series label for the charted metric.
pub const SERIES_LABEL: &str = "Chronic Absenteeism Rate (%)";

/// One table row of a district's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    /// Human-readable period name.
    pub period: &'static str,
    /// Display value: the raw rate suffixed with `%`, or `N/A`.
    pub value: String,
}

/// The derived history view of one district.
///
/// Chart fields run oldest-first so the x-axis reads chronologically left
/// to right; table rows run newest-first. Both orders are views of the
/// same fixed period list, so the chart label order is the exact reverse
/// of the table row label order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateHistory {
    /// District name, shown as the detail title.
    pub district: String,
    /// Chart x-axis labels, oldest first.
    pub chart_labels: Vec<&'static str>,
    /// Chart values, oldest first. `None` renders as a gap in the line.
    pub series: Vec<Option<f64>>,
    /// Table rows, newest first.
    pub rows: Vec<HistoryRow>,
}

/// Check whether a raw value means "no data for this period".
#[must_use]
pub fn is_missing(raw: &str) -> bool {
    raw == NA_SENTINEL || raw.is_empty()
}

/// Chart value for a raw rate string.
///
/// Missing values chart as `None`; so does a malformed non-numeric value
/// (there is nothing meaningful to plot).
#[must_use]
pub fn chart_value(raw: &str) -> Option<f64> {
    if is_missing(raw) {
        return None;
    }
    raw.parse().ok()
}

/// Table display value for a raw rate string.
#[must_use]
pub fn display_value(raw: &str) -> String {
    if is_missing(raw) {
        "N/A".to_string()
    } else {
        format!("{raw}%")
    }
}

impl RateHistory {
    /// Derive the history view of one record.
    #[must_use]
    pub fn derive(record: &DistrictRecord) -> Self {
        let chart_labels = YEAR_PERIODS.iter().rev().map(|p| p.label).collect();
        let series = record
            .rates()
            .iter()
            .rev()
            .map(|raw| chart_value(raw))
            .collect();
        let rows = YEAR_PERIODS
            .iter()
            .zip(record.rates())
            .map(|(period, raw)| HistoryRow {
                period: period.label,
                value: display_value(raw),
            })
            .collect();

        Self {
            district: record.name.clone(),
            chart_labels,
            series,
            rows,
        }
    }

    /// Split the series into contiguous runs of plottable points.
    ///
    /// Each run becomes its own line segment, so a missing period shows as
    /// a gap rather than a line drawn across it. Points are `(index, rate)`
    /// with the index matching the chronological label position.
    #[must_use]
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (i, value) in self.series.iter().enumerate() {
            match value {
                #[allow(clippy::cast_precision_loss)]
                Some(rate) => current.push((i as f64, *rate)),
                None => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Largest plottable rate, for sizing the y-axis. Zero when every
    /// period is missing.
    #[must_use]
    pub fn max_rate(&self) -> f64 {
        self.series.iter().flatten().fold(0.0_f64, |a, b| a.max(*b))
    }
}
