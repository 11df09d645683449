//! Core types for bloodwork marker series and the pure helpers that operate on them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod config;
mod indicator;
mod numeric;
mod priority;

pub use config::{PipelineConfig, DEFAULT_TREND_TOLERANCE};
pub use indicator::{canonical_marker, trend_indicator};
pub use numeric::parse_numeric_value;
pub use priority::{is_prioritized_marker, split_by_priority, DEFAULT_PRIORITY_MARKERS};

/// One marker reading extracted from a single report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkerValue {
    pub marker: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
}

impl MarkerValue {
    /// Builds a reading from raw text, trimming both sides and parsing the value.
    ///
    /// Returns `None` when either side is blank after trimming.
    pub fn from_text(marker: &str, value: &str) -> Option<Self> {
        let marker = marker.trim();
        let value = value.trim();
        if marker.is_empty() || value.is_empty() {
            return None;
        }

        Some(Self {
            marker: marker.to_string(),
            value: value.to_string(),
            numeric_value: parse_numeric_value(value),
        })
    }
}

/// All readings of one report, tagged with the report's id and date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportMarkers {
    pub report_id: String,
    pub report_date: String,
    pub markers: Vec<MarkerValue>,
}

/// A single dated point in a marker series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub date: String,
    /// Original display text, units included.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
}

/// Direction of a series, comparing its first and last numeric points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chronological values of one marker across every report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSeries {
    pub marker: String,
    pub data_points: Vec<DataPoint>,
    pub trend: Trend,
}

impl MarkerSeries {
    /// Most recent point, if any.
    pub fn latest(&self) -> Option<&DataPoint> {
        self.data_points.last()
    }

    /// Semantic colouring for the series' trend badge.
    pub fn indicator(&self) -> TrendIndicator {
        trend_indicator(&self.marker, self.trend)
    }
}

/// How a trend should be read for a given marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrendIndicator {
    Positive,
    Risk,
    Neutral,
}

impl TrendIndicator {
    /// The reading of the opposite movement.
    pub fn inverse(self) -> Self {
        match self {
            TrendIndicator::Positive => TrendIndicator::Risk,
            TrendIndicator::Risk => TrendIndicator::Positive,
            TrendIndicator::Neutral => TrendIndicator::Neutral,
        }
    }
}

/// Series split for rendering: charted markers and the raw list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PrioritySplit {
    pub prioritized: Vec<MarkerSeries>,
    pub other: Vec<MarkerSeries>,
}

/// Compact view of a series used when assembling the analysis prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub marker: String,
    pub trend: Trend,
    pub points: usize,
    pub latest: Option<String>,
    pub history: Vec<HistoryEntry>,
}

/// One dated display value in a series summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub date: String,
    pub value: String,
}

/// Final result of running the pipeline over a user's reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BloodworkSnapshot {
    pub generated_at: DateTime<Utc>,
    pub prioritized: Vec<MarkerSeries>,
    pub other: Vec<MarkerSeries>,
    pub flagged_markers: Vec<String>,
    pub summaries: Vec<SeriesSummary>,
}

impl BloodworkSnapshot {
    pub fn new(
        split: PrioritySplit,
        flagged_markers: Vec<String>,
        summaries: Vec<SeriesSummary>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            prioritized: split.prioritized,
            other: split.other,
            flagged_markers,
            summaries,
        }
    }

    /// Total number of series across both buckets.
    pub fn series_count(&self) -> usize {
        self.prioritized.len() + self.other.len()
    }
}

/// Errors raised while decoding pipeline input.
#[derive(Debug, thiserror::Error)]
pub enum BloodworkError {
    #[error("Input is missing required data")]
    MissingData,
    #[error("Could not read input: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Snapshot with no series (used by mocks and tests).
pub fn empty_snapshot() -> BloodworkSnapshot {
    BloodworkSnapshot::new(PrioritySplit::default(), Vec::new(), Vec::new())
}
