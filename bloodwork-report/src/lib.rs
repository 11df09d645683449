//! Bloodwork report payloads to `BloodworkSnapshot`: marker extraction, per-marker series
//! and the priority split used for charting.

use bloodwork_core::{
    split_by_priority, BloodworkError, BloodworkSnapshot, PipelineConfig, ReportMarkers,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod flags;
mod payload;
mod prompt;
mod series;

pub use flags::flagged_markers;
pub use payload::{extract_markers_from_report, PayloadShape};
pub use prompt::{render_prompt_summary, summarize_series};
pub use series::{aggregate_marker_series, aggregate_marker_series_with, compute_trend};

/// One stored lab report, as handed over by the report store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(alias = "reportId", alias = "report_id")]
    pub id: String,
    #[serde(alias = "report_date", alias = "date")]
    pub report_date: String,
    #[serde(default, alias = "raw_payload", alias = "raw")]
    pub raw_payload: Value,
}

impl Report {
    /// Calendar date of the report, if `report_date` is a date or a timestamp.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let raw = self.report_date.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
            .or_else(|| {
                DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z")
                    .ok()
                    .map(|dt| dt.date_naive())
            })
            .or_else(|| {
                ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                    .map(|dt| dt.date())
            })
    }

    /// Zero-padded `YYYY-MM-DD` form of the report date, or the trimmed raw text when it is
    /// not a recognisable date.
    pub fn normalized_date(&self) -> String {
        match self.calendar_date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => self.report_date.trim().to_string(),
        }
    }

    /// Marker readings of this report, keyed by its normalized date.
    pub fn extract(&self) -> ReportMarkers {
        extract_markers_from_report(&self.raw_payload, &self.id, &self.normalized_date())
    }
}

/// Order reports by normalized date. The sort is stable, so same-day reports keep their order.
pub fn sort_reports_by_date(reports: &mut [Report]) {
    reports.sort_by_cached_key(Report::normalized_date);
}

/// Summarize reports held in a JSON string.
pub fn summarize_reports_str(
    reports_json: &str,
    config: &PipelineConfig,
) -> Result<BloodworkSnapshot, BloodworkError> {
    let value: Value =
        serde_json::from_str(reports_json).map_err(|err| BloodworkError::Parse(err.to_string()))?;
    summarize_reports_value(&value, config)
}

/// Summarize reports from a JSON array, or from an object with a `reports` array.
pub fn summarize_reports_value(
    value: &Value,
    config: &PipelineConfig,
) -> Result<BloodworkSnapshot, BloodworkError> {
    let entries = match value {
        Value::Array(_) => value,
        Value::Object(object) => object.get("reports").ok_or(BloodworkError::MissingData)?,
        other => {
            return Err(BloodworkError::Parse(format!(
                "Expected an array of reports, received {}",
                json_kind(other)
            )))
        }
    };

    let reports = Vec::<Report>::deserialize(entries)
        .map_err(|err| BloodworkError::Parse(err.to_string()))?;

    Ok(summarize_reports(&reports, config))
}

/// Run the full pipeline: extract every report, fold into series, flag from the latest
/// report and split by priority.
pub fn summarize_reports(reports: &[Report], config: &PipelineConfig) -> BloodworkSnapshot {
    let mut ordered: Vec<&Report> = reports.iter().collect();
    ordered.sort_by_cached_key(|report| report.normalized_date());

    for report in &ordered {
        if report.calendar_date().is_none() {
            tracing::warn!(
                report_id = %report.id,
                report_date = %report.report_date,
                "Report date is not an ISO calendar date; ordering falls back to raw text"
            );
        }
    }

    let extracted: Vec<ReportMarkers> = ordered.iter().map(|report| report.extract()).collect();
    let series = aggregate_marker_series_with(&extracted, config.trend_tolerance);

    let flagged = ordered
        .last()
        .map(|latest| flagged_markers(&latest.raw_payload))
        .unwrap_or_default();

    let summaries = series.iter().map(summarize_series).collect();
    let split = split_by_priority(series, &flagged, config);

    tracing::debug!(
        report_count = reports.len(),
        prioritized = split.prioritized.len(),
        other = split.other.len(),
        flagged = flagged.len(),
        "Summarized bloodwork reports"
    );

    BloodworkSnapshot::new(split, flagged, summaries)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
