//! Series digests fed to the analysis prompt.

use std::fmt::Write;

use bloodwork_core::{HistoryEntry, MarkerSeries, SeriesSummary};

pub fn summarize_series(series: &MarkerSeries) -> SeriesSummary {
    SeriesSummary {
        marker: series.marker.clone(),
        trend: series.trend,
        points: series.data_points.len(),
        latest: series.latest().map(|point| point.value.clone()),
        history: series
            .data_points
            .iter()
            .map(|point| HistoryEntry {
                date: point.date.clone(),
                value: point.value.clone(),
            })
            .collect(),
    }
}

/// Plain-text block per series, in the given order.
pub fn render_prompt_summary(series: &[MarkerSeries]) -> String {
    let mut out = String::new();
    for summary in series.iter().map(summarize_series) {
        let _ = writeln!(
            out,
            "{} (trend: {}, {} points): latest {}",
            summary.marker,
            summary.trend,
            summary.points,
            summary.latest.as_deref().unwrap_or("n/a")
        );
        for entry in &summary.history {
            let _ = writeln!(out, "  - {}: {}", entry.date, entry.value);
        }
    }
    out
}
