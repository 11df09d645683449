//! Folding per-report markers into per-marker time series.

use std::collections::BTreeMap;

use bloodwork_core::{DataPoint, MarkerSeries, ReportMarkers, Trend, DEFAULT_TREND_TOLERANCE};

/// Group readings by exact marker name into date-sorted series, using the default tolerance.
pub fn aggregate_marker_series(reports: &[ReportMarkers]) -> Vec<MarkerSeries> {
    aggregate_marker_series_with(reports, DEFAULT_TREND_TOLERANCE)
}

/// Group readings by exact marker name into date-sorted series.
///
/// Names are case-sensitive and not alias-resolved. When two reports share a date for the
/// same marker, the one later in `reports` wins. Output is alphabetical by marker.
pub fn aggregate_marker_series_with(
    reports: &[ReportMarkers],
    trend_tolerance: f64,
) -> Vec<MarkerSeries> {
    let mut accumulators: BTreeMap<String, Vec<DataPoint>> = BTreeMap::new();

    for report in reports {
        for reading in &report.markers {
            let marker = reading.marker.trim();
            if marker.is_empty() {
                continue;
            }

            let points = accumulators.entry(marker.to_string()).or_default();
            points.retain(|point| point.date != report.report_date);
            points.push(DataPoint {
                date: report.report_date.clone(),
                value: reading.value.clone(),
                numeric_value: reading.numeric_value,
            });
        }
    }

    accumulators
        .into_iter()
        .filter(|(_, points)| !points.is_empty())
        .map(|(marker, mut points)| {
            // Lexicographic order is chronological for zero-padded ISO dates.
            points.sort_by(|a, b| a.date.cmp(&b.date));
            let trend = compute_trend(&points, trend_tolerance);
            MarkerSeries {
                marker,
                data_points: points,
                trend,
            }
        })
        .collect()
}

/// Two-point trend: compares only the first and last points.
///
/// Stable unless there are at least two points, both endpoints are numeric and they differ
/// by more than `tolerance`.
pub fn compute_trend(points: &[DataPoint], tolerance: f64) -> Trend {
    if points.len() < 2 {
        return Trend::Stable;
    }

    let first = points.first().and_then(|point| point.numeric_value);
    let last = points.last().and_then(|point| point.numeric_value);
    let (Some(first), Some(last)) = (first, last) else {
        return Trend::Stable;
    };

    let diff = last - first;
    if diff.abs() <= tolerance {
        Trend::Stable
    } else if diff > 0.0 {
        Trend::Up
    } else {
        Trend::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloodwork_core::MarkerValue;

    fn report(id: &str, date: &str, readings: &[(&str, &str)]) -> ReportMarkers {
        ReportMarkers {
            report_id: id.to_string(),
            report_date: date.to_string(),
            markers: readings
                .iter()
                .filter_map(|(marker, value)| MarkerValue::from_text(marker, value))
                .collect(),
        }
    }

    fn point(date: &str, value: Option<f64>) -> DataPoint {
        DataPoint {
            date: date.to_string(),
            value: value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string()),
            numeric_value: value,
        }
    }

    #[test]
    fn groups_by_exact_name_and_sorts_alphabetically() {
        let series = aggregate_marker_series(&[
            report("r1", "2024-01-01", &[("Testosterone", "450"), ("LDL", "120")]),
            report("r2", "2024-02-01", &[("testosterone", "500")]),
        ]);
        let names: Vec<_> = series.iter().map(|s| s.marker.as_str()).collect();
        assert_eq!(names, vec!["LDL", "Testosterone", "testosterone"]);
    }

    #[test]
    fn later_report_wins_on_same_date() {
        let series = aggregate_marker_series(&[
            report("r1", "2024-01-01", &[("LDL", "120 mg/dL")]),
            report("r2", "2024-01-01", &[("LDL", "98 mg/dL")]),
        ]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].data_points.len(), 1);
        assert_eq!(series[0].data_points[0].value, "98 mg/dL");
    }

    #[test]
    fn points_are_sorted_by_date_regardless_of_input_order() {
        let series = aggregate_marker_series(&[
            report("r3", "2024-06-01", &[("CRP", "1.1")]),
            report("r1", "2023-12-15", &[("CRP", "3.4")]),
            report("r2", "2024-02-10", &[("CRP", "2.0")]),
        ]);
        let dates: Vec<_> = series[0].data_points.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2023-12-15", "2024-02-10", "2024-06-01"]);
        assert_eq!(series[0].trend, Trend::Down);
    }

    #[test]
    fn trend_boundaries() {
        let stable = [point("2024-01-01", Some(100.0)), point("2024-02-01", Some(100.005))];
        let up = [point("2024-01-01", Some(100.0)), point("2024-02-01", Some(100.02))];
        let down = [point("2024-01-01", Some(100.0)), point("2024-02-01", Some(99.0))];
        assert_eq!(compute_trend(&stable, DEFAULT_TREND_TOLERANCE), Trend::Stable);
        assert_eq!(compute_trend(&up, DEFAULT_TREND_TOLERANCE), Trend::Up);
        assert_eq!(compute_trend(&down, DEFAULT_TREND_TOLERANCE), Trend::Down);
        assert_eq!(
            compute_trend(&[point("2024-01-01", Some(5.0))], DEFAULT_TREND_TOLERANCE),
            Trend::Stable
        );
        assert_eq!(compute_trend(&[], DEFAULT_TREND_TOLERANCE), Trend::Stable);
    }

    #[test]
    fn trend_ignores_intermediate_points() {
        let points = [
            point("2024-01-01", Some(100.0)),
            point("2024-02-01", Some(300.0)),
            point("2024-03-01", Some(100.0)),
        ];
        assert_eq!(compute_trend(&points, DEFAULT_TREND_TOLERANCE), Trend::Stable);
    }

    #[test]
    fn non_numeric_endpoint_is_stable() {
        let points = [
            point("2024-01-01", None),
            point("2024-02-01", Some(10.0)),
            point("2024-03-01", Some(50.0)),
        ];
        assert_eq!(compute_trend(&points, DEFAULT_TREND_TOLERANCE), Trend::Stable);
    }

    #[test]
    fn custom_tolerance_widens_the_stable_band() {
        let series = aggregate_marker_series_with(
            &[
                report("r1", "2024-01-01", &[("Hematocrit", "45%")]),
                report("r2", "2024-02-01", &[("Hematocrit", "46%")]),
            ],
            2.0,
        );
        assert_eq!(series[0].trend, Trend::Stable);
    }

    #[test]
    fn empty_input_gives_no_series() {
        assert!(aggregate_marker_series(&[]).is_empty());
    }
}
