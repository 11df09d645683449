//! WASM <-> JavaScript bridge for the bloodwork pipeline, framework neutral.

use bloodwork_core::{BloodworkError, PipelineConfig};
use bloodwork_report::{aggregate_marker_series_with, Report};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsPipelineConfig {
    #[serde(default, alias = "trendTolerance")]
    trend_tolerance: Option<f64>,
    #[serde(default, alias = "priorityMarkers")]
    priority_markers: Option<Vec<String>>,
}

impl From<JsPipelineConfig> for PipelineConfig {
    fn from(cfg: JsPipelineConfig) -> Self {
        let mut base = PipelineConfig::default();
        if let Some(tolerance) = cfg.trend_tolerance {
            base.trend_tolerance = tolerance;
        }
        if let Some(markers) = cfg.priority_markers {
            base.priority_markers = markers;
        }
        base
    }
}

/// Run the whole pipeline over reports already fetched by the page.
#[wasm_bindgen]
pub fn summarize_reports(reports: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let reports_value = from_value::<serde_json::Value>(reports)
        .map_err(|err| JsValue::from_str(&format!("Could not read reports JSON: {err}")))?;

    let cfg = read_config(config)?;

    let snapshot = bloodwork_report::summarize_reports_value(&reports_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_bloodwork_error(err)))?;

    to_value(&snapshot)
        .map_err(|err| JsValue::from_str(&format!("Could not serialize snapshot: {err}")))
}

/// Only the aggregated series, for chart views that do their own grouping.
#[wasm_bindgen]
pub fn extract_series(reports: JsValue) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let mut reports: Vec<Report> = from_value(reports)
        .map_err(|err| JsValue::from_str(&format!("Could not read reports: {err}")))?;
    bloodwork_report::sort_reports_by_date(&mut reports);

    let extracted: Vec<_> = reports.iter().map(Report::extract).collect();
    let series = aggregate_marker_series_with(&extracted, PipelineConfig::default().trend_tolerance);

    to_value(&series).map_err(|err| JsValue::from_str(&format!("Could not serialize series: {err}")))
}

fn read_config(config: Option<JsValue>) -> Result<PipelineConfig, JsValue> {
    let cfg = match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsPipelineConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            PipelineConfig::from(cfg)
        }
        _ => PipelineConfig::default(),
    };

    cfg.validate()
        .map_err(|err| JsValue::from_str(&format_bloodwork_error(err)))?;
    Ok(cfg)
}

fn format_bloodwork_error(err: BloodworkError) -> String {
    format!("Bloodwork error: {err}")
}
