//! Raw report payloads: shape detection and marker extraction.

use bloodwork_core::{MarkerValue, ReportMarkers};
use serde_json::{Map, Value};

/// Field holding the per-marker analysis array, camelCase spelling first.
pub(crate) const ANALYSIS_FIELDS: [&str; 2] = ["markerAnalysis", "marker_analysis"];

/// Top-level sections of a key-value payload that are report metadata, not markers.
const NON_MARKER_KEYS: [&str; 11] = [
    "summary",
    "overallSummary",
    "overall_summary",
    "analysis",
    "markerAnalysis",
    "marker_analysis",
    "flags",
    "flaggedMarkers",
    "flagged_markers",
    "projections",
    "recommendations",
];

/// The layouts a stored report payload can take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// `{"markerAnalysis": [{"marker": .., "value": ..}, ..]}`
    Analysis(&'a [Value]),
    /// `{"Total Testosterone": "450 ng/dL", "LDL": {"value": "98 mg/dL"}, ..}`
    KeyValue(&'a Map<String, Value>),
    Unrecognized,
}

impl<'a> PayloadShape<'a> {
    /// Decide the layout once. An analysis array wins over any other top-level keys.
    pub fn detect(raw: &'a Value) -> Self {
        let Some(object) = raw.as_object() else {
            return PayloadShape::Unrecognized;
        };

        if let Some(items) = analysis_array(object) {
            return PayloadShape::Analysis(items);
        }

        PayloadShape::KeyValue(object)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PayloadShape::Analysis(_) => "analysis",
            PayloadShape::KeyValue(_) => "key_value",
            PayloadShape::Unrecognized => "unrecognized",
        }
    }

    /// Flatten the payload into marker readings, in source order.
    pub fn markers(&self) -> Vec<MarkerValue> {
        match self {
            PayloadShape::Analysis(items) => extract_analysis(items),
            PayloadShape::KeyValue(object) => extract_key_value(object),
            PayloadShape::Unrecognized => Vec::new(),
        }
    }
}

pub(crate) fn analysis_array(object: &Map<String, Value>) -> Option<&[Value]> {
    ANALYSIS_FIELDS
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_array))
        .map(Vec::as_slice)
}

/// Extract the marker readings of one report.
///
/// Never fails: a missing or malformed payload yields fewer (or zero) markers.
pub fn extract_markers_from_report(
    raw_payload: &Value,
    report_id: &str,
    report_date: &str,
) -> ReportMarkers {
    let shape = PayloadShape::detect(raw_payload);
    let markers = shape.markers();

    if matches!(shape, PayloadShape::Unrecognized) && !raw_payload.is_null() {
        tracing::warn!(
            report_id = %report_id,
            "Report payload is not an object; no markers extracted"
        );
    }

    tracing::debug!(
        report_id = %report_id,
        report_date = %report_date,
        shape = shape.name(),
        marker_count = markers.len(),
        "Extracted report markers"
    );

    ReportMarkers {
        report_id: report_id.to_string(),
        report_date: report_date.to_string(),
        markers,
    }
}

fn extract_analysis(items: &[Value]) -> Vec<MarkerValue> {
    items
        .iter()
        .filter_map(|item| {
            let marker = item.get("marker").and_then(scalar_text)?;
            let value = item.get("value").and_then(scalar_text)?;
            MarkerValue::from_text(&marker, &value)
        })
        .collect()
}

fn extract_key_value(object: &Map<String, Value>) -> Vec<MarkerValue> {
    object
        .iter()
        .filter(|(key, _)| !NON_MARKER_KEYS.contains(&key.as_str()))
        .filter_map(|(key, entry)| {
            let display = match entry {
                Value::String(text) => text.clone(),
                Value::Object(nested) => nested.get("value").and_then(scalar_text)?,
                _ => return None,
            };
            MarkerValue::from_text(key, &display)
        })
        .collect()
}

/// Text of a scalar JSON value; `null`, arrays and objects have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
