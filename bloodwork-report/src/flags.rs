//! Out-of-range markers reported by a report's own analysis.

use serde_json::Value;

use crate::payload::analysis_array;

const OUT_OF_RANGE_STATUSES: [&str; 2] = ["above_range", "below_range"];

/// Markers the payload's analysis array marks as above or below their reference range.
///
/// Duplicates are dropped and source order is kept. Payloads without an analysis array flag
/// nothing.
pub fn flagged_markers(raw_payload: &Value) -> Vec<String> {
    let Some(items) = raw_payload.as_object().and_then(analysis_array) else {
        return Vec::new();
    };

    let mut flagged: Vec<String> = Vec::new();
    for item in items {
        let Some(name) = item
            .get("marker")
            .or_else(|| item.get("name"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
        else {
            continue;
        };

        let out_of_range = item
            .get("status")
            .and_then(Value::as_str)
            .map(|status| {
                let status = status.trim().to_lowercase();
                OUT_OF_RANGE_STATUSES.contains(&status.as_str())
            })
            .unwrap_or(false);

        if out_of_range && !flagged.iter().any(|existing| existing == name) {
            flagged.push(name.to_string());
        }
    }

    flagged
}
