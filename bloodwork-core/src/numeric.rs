use std::sync::LazyLock;

use regex::Regex;

static NON_NUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]+").expect("valid non-numeric pattern"));

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+(?:\.[0-9]+)?").expect("valid numeric pattern"));

/// Pull the first number out of a lab value such as `"450 ng/dL"`.
///
/// Every run of characters other than digits, `.` and `-` becomes a single space so that
/// adjacent numbers never merge (`"10mg5ml"` reads as `10`). Only the first token counts.
pub fn parse_numeric_value(raw: &str) -> Option<f64> {
    let cleaned = NON_NUMERIC_RUN.replace_all(raw, " ");
    let token = NUMERIC_TOKEN.find(cleaned.trim())?;
    token
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
