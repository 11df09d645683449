use crate::priority::matches_any;
use crate::{Trend, TrendIndicator};

struct MarkerFamily {
    key: &'static str,
    aliases: &'static [&'static str],
    /// Reading of an upward trend; a downward trend reads the other way.
    rising: TrendIndicator,
}

// More specific families first: "hdl cholesterol" must resolve before "cholesterol".
const MARKER_FAMILIES: &[MarkerFamily] = &[
    MarkerFamily {
        key: "testosterone",
        aliases: &[
            "testosterone",
            "total testosterone",
            "testosterone, total",
            "free testosterone",
            "testosterone, free",
            "total t",
            "free t",
        ],
        rising: TrendIndicator::Positive,
    },
    MarkerFamily {
        key: "estradiol",
        aliases: &["estradiol", "oestradiol", "e2", "estradiol, sensitive"],
        rising: TrendIndicator::Risk,
    },
    MarkerFamily {
        key: "prolactin",
        aliases: &["prolactin", "prl"],
        rising: TrendIndicator::Risk,
    },
    MarkerFamily {
        key: "ldl",
        aliases: &["ldl", "ldl-c", "ldl cholesterol", "ldl cholesterol calc"],
        rising: TrendIndicator::Risk,
    },
    MarkerFamily {
        key: "hdl",
        aliases: &["hdl", "hdl-c", "hdl cholesterol"],
        rising: TrendIndicator::Positive,
    },
    MarkerFamily {
        key: "triglycerides",
        aliases: &["triglycerides", "triglyceride", "tg"],
        rising: TrendIndicator::Risk,
    },
    MarkerFamily {
        key: "total_cholesterol",
        aliases: &["total cholesterol", "cholesterol", "cholesterol, total"],
        rising: TrendIndicator::Risk,
    },
    MarkerFamily {
        key: "alt",
        aliases: &["alt", "sgpt", "alt (sgpt)", "alanine aminotransferase"],
        rising: TrendIndicator::Risk,
    },
    MarkerFamily {
        key: "ast",
        aliases: &["ast", "sgot", "ast (sgot)", "aspartate aminotransferase"],
        rising: TrendIndicator::Risk,
    },
    MarkerFamily {
        key: "crp",
        aliases: &["crp", "hs-crp", "hscrp", "c-reactive protein", "c reactive protein"],
        rising: TrendIndicator::Risk,
    },
    MarkerFamily {
        key: "hematocrit",
        aliases: &["hematocrit", "haematocrit", "hct"],
        rising: TrendIndicator::Risk,
    },
    MarkerFamily {
        key: "psa",
        aliases: &["psa", "psa, total", "prostate specific antigen", "prostate-specific antigen"],
        rising: TrendIndicator::Risk,
    },
];

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn exact_family(name: &str) -> Option<&'static MarkerFamily> {
    let normalized = normalize(name);
    MARKER_FAMILIES
        .iter()
        .find(|family| family.aliases.iter().any(|alias| *alias == normalized))
}

/// Canonical family key for a marker name, matched exactly against a synonym table.
///
/// Stricter than the priority list: `"Total T"` resolves to `testosterone`, `"Cobalt"`
/// resolves to nothing.
pub fn canonical_marker(name: &str) -> Option<&'static str> {
    exact_family(name).map(|family| family.key)
}

/// Semantic reading of a marker's trend, for badge colouring.
///
/// `stable` is always neutral. Unknown markers are neutral whatever their direction.
pub fn trend_indicator(marker: &str, trend: Trend) -> TrendIndicator {
    let rising = match trend {
        Trend::Stable => return TrendIndicator::Neutral,
        Trend::Up | Trend::Down => exact_family(marker)
            .or_else(|| {
                MARKER_FAMILIES
                    .iter()
                    .find(|family| matches_any(marker, family.aliases.iter().copied()))
            })
            .map(|family| family.rising),
    };

    match (rising, trend) {
        (Some(reading), Trend::Up) => reading,
        (Some(reading), Trend::Down) => reading.inverse(),
        _ => TrendIndicator::Neutral,
    }
}
