use crate::{MarkerSeries, PipelineConfig, PrioritySplit};

/// Marker names (with common synonyms) that always get a chart and a trend badge.
pub const DEFAULT_PRIORITY_MARKERS: [&str; 30] = [
    "testosterone",
    "total testosterone",
    "free testosterone",
    "estradiol",
    "oestradiol",
    "e2",
    "prolactin",
    "prl",
    "ldl",
    "ldl cholesterol",
    "hdl",
    "hdl cholesterol",
    "total cholesterol",
    "cholesterol",
    "triglycerides",
    "alt",
    "sgpt",
    "alanine aminotransferase",
    "ast",
    "sgot",
    "aspartate aminotransferase",
    "crp",
    "hs-crp",
    "c-reactive protein",
    "hematocrit",
    "haematocrit",
    "hct",
    "psa",
    "prostate specific antigen",
    "prostate-specific antigen",
];

/// Whether a marker matches the default priority list.
///
/// Matching is case-insensitive and loose: a name matches when either string contains the
/// other, so `"Total Testosterone"` and `"Testosterone"` both match. Short entries such as
/// `"alt"` can overmatch.
pub fn is_prioritized_marker(name: &str) -> bool {
    matches_any(name, DEFAULT_PRIORITY_MARKERS.iter().copied())
}

impl PipelineConfig {
    /// Same rule as [`is_prioritized_marker`], against the configured list.
    pub fn is_prioritized(&self, name: &str) -> bool {
        matches_any(name, self.priority_markers.iter().map(String::as_str))
    }
}

pub(crate) fn matches_any<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = name.trim().to_lowercase();
    candidates.into_iter().any(|candidate| {
        let candidate = candidate.trim().to_lowercase();
        needle.contains(&candidate) || candidate.contains(&needle)
    })
}

/// Partition series into charted (`prioritized`) and listed (`other`) buckets.
///
/// A series is prioritized when its marker matches the configured list or appears in
/// `flagged_markers` (case-insensitive). Input order is kept inside each bucket.
pub fn split_by_priority(
    series: Vec<MarkerSeries>,
    flagged_markers: &[String],
    config: &PipelineConfig,
) -> PrioritySplit {
    let flagged: Vec<String> = flagged_markers
        .iter()
        .map(|name| name.trim().to_lowercase())
        .collect();

    let (prioritized, other) = series.into_iter().partition(|item| {
        config.is_prioritized(&item.marker)
            || flagged.contains(&item.marker.trim().to_lowercase())
    });

    PrioritySplit { prioritized, other }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Trend;

    fn series(marker: &str) -> MarkerSeries {
        MarkerSeries {
            marker: marker.to_string(),
            data_points: Vec::new(),
            trend: Trend::Stable,
        }
    }

    #[test]
    fn matching_is_bidirectional_and_case_insensitive() {
        assert!(is_prioritized_marker("Total Testosterone"));
        assert!(is_prioritized_marker("TESTOSTERONE, FREE"));
        assert!(is_prioritized_marker("Testo"));
        assert!(is_prioritized_marker("  hs-CRP "));
    }

    #[test]
    fn unrelated_markers_are_not_prioritized() {
        assert!(!is_prioritized_marker("Ferritin"));
        assert!(!is_prioritized_marker("Vitamin D"));
    }

    #[test]
    fn short_entries_overmatch() {
        // "alt" is a substring of "Cobalt".
        assert!(is_prioritized_marker("Cobalt"));
    }

    #[test]
    fn flagged_markers_are_prioritized() {
        let input = vec![series("Ferritin"), series("LDL"), series("Vitamin D")];
        let split = split_by_priority(
            input,
            &["ferritin ".to_string()],
            &PipelineConfig::default(),
        );
        let prioritized: Vec<_> = split.prioritized.iter().map(|s| s.marker.as_str()).collect();
        let other: Vec<_> = split.other.iter().map(|s| s.marker.as_str()).collect();
        assert_eq!(prioritized, vec!["Ferritin", "LDL"]);
        assert_eq!(other, vec!["Vitamin D"]);
    }

    #[test]
    fn split_is_a_partition() {
        let input = vec![
            series("Albumin"),
            series("Estradiol"),
            series("Glucose"),
            series("PSA"),
            series("Zinc"),
        ];
        let total = input.len();
        let split = split_by_priority(input, &[], &PipelineConfig::default());
        assert_eq!(split.prioritized.len() + split.other.len(), total);
        assert!(split
            .prioritized
            .iter()
            .all(|s| !split.other.iter().any(|o| o.marker == s.marker)));
    }

    #[test]
    fn custom_priority_list_replaces_defaults() {
        let config = PipelineConfig {
            priority_markers: vec!["ferritin".into()],
            ..PipelineConfig::default()
        };
        assert!(config.is_prioritized("Serum Ferritin"));
        assert!(!config.is_prioritized("Testosterone"));
    }
}
