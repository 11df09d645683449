use serde::{Deserialize, Serialize};

use crate::priority::DEFAULT_PRIORITY_MARKERS;
use crate::BloodworkError;

/// Largest first-to-last change still reported as a stable trend.
pub const DEFAULT_TREND_TOLERANCE: f64 = 0.01;

/// Tunables for series aggregation and priority classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Absolute change between the first and last numeric points that still counts as stable.
    pub trend_tolerance: f64,
    /// Canonical marker names that always get a chart and a trend badge.
    pub priority_markers: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            trend_tolerance: DEFAULT_TREND_TOLERANCE,
            priority_markers: DEFAULT_PRIORITY_MARKERS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Reject values the aggregator cannot work with.
    pub fn validate(&self) -> Result<(), BloodworkError> {
        if !self.trend_tolerance.is_finite() || self.trend_tolerance < 0.0 {
            return Err(BloodworkError::Config(format!(
                "trend_tolerance must be a non-negative number, received {}",
                self.trend_tolerance
            )));
        }

        if self
            .priority_markers
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(BloodworkError::Config(
                "priority_markers cannot contain blank names".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trend_tolerance, 0.01);
        assert_eq!(config.priority_markers.len(), DEFAULT_PRIORITY_MARKERS.len());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"trend_tolerance": 0.5}"#).unwrap();
        assert_eq!(config.trend_tolerance, 0.5);
        assert_eq!(config.priority_markers, PipelineConfig::default().priority_markers);
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let config = PipelineConfig {
            trend_tolerance: -1.0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(BloodworkError::Config(_))));
    }

    #[test]
    fn blank_priority_marker_is_rejected() {
        let config = PipelineConfig {
            priority_markers: vec!["LDL".into(), "  ".into()],
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
