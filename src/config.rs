use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metrics::{HistogramBuckets, SampleWindow};

// ─── Monitor configuration ───────────────────────────────────────

/// Host-supplied tuning for the per-monitor aggregates and the call-tree
/// alert. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Splits retained per monitor in its sample window
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    /// Minimum start spacing (ns) between samples compared by the trend
    #[serde(default = "default_trend_threshold_ns")]
    pub trend_threshold_ns: u64,

    #[serde(default)]
    pub histogram: HistogramConfig,

    /// Root duration above which a call tree is logged
    #[serde(default = "default_call_tree_alert_ms")]
    pub call_tree_alert_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    #[serde(default)]
    pub min_ns: i64,

    #[serde(default = "default_histogram_max_ns")]
    pub max_ns: i64,

    #[serde(default = "default_histogram_buckets")]
    pub buckets: usize,
}

fn default_window_capacity() -> usize {
    10
}
fn default_trend_threshold_ns() -> u64 {
    1_000
}
fn default_call_tree_alert_ms() -> u64 {
    500
}
fn default_histogram_max_ns() -> i64 {
    1_000_000_000
}
fn default_histogram_buckets() -> usize {
    100
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window_capacity: default_window_capacity(),
            trend_threshold_ns: default_trend_threshold_ns(),
            histogram: HistogramConfig::default(),
            call_tree_alert_ms: default_call_tree_alert_ms(),
        }
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            min_ns: 0,
            max_ns: default_histogram_max_ns(),
            buckets: default_histogram_buckets(),
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the aggregates would refuse at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.new_window()?;
        self.new_buckets()?;
        Ok(())
    }

    pub fn call_tree_alert(&self) -> Duration {
        Duration::from_millis(self.call_tree_alert_ms)
    }

    pub fn new_window(&self) -> Result<SampleWindow, ConfigError> {
        SampleWindow::new(self.window_capacity)
    }

    pub fn new_buckets(&self) -> Result<HistogramBuckets, ConfigError> {
        let h = &self.histogram;
        HistogramBuckets::new(h.min_ns, h.max_ns, h.buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.window_capacity, 10);
        assert_eq!(config.trend_threshold_ns, 1_000);
        assert_eq!(config.call_tree_alert(), Duration::from_millis(500));
        assert_eq!(config.histogram.buckets, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MonitorConfig::from_json(r#"{"window_capacity": 25, "histogram": {"max_ns": 5000}}"#)
            .unwrap();
        assert_eq!(config.window_capacity, 25);
        assert_eq!(config.histogram.max_ns, 5_000);
        assert_eq!(config.histogram.min_ns, 0);
        assert_eq!(config.histogram.buckets, 100);
        assert_eq!(config.call_tree_alert_ms, 500);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert_eq!(
            MonitorConfig::from_json(r#"{"window_capacity": 0}"#).unwrap_err(),
            ConfigError::ZeroCapacity
        );
        assert_eq!(
            MonitorConfig::from_json(r#"{"histogram": {"buckets": 2}}"#).unwrap_err(),
            ConfigError::TooFewBuckets(2)
        );
        assert!(matches!(
            MonitorConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
