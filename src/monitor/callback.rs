use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::MonitorConfig;
use crate::error::ConfigError;
use crate::metrics::reduce::DEFAULT_TREND_THRESHOLD;
use crate::metrics::{BucketsSummary, HistogramBuckets, SampleWindow, WindowSummary};
use crate::split::Split;

/// Hooks fired by [`MonitorHub`](super::MonitorHub). All default to no-ops.
pub trait Callback: Send + Sync {
    fn on_monitor_created(&self, _name: &str) {}

    fn on_split_stop(&self, _name: &str, _split: &Split) {}

    fn on_monitor_reset(&self, _name: &str) {}
}

// ─── Per-monitor attribute store ─────────────────────────────────

/// Values attached to monitors by name, created on first use.
struct Attributes<T> {
    by_name: RwLock<HashMap<String, Arc<T>>>,
}

impl<T> Attributes<T> {
    fn new() -> Self {
        Self {
            by_name: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, name: &str) -> Option<Arc<T>> {
        self.by_name.read().get(name).cloned()
    }

    fn get_or_create(&self, name: &str, create: impl FnOnce() -> T) -> Arc<T> {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        self.by_name
            .write()
            .entry(name.to_owned())
            .or_insert_with(|| Arc::new(create()))
            .clone()
    }
}

// ─── Last splits ─────────────────────────────────────────────────

const DEFAULT_WINDOW_CAPACITY: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(capacity) => capacity,
    None => panic!("default window capacity is zero"),
};

/// Keeps a [`SampleWindow`] of the most recent splits for every monitor.
pub struct LastSplitsCallback {
    capacity: NonZeroUsize,
    trend_threshold_ns: u64,
    windows: Attributes<SampleWindow>,
}

impl LastSplitsCallback {
    pub fn new(capacity: usize, trend_threshold_ns: u64) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity)?;
        Ok(Self {
            capacity,
            trend_threshold_ns,
            windows: Attributes::new(),
        })
    }

    pub fn from_config(config: &MonitorConfig) -> Result<Self, ConfigError> {
        Self::new(config.window_capacity, config.trend_threshold_ns)
    }

    pub fn window(&self, name: &str) -> Option<Arc<SampleWindow>> {
        self.windows.get(name)
    }

    pub fn summary(&self, name: &str) -> Option<WindowSummary> {
        self.window(name)
            .map(|w| w.summary(self.trend_threshold_ns))
    }

    fn window_for(&self, name: &str) -> Arc<SampleWindow> {
        self.windows
            .get_or_create(name, || SampleWindow::with_capacity(self.capacity))
    }
}

impl Default for LastSplitsCallback {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_WINDOW_CAPACITY,
            trend_threshold_ns: DEFAULT_TREND_THRESHOLD,
            windows: Attributes::new(),
        }
    }
}

impl Callback for LastSplitsCallback {
    fn on_monitor_created(&self, name: &str) {
        self.window_for(name);
    }

    fn on_split_stop(&self, name: &str, split: &Split) {
        let window = self.window_for(name);
        window.add(*split);
        tracing::trace!(monitor = name, "{}", window.summary(self.trend_threshold_ns));
    }

    fn on_monitor_reset(&self, name: &str) {
        if let Some(window) = self.window(name) {
            window.clear();
        }
    }
}

// ─── Quantiles ───────────────────────────────────────────────────

/// Feeds every split duration of every monitor into its own
/// [`HistogramBuckets`], all sharing one bucket layout.
pub struct QuantilesCallback {
    layout: HistogramBuckets,
    buckets: Attributes<HistogramBuckets>,
}

impl QuantilesCallback {
    pub fn new(min_ns: i64, max_ns: i64, bucket_nb: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            layout: HistogramBuckets::new(min_ns, max_ns, bucket_nb)?,
            buckets: Attributes::new(),
        })
    }

    pub fn from_config(config: &MonitorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            layout: config.new_buckets()?,
            buckets: Attributes::new(),
        })
    }

    pub fn buckets(&self, name: &str) -> Option<Arc<HistogramBuckets>> {
        self.buckets.get(name)
    }

    pub fn summary(&self, name: &str) -> Option<BucketsSummary> {
        self.buckets(name).map(|b| b.summary())
    }

    fn buckets_for(&self, name: &str) -> Arc<HistogramBuckets> {
        self.buckets
            .get_or_create(name, || self.layout.empty_copy())
    }
}

impl Callback for QuantilesCallback {
    fn on_monitor_created(&self, name: &str) {
        self.buckets_for(name);
    }

    fn on_split_stop(&self, name: &str, split: &Split) {
        self.buckets_for(name).add_split(split);
    }

    fn on_monitor_reset(&self, name: &str) {
        if let Some(buckets) = self.buckets(name) {
            buckets.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_splits_lifecycle() {
        let callback = LastSplitsCallback::new(3, 1_000).unwrap();
        callback.on_monitor_created("db.query");
        assert_eq!(callback.window("db.query").unwrap().count(), 0);

        for d in [10, 20, 30, 40] {
            callback.on_split_stop("db.query", &Split::new(d * 10_000, d));
        }
        let summary = callback.summary("db.query").unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, Some(20));
        assert_eq!(summary.trend, Some(10.0));

        callback.on_monitor_reset("db.query");
        assert_eq!(callback.window("db.query").unwrap().count(), 0);
    }

    #[test]
    fn test_window_created_on_first_split() {
        let callback = LastSplitsCallback::default();
        assert!(callback.window("lazy").is_none());
        callback.on_split_stop("lazy", &Split::new(0, 5));
        let window = callback.window("lazy").unwrap();
        assert_eq!(window.count(), 1);
        assert_eq!(window.capacity(), 10);
    }

    #[test]
    fn test_reset_of_unknown_monitor_is_noop() {
        let callback = LastSplitsCallback::default();
        callback.on_monitor_reset("never-seen");
        assert!(callback.window("never-seen").is_none());
    }

    #[test]
    fn test_quantiles_per_monitor() {
        let callback = QuantilesCallback::new(0, 100, 10).unwrap();
        for v in 0..100 {
            callback.on_split_stop("a", &Split::new(0, v));
        }
        callback.on_split_stop("b", &Split::new(0, 5));

        assert_eq!(callback.buckets("a").unwrap().median(), Ok(50.0));
        assert_eq!(callback.buckets("b").unwrap().total_count(), 1);
        assert_eq!(callback.summary("a").unwrap().p90, Some(90.0));

        callback.on_monitor_reset("a");
        assert_eq!(callback.buckets("a").unwrap().total_count(), 0);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(LastSplitsCallback::new(0, 1_000).is_err());
        assert!(QuantilesCallback::new(10, 0, 10).is_err());
    }
}
