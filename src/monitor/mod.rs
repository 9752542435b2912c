//! Named monitors and the hooks that feed their aggregates.

pub mod callback;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

pub use callback::{Callback, LastSplitsCallback, QuantilesCallback};

use crate::calltree::CallTreeAlert;
use crate::config::MonitorConfig;
use crate::error::ConfigError;
use crate::metrics::{BucketsSummary, WindowSummary};
use crate::split::Split;

// ─── Hub ─────────────────────────────────────────────────────────

/// Registry of monitor names plus the callbacks notified about them.
///
/// A monitor exists from its first recorded split. Callbacks run without
/// any hub lock held.
#[derive(Default)]
pub struct MonitorHub {
    callbacks: Vec<Arc<dyn Callback>>,
    monitors: RwLock<HashSet<String>>,
}

impl MonitorHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(mut self, callback: Arc<dyn Callback>) -> Self {
        self.callbacks.push(callback);
        self
    }

    /// Record a stopped split for `name`, creating the monitor on first use.
    pub fn record(&self, name: &str, split: Split) {
        if self.register(name) {
            tracing::debug!(monitor = name, "monitor created");
            for callback in &self.callbacks {
                callback.on_monitor_created(name);
            }
        }
        for callback in &self.callbacks {
            callback.on_split_stop(name, &split);
        }
    }

    /// Reset a known monitor. Returns false if `name` was never recorded.
    pub fn reset(&self, name: &str) -> bool {
        if !self.contains(name) {
            return false;
        }
        tracing::debug!(monitor = name, "monitor reset");
        for callback in &self.callbacks {
            callback.on_monitor_reset(name);
        }
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.monitors.read().contains(name)
    }

    /// Known monitor names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.monitors.read().iter().cloned().collect();
        names.sort();
        names
    }

    /// True only for the caller that actually inserted the name.
    fn register(&self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.monitors.write().insert(name.to_owned())
    }
}

// ─── Standard wiring ─────────────────────────────────────────────

/// A hub wired with a sample window and a histogram per monitor, plus the
/// call-tree alert, all built from one [`MonitorConfig`].
pub struct Monitors {
    pub hub: MonitorHub,
    pub windows: Arc<LastSplitsCallback>,
    pub quantiles: Arc<QuantilesCallback>,
    pub alert: CallTreeAlert,
}

/// Everything known about one monitor at the moment of the report.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub name: String,
    pub window: Option<WindowSummary>,
    pub histogram: Option<BucketsSummary>,
}

impl Monitors {
    pub fn new(config: &MonitorConfig) -> Result<Self, ConfigError> {
        let windows = Arc::new(LastSplitsCallback::from_config(config)?);
        let quantiles = Arc::new(QuantilesCallback::from_config(config)?);
        let hub = MonitorHub::new()
            .with_callback(windows.clone())
            .with_callback(quantiles.clone());
        Ok(Self {
            hub,
            windows,
            quantiles,
            alert: CallTreeAlert::new(config.call_tree_alert()),
        })
    }

    pub fn record(&self, name: &str, split: Split) {
        self.hub.record(name, split);
    }

    pub fn reset(&self, name: &str) -> bool {
        self.hub.reset(name)
    }

    pub fn report(&self) -> Vec<MonitorReport> {
        self.hub
            .names()
            .into_iter()
            .map(|name| MonitorReport {
                window: self.windows.summary(&name),
                histogram: self.quantiles.summary(&name),
                name,
            })
            .collect()
    }
}

impl fmt::Display for MonitorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(window) = &self.window {
            write!(f, " {window}")?;
        }
        if let Some(histogram) = &self.histogram {
            write!(f, " {histogram}")?;
        }
        Ok(())
    }
}
