use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::node::CallTreeNode;
use super::tree::CallTreeListener;
use crate::split::{present_nanos, Split};

/// Default root duration above which a completed call tree is logged.
pub const DEFAULT_ALERT_THRESHOLD: Duration = Duration::from_millis(500);

/// Logs the whole call tree at WARN when its root call took longer than the
/// threshold.
#[derive(Debug)]
pub struct CallTreeAlert {
    threshold_ns: u64,
    alerts: AtomicU64,
}

impl CallTreeAlert {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold_ns: u64::try_from(threshold.as_nanos()).unwrap_or(u64::MAX),
            alerts: AtomicU64::new(0),
        }
    }

    pub fn threshold(&self) -> Duration {
        Duration::from_nanos(self.threshold_ns)
    }

    /// Number of trees logged so far.
    pub fn alert_count(&self) -> u64 {
        self.alerts.load(Ordering::Relaxed)
    }

    pub fn exceeds(&self, root: &CallTreeNode) -> bool {
        root.total() > self.threshold_ns
    }
}

impl Default for CallTreeAlert {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_THRESHOLD)
    }
}

impl CallTreeListener for CallTreeAlert {
    fn on_root_stop(&self, root: &CallTreeNode, split: &Split) {
        if !self.exceeds(root) {
            return;
        }
        self.alerts.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            root = root.name(),
            total = %present_nanos(root.total() as f64),
            started = split.start,
            "call tree alert\n{root}"
        );
    }
}
