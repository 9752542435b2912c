use std::fmt;
use std::num::NonZeroUsize;

use parking_lot::Mutex;
use serde::Serialize;

use super::reduce::{self, DEFAULT_TREND_THRESHOLD};
use super::ring_buffer::RingBuffer;
use crate::error::ConfigError;
use crate::split::{present_nanos, Split};

/// The most recent splits of one monitor plus statistics over them.
///
/// Every call takes the same lock for its whole duration; statistics are
/// computed from the buffer contents at the instant of the query.
pub struct SampleWindow {
    splits: Mutex<RingBuffer<Split>>,
}

/// Statistics captured in one critical section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowSummary {
    pub count: usize,
    pub min: Option<u64>,
    pub mean: Option<f64>,
    pub max: Option<u64>,
    pub trend: Option<f64>,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(capacity)
            .map(Self::with_capacity)
            .ok_or(ConfigError::ZeroCapacity)
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            splits: Mutex::new(RingBuffer::new(capacity.get())),
        }
    }

    pub fn add(&self, split: Split) {
        self.splits.lock().append(split);
    }

    pub fn clear(&self) {
        self.splits.lock().clear();
    }

    pub fn count(&self) -> usize {
        self.splits.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.splits.lock().capacity()
    }

    pub fn min(&self) -> Option<u64> {
        reduce::min(&*self.splits.lock())
    }

    pub fn max(&self) -> Option<u64> {
        reduce::max(&*self.splits.lock())
    }

    pub fn mean(&self) -> Option<f64> {
        reduce::mean(&*self.splits.lock())
    }

    /// Trend with the default 1000 ns spacing threshold.
    pub fn trend(&self) -> Option<f64> {
        self.trend_with_threshold(DEFAULT_TREND_THRESHOLD)
    }

    pub fn trend_with_threshold(&self, time_delta_threshold: u64) -> Option<f64> {
        reduce::trend(&*self.splits.lock(), time_delta_threshold)
    }

    /// Oldest-to-newest copy of the retained splits.
    pub fn splits(&self) -> Vec<Split> {
        self.splits.lock().to_vec()
    }

    /// Capture every statistic under a single lock. Format the result after
    /// the lock is released.
    pub fn summary(&self, time_delta_threshold: u64) -> WindowSummary {
        let splits = self.splits.lock();
        WindowSummary {
            count: splits.len(),
            min: reduce::min(&*splits),
            mean: reduce::mean(&*splits),
            max: reduce::max(&*splits),
            trend: reduce::trend(&*splits, time_delta_threshold),
        }
    }
}

impl fmt::Debug for SampleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleWindow")
            .field("summary", &self.summary(DEFAULT_TREND_THRESHOLD))
            .finish()
    }
}

impl fmt::Display for SampleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary(DEFAULT_TREND_THRESHOLD);
        write!(f, "{summary}")
    }
}

impl fmt::Display for WindowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleWindow[size={}", self.count)?;
        if let (Some(min), Some(mean), Some(max)) = (self.min, self.mean, self.max) {
            write!(
                f,
                ",min={},mean={},max={}",
                present_nanos(min as f64),
                present_nanos(mean),
                present_nanos(max as f64),
            )?;
        }
        if let Some(trend) = self.trend {
            write!(f, ",trend={}", present_nanos(trend))?;
        }
        f.write_str("]")
    }
}
