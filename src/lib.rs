//! Splitscope - online statistics over timed operations.
//!
//! A [`Split`] is one completed operation: when it started and how long it
//! ran. The crate keeps bounded, concurrently updatable summaries of them:
//!
//! - [`SampleWindow`]: the last N splits of a monitor with min/max/mean/trend
//! - [`HistogramBuckets`]: fixed-width buckets with interpolated quantiles
//! - [`CallTree`]: nested calls of one execution context aggregated into a
//!   tree, reported when the top-level call completes
//!
//! [`MonitorHub`] routes splits by monitor name to the callbacks that own
//! those aggregates.

pub mod calltree;
pub mod config;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod split;

pub use calltree::{CallTree, CallTreeAlert, CallTreeListener, CallTreeNode};
pub use config::MonitorConfig;
pub use error::{CallTreeError, ConfigError, QuantileError};
pub use metrics::{HistogramBuckets, RingBuffer, SampleWindow};
pub use monitor::{Callback, MonitorHub, Monitors};
pub use split::{Split, Stopwatch};
