use std::fmt;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use serde::Serialize;

// ─── Process-wide clock anchor ───────────────────────────────────

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Nanoseconds elapsed since the first time the clock was read in this process.
pub fn now_nanos() -> u64 {
    let epoch = *EPOCH.get_or_init(Instant::now);
    saturating_nanos(epoch.elapsed())
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

// ─── Split ───────────────────────────────────────────────────────

/// One completed timed operation: when it started and how long it ran.
/// Both fields are nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Split {
    pub start: u64,
    pub running_for: u64,
}

impl Split {
    pub fn new(start: u64, running_for: u64) -> Self {
        Self { start, running_for }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_nanos(self.running_for)
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Split[start={}, running for {}]",
            self.start,
            present_nanos(self.running_for as f64)
        )
    }
}

// ─── Stopwatch ───────────────────────────────────────────────────

/// Produces [`Split`]s from wall-clock measurements.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch;

impl Stopwatch {
    pub fn start() -> RunningSplit {
        RunningSplit {
            start: now_nanos(),
            started_at: Instant::now(),
        }
    }
}

/// A split that has started but not yet stopped.
#[derive(Debug, Clone, Copy)]
pub struct RunningSplit {
    start: u64,
    started_at: Instant,
}

impl RunningSplit {
    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(self) -> Split {
        Split::new(self.start, saturating_nanos(self.started_at.elapsed()))
    }
}

// ─── Formatting ──────────────────────────────────────────────────

/// Render a nanosecond quantity with the largest unit that keeps it ≥ 1.
///
/// Negative values (trends) keep their sign.
pub fn present_nanos(ns: f64) -> String {
    let abs = ns.abs();
    if abs < 1_000.0 {
        format!("{ns:.0} ns")
    } else if abs < 1_000_000.0 {
        format!("{:.2} µs", ns / 1_000.0)
    } else if abs < 1_000_000_000.0 {
        format!("{:.2} ms", ns / 1_000_000.0)
    } else {
        format!("{:.2} s", ns / 1_000_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_nanos_units() {
        assert_eq!(present_nanos(999.0), "999 ns");
        assert_eq!(present_nanos(1_500.0), "1.50 µs");
        assert_eq!(present_nanos(125_000_000.0), "125.00 ms");
        assert_eq!(present_nanos(2_000_000_000.0), "2.00 s");
        assert_eq!(present_nanos(-25_000_000.0), "-25.00 ms");
    }

    #[test]
    fn test_stopwatch_produces_ordered_splits() {
        let first = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(2));
        let split = first.stop();
        let second = Stopwatch::start().stop();

        assert!(split.running_for >= 2_000_000);
        assert!(second.start >= split.start);
        assert_eq!(split.duration(), Duration::from_nanos(split.running_for));
    }
}
