//! Statistics over an ordered run of splits.
//!
//! Each function is a single pass over its input and returns `None` when
//! there is nothing to report.

use crate::split::Split;

/// Trend threshold applied when the caller does not pick one (nanoseconds).
pub const DEFAULT_TREND_THRESHOLD: u64 = 1_000;

pub fn min<'a, I>(splits: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a Split>,
{
    splits.into_iter().map(|s| s.running_for).min()
}

pub fn max<'a, I>(splits: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a Split>,
{
    splits.into_iter().map(|s| s.running_for).max()
}

pub fn mean<'a, I>(splits: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Split>,
{
    let (sum, count) = splits
        .into_iter()
        .fold((0f64, 0u64), |(sum, count), s| (sum + s.running_for as f64, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Average change in duration between samples whose starts are more than
/// `time_delta_threshold` apart.
///
/// Samples arriving within the threshold of the last considered one are
/// skipped, so bursts do not dominate the slope. `None` until at least two
/// samples are far enough apart.
pub fn trend<'a, I>(splits: I, time_delta_threshold: u64) -> Option<f64>
where
    I: IntoIterator<Item = &'a Split>,
{
    let mut iter = splits.into_iter();
    let mut last = iter.next()?;
    let mut total: i128 = 0;
    let mut count: u64 = 0;

    for split in iter {
        if split.start.saturating_sub(last.start) > time_delta_threshold {
            total += i128::from(split.running_for) - i128::from(last.running_for);
            count += 1;
            last = split;
        }
    }

    (count > 0).then(|| total as f64 / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    /// Back-to-back splits: each starts when the previous one stopped.
    fn sequential(durations_ms: &[u64]) -> Vec<Split> {
        let mut start = 0;
        durations_ms
            .iter()
            .map(|&d| {
                let split = Split::new(start, d * MS);
                start += d * MS;
                split
            })
            .collect()
    }

    #[test]
    fn test_empty_input_has_no_value() {
        let none: [Split; 0] = [];
        assert_eq!(min(&none), None);
        assert_eq!(max(&none), None);
        assert_eq!(mean(&none), None);
        assert_eq!(trend(&none, DEFAULT_TREND_THRESHOLD), None);
    }

    #[test]
    fn test_min_max_mean() {
        let splits = sequential(&[100, 150, 125, 150]);
        assert_eq!(min(&splits), Some(100 * MS));
        assert_eq!(max(&splits), Some(150 * MS));
        assert_eq!(mean(&splits), Some(131.25 * MS as f64));
    }

    #[test]
    fn test_trend_sign_follows_direction() {
        let rising = sequential(&[100, 125, 150]);
        let falling = sequential(&[150, 125, 100]);
        assert_eq!(trend(&rising, DEFAULT_TREND_THRESHOLD), Some(25.0 * MS as f64));
        assert_eq!(trend(&falling, DEFAULT_TREND_THRESHOLD), Some(-25.0 * MS as f64));
    }

    #[test]
    fn test_trend_skips_bursts_inside_threshold() {
        let splits = [
            Split::new(0, 10),
            Split::new(500, 1_000),
            Split::new(900, 5_000),
            Split::new(2_000, 40),
        ];
        // Only the last sample is far enough from the first.
        assert_eq!(trend(&splits, 1_000), Some(30.0));
    }

    #[test]
    fn test_trend_needs_two_spaced_samples() {
        let single = [Split::new(0, 10)];
        let burst = [Split::new(0, 10), Split::new(10, 20)];
        assert_eq!(trend(&single, 1_000), None);
        assert_eq!(trend(&burst, 1_000), None);
    }

    #[test]
    fn test_trend_ignores_out_of_order_starts() {
        let splits = [Split::new(5_000, 10), Split::new(1_000, 90), Split::new(7_000, 30)];
        assert_eq!(trend(&splits, 1_000), Some(20.0));
    }
}
