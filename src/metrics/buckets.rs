use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::{ConfigError, QuantileError};
use crate::split::Split;

/// Minimum number of populated regular buckets before a quantile is
/// interpolated, and minimum number of regular buckets at construction.
const MIN_BUCKETS: usize = 3;

/// A half-open range `[lo, hi)` and how many values fell into it.
///
/// The underflow bucket has `lo == i64::MIN` and the overflow bucket has
/// `hi == i64::MAX`; both sentinels stand for infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub lo: i64,
    pub hi: i64,
    pub count: u64,
}

impl Bucket {
    pub fn contains(&self, value: i64) -> bool {
        self.lo <= value && (value < self.hi || self.hi == i64::MAX)
    }
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    lo: i64,
    hi: i64,
}

impl Bounds {
    fn contains(&self, value: i64) -> bool {
        self.lo <= value && value < self.hi
    }
}

/// Fixed-width histogram between `min` and `max` with one catch-all bucket
/// on each side, estimating quantiles by linear interpolation inside the
/// bucket where the quantile falls.
///
/// Bounds are fixed at construction; only counts change. Inserts and
/// queries are serialized by one lock held for the whole call.
pub struct HistogramBuckets {
    min: i64,
    max: i64,
    width: i64,
    /// Number of regular buckets (excluding underflow/overflow)
    bucket_nb: usize,
    /// `bucket_nb + 2` entries: underflow, regular buckets, overflow
    bounds: Box<[Bounds]>,
    counts: Mutex<Vec<u64>>,
}

/// Configuration and headline quantiles captured under one lock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketsSummary {
    pub min: i64,
    pub max: i64,
    pub buckets: usize,
    pub width: i64,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub p90: Option<f64>,
}

impl HistogramBuckets {
    /// Build `bucket_nb` regular buckets of width `(max - min) / bucket_nb`
    /// (integer division). The last regular bucket stretches to `max` so the
    /// buckets cover the whole line without gaps.
    pub fn new(min: i64, max: i64, bucket_nb: usize) -> Result<Self, ConfigError> {
        if bucket_nb < MIN_BUCKETS {
            return Err(ConfigError::TooFewBuckets(bucket_nb));
        }
        if min >= max {
            return Err(ConfigError::EmptyRange { min, max });
        }
        let span = i128::from(max) - i128::from(min);
        let width = (span / bucket_nb as i128) as i64;
        if width == 0 {
            return Err(ConfigError::ZeroWidth {
                min,
                max,
                buckets: bucket_nb,
            });
        }

        let mut bounds = Vec::with_capacity(bucket_nb + 2);
        bounds.push(Bounds { lo: i64::MIN, hi: min });
        let mut lo = min;
        for i in 1..=bucket_nb {
            let hi = if i == bucket_nb { max } else { lo + width };
            bounds.push(Bounds { lo, hi });
            lo = hi;
        }
        bounds.push(Bounds { lo: max, hi: i64::MAX });

        Ok(Self {
            min,
            max,
            width,
            bucket_nb,
            bounds: bounds.into_boxed_slice(),
            counts: Mutex::new(vec![0; bucket_nb + 2]),
        })
    }

    /// Same bounds, all counts zero.
    pub fn empty_copy(&self) -> Self {
        Self {
            min: self.min,
            max: self.max,
            width: self.width,
            bucket_nb: self.bucket_nb,
            bounds: self.bounds.clone(),
            counts: Mutex::new(vec![0; self.bucket_nb + 2]),
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    /// Number of regular buckets.
    pub fn bucket_count(&self) -> usize {
        self.bucket_nb
    }

    /// Index of the bucket holding `value`.
    fn index_for(&self, value: i64) -> usize {
        if value < self.min {
            return 0;
        }
        if value >= self.max {
            return self.bucket_nb + 1;
        }
        let offset = i128::from(value) - i128::from(self.min);
        let span = i128::from(self.max) - i128::from(self.min);
        let mut index = 1 + (offset * (self.bucket_nb as i128 - 1) / span) as usize;
        // The estimate rounds down; step forward until the bounds match.
        while !self.bounds[index].contains(value) {
            index += 1;
        }
        index
    }

    pub fn add_value(&self, value: i64) {
        let index = self.index_for(value);
        self.counts.lock()[index] += 1;
    }

    /// Insert every value as one logical operation.
    pub fn add_values<I>(&self, values: I)
    where
        I: IntoIterator<Item = i64>,
    {
        let mut counts = self.counts.lock();
        for value in values {
            counts[self.index_for(value)] += 1;
        }
    }

    pub fn add_split(&self, split: &Split) {
        self.add_value(i64::try_from(split.running_for).unwrap_or(i64::MAX));
    }

    pub fn clear(&self) {
        self.counts.lock().iter_mut().for_each(|c| *c = 0);
    }

    /// Sum of all bucket counts, underflow and overflow included.
    pub fn total_count(&self) -> u64 {
        self.counts.lock().iter().sum()
    }

    /// Snapshot of every bucket, underflow first and overflow last.
    pub fn buckets(&self) -> Vec<Bucket> {
        let counts = self.counts.lock();
        self.bounds
            .iter()
            .zip(counts.iter())
            .map(|(b, &count)| Bucket {
                lo: b.lo,
                hi: b.hi,
                count,
            })
            .collect()
    }

    pub fn quantile(&self, ratio: f64) -> Result<f64, QuantileError> {
        let counts = self.counts.lock();
        let total = self.checked_total(&counts)?;
        self.compute_quantile(&counts, ratio, total)
    }

    pub fn median(&self) -> Result<f64, QuantileError> {
        self.quantile(0.5)
    }

    /// Each ratio is computed from the same snapshot of counts; a ratio that
    /// cannot be computed yields `None` without affecting the others.
    pub fn quantiles(&self, ratios: &[f64]) -> Vec<Option<f64>> {
        let counts = self.counts.lock();
        match self.checked_total(&counts) {
            Ok(total) => ratios
                .iter()
                .map(|&ratio| self.compute_quantile(&counts, ratio, total).ok())
                .collect(),
            Err(_) => vec![None; ratios.len()],
        }
    }

    /// First, second and third quartiles.
    pub fn quartiles(&self) -> [Option<f64>; 3] {
        let q = self.quantiles(&[0.25, 0.5, 0.75]);
        [q[0], q[1], q[2]]
    }

    pub fn summary(&self) -> BucketsSummary {
        let q = self.quantiles(&[0.5, 0.75, 0.9]);
        BucketsSummary {
            min: self.min,
            max: self.max,
            buckets: self.bucket_nb,
            width: self.width,
            median: q[0],
            p75: q[1],
            p90: q[2],
        }
    }

    /// Total count, provided enough regular buckets are populated to
    /// interpolate.
    fn checked_total(&self, counts: &[u64]) -> Result<u64, QuantileError> {
        let regular = &counts[1..=self.bucket_nb];
        let used = regular.iter().filter(|&&c| c > 0).count();
        if used < MIN_BUCKETS {
            return Err(QuantileError::NotEnoughBuckets { used });
        }
        Ok(counts.iter().sum())
    }

    fn compute_quantile(&self, counts: &[u64], ratio: f64, total: u64) -> Result<f64, QuantileError> {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(QuantileError::InvalidRatio(ratio));
        }
        let expected = ratio * total as f64;

        let mut before = 0f64;
        let mut found = None;
        for (index, &count) in counts.iter().enumerate() {
            let after = before + count as f64;
            if count > 0 && expected >= before && expected <= after {
                found = Some((index, before, count));
                break;
            }
            before = after;
        }

        let (index, before, count) = found.ok_or(QuantileError::AboveMax)?;
        if index == 0 {
            return Err(QuantileError::BelowMin);
        }
        if index == self.bucket_nb + 1 {
            return Err(QuantileError::AboveMax);
        }
        let bounds = self.bounds[index];
        let span = (bounds.hi - bounds.lo) as f64;
        Ok(bounds.lo as f64 + (expected - before) * span / count as f64)
    }
}

impl fmt::Debug for HistogramBuckets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistogramBuckets")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("width", &self.width)
            .field("buckets", &self.bucket_nb)
            .field("total", &self.total_count())
            .finish()
    }
}

impl fmt::Display for HistogramBuckets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary();
        write!(f, "{summary}")
    }
}

impl fmt::Display for BucketsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HistogramBuckets[min={},max={},nb={},width={}",
            self.min, self.max, self.buckets, self.width
        )?;
        for (label, value) in [("median", self.median), ("75%", self.p75), ("90%", self.p90)] {
            if let Some(value) = value {
                write!(f, ",{label}={value}")?;
            }
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decile_buckets() -> HistogramBuckets {
        HistogramBuckets::new(0, 100, 10).unwrap()
    }

    fn counts(buckets: &HistogramBuckets) -> Vec<u64> {
        buckets.buckets().iter().map(|b| b.count).collect()
    }

    #[test]
    fn test_construction_validation() {
        assert_eq!(
            HistogramBuckets::new(0, 100, 2).unwrap_err(),
            ConfigError::TooFewBuckets(2)
        );
        assert_eq!(
            HistogramBuckets::new(100, 100, 10).unwrap_err(),
            ConfigError::EmptyRange { min: 100, max: 100 }
        );
        assert_eq!(
            HistogramBuckets::new(0, 2, 3).unwrap_err(),
            ConfigError::ZeroWidth { min: 0, max: 2, buckets: 3 }
        );
    }

    #[test]
    fn test_bounds_partition_the_line() {
        let buckets = HistogramBuckets::new(0, 10, 3).unwrap();
        let all = buckets.buckets();
        assert_eq!(all.len(), 5);
        assert_eq!((all[0].lo, all[0].hi), (i64::MIN, 0));
        assert_eq!((all[1].lo, all[1].hi), (0, 3));
        assert_eq!((all[2].lo, all[2].hi), (3, 6));
        assert_eq!((all[3].lo, all[3].hi), (6, 10));
        assert_eq!((all[4].lo, all[4].hi), (10, i64::MAX));
        for pair in all.windows(2) {
            assert_eq!(pair[0].hi, pair[1].lo);
        }
    }

    #[test]
    fn test_value_lands_in_its_bucket() {
        let buckets = decile_buckets();
        for _ in 0..7 {
            buckets.add_value(55);
        }
        let snapshot = buckets.buckets();
        let hit: Vec<_> = snapshot.iter().filter(|b| b.count > 0).collect();
        assert_eq!(hit.len(), 1);
        assert_eq!((hit[0].lo, hit[0].hi, hit[0].count), (50, 60, 7));
    }

    #[test]
    fn test_truncated_width_routes_to_wide_last_bucket() {
        let buckets = HistogramBuckets::new(0, 100, 40).unwrap();
        buckets.add_value(79);
        buckets.add_value(99);
        let last = buckets.buckets()[40];
        assert_eq!((last.lo, last.hi, last.count), (78, 100, 2));
    }

    #[test]
    fn test_underflow_and_overflow() {
        let buckets = decile_buckets();
        buckets.add_values([-5, 100, 250, 0, 99]);
        let c = counts(&buckets);
        assert_eq!(c[0], 1);
        assert_eq!(c[1], 1);
        assert_eq!(c[10], 1);
        assert_eq!(c[11], 2);
        assert_eq!(buckets.total_count(), 5);
    }

    #[test]
    fn test_uniform_quantiles() {
        let buckets = decile_buckets();
        buckets.add_values(0..100);
        assert_eq!(buckets.median(), Ok(50.0));
        assert_eq!(buckets.quantile(0.25), Ok(25.0));
        assert_eq!(buckets.quantile(0.9), Ok(90.0));
        assert_eq!(buckets.quartiles(), [Some(25.0), Some(50.0), Some(75.0)]);
    }

    #[test]
    fn test_interpolates_inside_bucket() {
        let buckets = decile_buckets();
        // 2 values in [0,10), 4 in [10,20), 2 in [20,30)
        buckets.add_values([1, 2, 11, 12, 13, 14, 21, 22]);
        // expected count 4 → halfway through the second bucket
        assert_eq!(buckets.median(), Ok(15.0));
    }

    #[test]
    fn test_needs_three_populated_buckets() {
        let buckets = decile_buckets();
        buckets.add_values([5, 15, -1, -2, 500, 600]);
        assert_eq!(
            buckets.median(),
            Err(QuantileError::NotEnoughBuckets { used: 2 })
        );
        assert_eq!(buckets.quantiles(&[0.1, 0.5]), vec![None, None]);
    }

    #[test]
    fn test_out_of_range_quantiles() {
        let buckets = decile_buckets();
        buckets.add_values([5, 15, 25]);
        buckets.add_values(std::iter::repeat(1_000).take(10));
        assert_eq!(buckets.quantile(0.9), Err(QuantileError::AboveMax));

        buckets.clear();
        buckets.add_values(std::iter::repeat(-1_000).take(10));
        buckets.add_values([5, 15, 25]);
        assert_eq!(buckets.quantile(0.1), Err(QuantileError::BelowMin));
    }

    #[test]
    fn test_invalid_ratio() {
        let buckets = decile_buckets();
        buckets.add_values(0..100);
        assert_eq!(buckets.quantile(0.0), Err(QuantileError::InvalidRatio(0.0)));
        assert_eq!(buckets.quantile(1.0), Err(QuantileError::InvalidRatio(1.0)));
        assert!(buckets.quantile(f64::NAN).is_err());
    }

    #[test]
    fn test_batch_isolates_failures() {
        let buckets = decile_buckets();
        buckets.add_values([5, 15, 25, 35]);
        buckets.add_values(std::iter::repeat(1_000).take(4));
        let q = buckets.quantiles(&[0.25, 1.5, 0.95]);
        assert_eq!(q[0], Some(20.0));
        assert_eq!(q[1], None);
        assert_eq!(q[2], None);
    }

    #[test]
    fn test_clear() {
        let buckets = decile_buckets();
        buckets.clear();
        buckets.add_values(0..100);
        buckets.clear();
        assert_eq!(buckets.total_count(), 0);
        assert!(buckets.median().is_err());
        assert_eq!(buckets.buckets()[5].lo, 40);
    }

    #[test]
    fn test_summary_formatting() {
        let buckets = decile_buckets();
        assert_eq!(
            buckets.to_string(),
            "HistogramBuckets[min=0,max=100,nb=10,width=10]"
        );
        buckets.add_values(0..100);
        assert_eq!(
            buckets.to_string(),
            "HistogramBuckets[min=0,max=100,nb=10,width=10,median=50,75%=75,90%=90]"
        );
    }

    #[test]
    fn test_add_split_uses_duration() {
        let buckets = decile_buckets();
        buckets.add_split(&Split::new(1_000, 42));
        assert_eq!(buckets.buckets()[5].count, 1);
    }
}
