use thiserror::Error;

/// Invalid construction-time configuration. These are programmer errors:
/// callers are expected to fail fast rather than recover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("sample window capacity must be at least 1")]
    ZeroCapacity,

    #[error("expected at least 3 buckets, got {0}")]
    TooFewBuckets(usize),

    #[error("expected min < max, got min={min} max={max}")]
    EmptyRange { min: i64, max: i64 },

    #[error("range {min}..{max} is too narrow for {buckets} buckets")]
    ZeroWidth { min: i64, max: i64, buckets: usize },

    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// Why a quantile could not be estimated from the current bucket counts.
///
/// Absence of a quantile is a normal outcome; batch queries turn each of
/// these into `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantileError {
    #[error("expected ratio strictly between 0 and 1, got {0}")]
    InvalidRatio(f64),

    #[error("only {used} buckets used, not enough for interpolation; reconfigure min/max/buckets")]
    NotEnoughBuckets { used: usize },

    #[error("quantile out of bounds: decrease min")]
    BelowMin,

    #[error("quantile out of bounds: increase max")]
    AboveMax,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallTreeError {
    #[error("stop received with no active call in this context")]
    NoActiveCall,
}
