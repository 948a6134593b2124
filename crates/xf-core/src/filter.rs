//! Filter ranges and bucketing rules shared by the index and the views

use serde::{Deserialize, Serialize};

use crate::record::MS_PER_DAY;

/// Closed interval `[lo, hi]` in a dimension's value space.
///
/// Construction never fails: reversed bounds are swapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterRange {
    pub lo: f64,
    pub hi: f64,
}

impl FilterRange {
    /// Create a range, swapping the bounds if they arrive reversed
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Whether `value` lies inside the closed interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }

    /// Zero-width ranges come from a click without a drag
    pub fn is_empty(&self) -> bool {
        self.lo == self.hi
    }

    /// Apply `f` to both endpoints (used for snapping), renormalizing afterwards
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.lo), f(self.hi))
    }
}

impl From<(f64, f64)> for FilterRange {
    fn from((a, b): (f64, f64)) -> Self {
        Self::new(a, b)
    }
}

/// How a dimension key is mapped to a group bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bucket {
    /// Every distinct key is its own bucket
    Identity,
    /// `floor(key / step) * step`
    Floor { step: f64 },
    /// Key is epoch milliseconds, bucket is the start of its UTC day
    Day,
}

impl Bucket {
    /// Bucket key for a dimension key
    pub fn key(&self, value: f64) -> f64 {
        match *self {
            Bucket::Identity => value,
            Bucket::Floor { step } if step == 1.0 => value.floor(),
            Bucket::Floor { step } => (value / step).floor() * step,
            Bucket::Day => (value / MS_PER_DAY).floor() * MS_PER_DAY,
        }
    }
}

/// Endpoint snapping applied to brush extents while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round epoch milliseconds to the nearest UTC midnight
    Day,
}

impl Rounding {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Rounding::Day => (value / MS_PER_DAY).round() * MS_PER_DAY,
        }
    }
}
