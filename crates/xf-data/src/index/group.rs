//! Bucketed counts over one dimension

use ordered_float::OrderedFloat;
use xf_core::Bucket;

use super::dimension::DimensionId;

/// Handle to a group of a [`super::CrossIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Running bucket counts for one dimension.
///
/// `counts[b]` is the number of records in bucket `b` that pass every
/// filter except the one on `dimension`.
pub(crate) struct Group {
    pub dimension: DimensionId,
    pub bucket: Bucket,
    pub keys: Vec<f64>,
    pub bucket_of: Vec<usize>,
    pub counts: Vec<usize>,
}

impl Group {
    /// Build the bucket table for `values`; counts start at zero
    pub fn new(dimension: DimensionId, bucket: Bucket, values: &[f64]) -> Self {
        let raw: Vec<f64> = values
            .iter()
            .map(|&v| {
                let key = bucket.key(v);
                if key.is_nan() { 0.0 } else { key }
            })
            .collect();

        let mut keys = raw.clone();
        keys.sort_by_key(|&k| OrderedFloat(k));
        keys.dedup();

        let bucket_of = raw
            .iter()
            .map(|&k| keys.partition_point(|&existing| existing < k))
            .collect();
        let counts = vec![0; keys.len()];

        Self {
            dimension,
            bucket,
            keys,
            bucket_of,
            counts,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
