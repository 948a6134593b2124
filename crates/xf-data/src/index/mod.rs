//! Multi-dimensional cross-filter index
//!
//! The index owns the record set, one sorted projection per dimension and
//! bucketed counts per group. Every record carries a bit mask with one bit per
//! dimension whose filter rejects it. Changing a filter only visits the
//! records whose bit flips and applies `+1`/`-1` deltas to the groups of the
//! other dimensions, so a group never sees its own dimension's filter.

mod dimension;
mod group;

use thiserror::Error;
use tracing::debug;
use xf_core::{Bucket, FilterRange};

pub use dimension::DimensionId;
pub use group::GroupId;

use dimension::{difference, Dimension};
use group::Group;

/// Maximum number of dimensions, one bit of the filter mask each
pub const MAX_DIMENSIONS: usize = 64;

/// Errors from index operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Too many dimensions (max {MAX_DIMENSIONS})")]
    TooManyDimensions,

    #[error("Unknown dimension {0}")]
    UnknownDimension(usize),

    #[error("Unknown group {0}")]
    UnknownGroup(usize),
}

/// Ordering for [`CrossIndex::top`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Cross-filter index over an immutable record set
pub struct CrossIndex<T> {
    records: Vec<T>,
    /// Per record, the bits of the dimensions that currently reject it
    masks: Vec<u64>,
    dimensions: Vec<Dimension>,
    groups: Vec<Group>,
    /// Records passing every filter
    matching: usize,
}

impl<T> CrossIndex<T> {
    /// Freeze `records` into a new index with no dimensions
    pub fn new(records: Vec<T>) -> Self {
        let size = records.len();
        Self {
            masks: vec![0; size],
            records,
            dimensions: Vec::new(),
            groups: Vec::new(),
            matching: size,
        }
    }

    /// Total number of records, independent of filters
    pub fn size(&self) -> usize {
        self.records.len()
    }

    /// Number of records passing every active filter
    pub fn total_matching(&self) -> usize {
        self.matching
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    /// Whether a record passes every active filter
    pub fn is_matching(&self, index: usize) -> bool {
        self.masks.get(index).map_or(false, |&mask| mask == 0)
    }

    /// Register a derived key. Records start accepted by the new dimension.
    pub fn add_dimension(
        &mut self,
        name: impl Into<String>,
        key: impl Fn(&T) -> f64,
    ) -> Result<DimensionId, IndexError> {
        if self.dimensions.len() >= MAX_DIMENSIONS {
            return Err(IndexError::TooManyDimensions);
        }
        let id = DimensionId(self.dimensions.len());
        let bit = 1u64 << id.0;
        let values = self.records.iter().map(key).collect();
        let dimension = Dimension::new(name.into(), bit, values);
        debug!("Added dimension '{}' ({} records)", dimension.name, self.records.len());
        self.dimensions.push(dimension);
        Ok(id)
    }

    /// Create a bucketed group over a dimension, counted against the current filters
    pub fn add_group(&mut self, dimension: DimensionId, bucket: Bucket) -> Result<GroupId, IndexError> {
        let dim = self.dimension(dimension)?;
        let mut group = Group::new(dimension, bucket, &dim.values);
        let others = !dim.bit;
        for (record, &mask) in self.masks.iter().enumerate() {
            if mask & others == 0 {
                group.counts[group.bucket_of[record]] += 1;
            }
        }
        let id = GroupId(self.groups.len());
        self.groups.push(group);
        Ok(id)
    }

    pub fn dimension_name(&self, dimension: DimensionId) -> Result<&str, IndexError> {
        Ok(&self.dimension(dimension)?.name)
    }

    /// Active filter of a dimension, `None` when it accepts everything
    pub fn filter(&self, dimension: DimensionId) -> Result<Option<FilterRange>, IndexError> {
        Ok(self.dimension(dimension)?.filter)
    }

    /// Key of a record in a dimension
    pub fn key(&self, dimension: DimensionId, record: usize) -> Result<Option<f64>, IndexError> {
        Ok(self.dimension(dimension)?.values.get(record).copied())
    }

    /// Set or clear (`None`) a dimension's filter.
    ///
    /// Only the records entering or leaving the accepted range are visited.
    pub fn set_filter(&mut self, dimension: DimensionId, range: Option<FilterRange>) -> Result<(), IndexError> {
        // Deserialized ranges may arrive with reversed bounds
        let range = range.map(|r| FilterRange::new(r.lo, r.hi));
        let dim = self.dimension(dimension)?;
        let bit = dim.bit;
        let old = dim.accepted.clone();
        let new = dim.positions(range.as_ref());

        // Groups affected by this dimension, with the mask of bits they honor
        let others: Vec<(usize, u64)> = self
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.dimension != dimension)
            .map(|(gi, g)| (gi, !self.dimensions[g.dimension.0].bit))
            .collect();

        let mut exited = 0usize;
        let mut entered = 0usize;
        let dim = &self.dimensions[dimension.0];

        for positions in difference(&old, &new) {
            for &record in &dim.order[positions] {
                let before = self.masks[record];
                let after = before | bit;
                self.masks[record] = after;
                if before == 0 {
                    self.matching -= 1;
                }
                for &(gi, honored) in &others {
                    if before & honored == 0 {
                        let group = &mut self.groups[gi];
                        group.counts[group.bucket_of[record]] -= 1;
                    }
                }
                exited += 1;
            }
        }

        for positions in difference(&new, &old) {
            for &record in &dim.order[positions] {
                let before = self.masks[record];
                let after = before & !bit;
                self.masks[record] = after;
                if after == 0 {
                    self.matching += 1;
                }
                for &(gi, honored) in &others {
                    if after & honored == 0 {
                        let group = &mut self.groups[gi];
                        group.counts[group.bucket_of[record]] += 1;
                    }
                }
                entered += 1;
            }
        }

        let dim = &mut self.dimensions[dimension.0];
        dim.accepted = new;
        dim.filter = range;

        debug!(
            "Filter on '{}' -> {:?}: {} left, {} entered, {} matching",
            dim.name, range, exited, entered, self.matching
        );
        Ok(())
    }

    /// Clear every dimension's filter
    pub fn clear_filters(&mut self) -> Result<(), IndexError> {
        for id in 0..self.dimensions.len() {
            self.set_filter(DimensionId(id), None)?;
        }
        Ok(())
    }

    /// First `n` records passing every filter (including the dimension's own),
    /// ordered by the dimension's key
    pub fn top(&self, dimension: DimensionId, n: usize, order: SortOrder) -> Result<Vec<&T>, IndexError> {
        let dim = self.dimension(dimension)?;
        let window = &dim.order[dim.accepted.clone()];
        let pick = |&&record: &&usize| self.masks[record] == 0;

        let records = match order {
            SortOrder::Ascending => window
                .iter()
                .filter(pick)
                .take(n)
                .map(|&record| &self.records[record])
                .collect(),
            SortOrder::Descending => window
                .iter()
                .rev()
                .filter(pick)
                .take(n)
                .map(|&record| &self.records[record])
                .collect(),
        };
        Ok(records)
    }

    /// `(bucket key, count)` pairs in key order
    pub fn group_all(&self, group: GroupId) -> Result<Vec<(f64, usize)>, IndexError> {
        let g = self.group(group)?;
        Ok(g.keys.iter().copied().zip(g.counts.iter().copied()).collect())
    }

    /// Largest bucket count, zero for an empty group
    pub fn group_max(&self, group: GroupId) -> Result<usize, IndexError> {
        Ok(self.group(group)?.max())
    }

    /// Sum of all bucket counts
    pub fn group_total(&self, group: GroupId) -> Result<usize, IndexError> {
        Ok(self.group(group)?.total())
    }

    pub fn group_dimension(&self, group: GroupId) -> Result<DimensionId, IndexError> {
        Ok(self.group(group)?.dimension)
    }

    pub fn group_bucket(&self, group: GroupId) -> Result<Bucket, IndexError> {
        Ok(self.group(group)?.bucket)
    }

    /// Recompute a group's counts from the filter ranges alone, without the
    /// running counters or masks
    pub fn recount_group(&self, group: GroupId) -> Result<Vec<usize>, IndexError> {
        let g = self.group(group)?;
        let mut counts = vec![0; g.keys.len()];
        for record in 0..self.records.len() {
            let passes = self
                .dimensions
                .iter()
                .enumerate()
                .filter(|(di, _)| *di != g.dimension.0)
                .all(|(_, d)| d.filter.map_or(true, |range| range.contains(d.values[record])));
            if passes {
                counts[g.bucket_of[record]] += 1;
            }
        }
        Ok(counts)
    }

    /// Current running counts of a group, in key order
    pub fn group_counts(&self, group: GroupId) -> Result<&[usize], IndexError> {
        Ok(&self.group(group)?.counts)
    }

    fn dimension(&self, id: DimensionId) -> Result<&Dimension, IndexError> {
        self.dimensions.get(id.0).ok_or(IndexError::UnknownDimension(id.0))
    }

    fn group(&self, id: GroupId) -> Result<&Group, IndexError> {
        self.groups.get(id.0).ok_or(IndexError::UnknownGroup(id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        hour: f64,
        heart_rate: f64,
        steps: f64,
    }

    fn rows(heart_rates: &[f64]) -> Vec<Row> {
        heart_rates
            .iter()
            .enumerate()
            .map(|(i, &hr)| Row { hour: 17.0 + i as f64, heart_rate: hr, steps: (i * 10) as f64 })
            .collect()
    }

    struct Fixture {
        index: CrossIndex<Row>,
        dims: Vec<DimensionId>,
        groups: Vec<GroupId>,
    }

    fn fixture(data: Vec<Row>) -> Fixture {
        let mut index = CrossIndex::new(data);
        let hour = index.add_dimension("hour", |r: &Row| r.hour).unwrap();
        let heart = index.add_dimension("heart-rate", |r: &Row| r.heart_rate).unwrap();
        let steps = index.add_dimension("steps", |r: &Row| r.steps).unwrap();
        let groups = vec![
            index.add_group(hour, Bucket::Floor { step: 1.0 }).unwrap(),
            index.add_group(heart, Bucket::Floor { step: 5.0 }).unwrap(),
            index.add_group(steps, Bucket::Floor { step: 10.0 }).unwrap(),
        ];
        Fixture { index, dims: vec![hour, heart, steps], groups }
    }

    #[test]
    fn test_heart_rate_scenario() {
        let Fixture { mut index, dims, groups } = fixture(rows(&[59.0, 66.0, 200.0]));
        index.set_filter(dims[1], Some(FilterRange::new(55.0, 70.0))).unwrap();

        assert_eq!(index.size(), 3);
        assert_eq!(index.total_matching(), 2);
        // Unrelated dimension sees the heart rate filter
        assert_eq!(index.group_total(groups[0]).unwrap(), 2);
        // Heart rate group ignores its own filter
        assert_eq!(index.group_total(groups[1]).unwrap(), 3);
    }

    #[test]
    fn test_clear_filter_is_idempotent() {
        let Fixture { mut index, dims, groups } = fixture(rows(&[59.0, 66.0, 200.0, 90.0]));
        index.set_filter(dims[1], Some(FilterRange::new(60.0, 100.0))).unwrap();
        index.set_filter(dims[1], None).unwrap();
        let once: Vec<_> = groups.iter().map(|&g| index.group_all(g).unwrap()).collect();
        let matching_once = index.total_matching();

        index.set_filter(dims[1], None).unwrap();
        let twice: Vec<_> = groups.iter().map(|&g| index.group_all(g).unwrap()).collect();

        assert_eq!(once, twice);
        assert_eq!(matching_once, index.total_matching());
        assert_eq!(index.total_matching(), 4);
        assert_eq!(index.filter(dims[1]).unwrap(), None);
    }

    #[test]
    fn test_empty_matching_set() {
        let Fixture { mut index, dims, groups } = fixture(rows(&[59.0, 66.0]));
        index.set_filter(dims[1], Some(FilterRange::new(300.0, 400.0))).unwrap();
        assert_eq!(index.total_matching(), 0);
        assert_eq!(index.group_total(groups[0]).unwrap(), 0);
        assert_eq!(index.group_max(groups[0]).unwrap(), 0);
        assert!(index.top(dims[0], 10, SortOrder::Descending).unwrap().is_empty());
    }

    #[test]
    fn test_top_honors_own_filter() {
        let Fixture { mut index, dims, .. } = fixture(rows(&[59.0, 66.0, 200.0, 61.0]));
        index.set_filter(dims[1], Some(FilterRange::new(55.0, 70.0))).unwrap();

        let desc: Vec<f64> = index
            .top(dims[1], 2, SortOrder::Descending)
            .unwrap()
            .iter()
            .map(|r| r.heart_rate)
            .collect();
        assert_eq!(desc, vec![66.0, 61.0]);

        let asc: Vec<f64> = index
            .top(dims[1], 10, SortOrder::Ascending)
            .unwrap()
            .iter()
            .map(|r| r.heart_rate)
            .collect();
        assert_eq!(asc, vec![59.0, 61.0, 66.0]);
    }

    #[test]
    fn test_top_honors_other_filters() {
        let Fixture { mut index, dims, .. } = fixture(rows(&[59.0, 66.0, 200.0, 61.0]));
        // steps are 0, 10, 20, 30
        index.set_filter(dims[2], Some(FilterRange::new(5.0, 25.0))).unwrap();
        let top: Vec<f64> = index
            .top(dims[0], 10, SortOrder::Ascending)
            .unwrap()
            .iter()
            .map(|r| r.steps)
            .collect();
        assert_eq!(top, vec![10.0, 20.0]);
    }

    #[test]
    fn test_group_created_after_filter() {
        let mut index = CrossIndex::new(rows(&[59.0, 66.0, 200.0]));
        let heart = index.add_dimension("heart-rate", |r: &Row| r.heart_rate).unwrap();
        let hour = index.add_dimension("hour", |r: &Row| r.hour).unwrap();
        index.set_filter(heart, Some(FilterRange::new(55.0, 70.0))).unwrap();

        let hours = index.add_group(hour, Bucket::Floor { step: 1.0 }).unwrap();
        let hearts = index.add_group(heart, Bucket::Floor { step: 5.0 }).unwrap();
        assert_eq!(index.group_total(hours).unwrap(), 2);
        assert_eq!(index.group_total(hearts).unwrap(), 3);
    }

    #[test]
    fn test_nan_key_lands_in_zero_bucket() {
        let mut index = CrossIndex::new(vec![f64::NAN, 0.0001, 0.003]);
        let gsr = index.add_dimension("gsr", |v: &f64| *v).unwrap();
        let gsrs = index.add_group(gsr, Bucket::Floor { step: 0.00025 }).unwrap();
        let all = index.group_all(gsrs).unwrap();
        assert_eq!(all[0], (0.0, 2));
        assert_eq!(index.group_total(gsrs).unwrap(), 3);
    }

    #[test]
    fn test_too_many_dimensions() {
        let mut index = CrossIndex::new(vec![1.0f64]);
        for i in 0..MAX_DIMENSIONS {
            index.add_dimension(format!("d{i}"), |v: &f64| *v).unwrap();
        }
        assert_eq!(
            index.add_dimension("overflow", |v: &f64| *v),
            Err(IndexError::TooManyDimensions)
        );
    }

    #[test]
    fn test_unknown_handles() {
        let mut index = CrossIndex::new(vec![1.0f64]);
        assert_eq!(
            index.set_filter(DimensionId(3), None),
            Err(IndexError::UnknownDimension(3))
        );
        assert_eq!(index.group_total(GroupId(1)), Err(IndexError::UnknownGroup(1)));
    }

    /// Random filter sequences checked against brute force
    #[test]
    fn test_random_filters_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let data: Vec<Row> = (0..300)
            .map(|_| Row {
                hour: rng.gen_range(0.0..24.0),
                heart_rate: rng.gen_range(40..180) as f64,
                steps: rng.gen_range(0..200) as f64,
            })
            .collect();
        let Fixture { mut index, dims, groups } = fixture(data.clone());
        let keys: [fn(&Row) -> f64; 3] = [|r: &Row| r.hour, |r: &Row| r.heart_rate, |r: &Row| r.steps];
        let spans = [(0.0, 24.0), (40.0, 180.0), (0.0, 200.0)];
        let mut active: [Option<FilterRange>; 3] = [None; 3];

        for _ in 0..200 {
            let d = rng.gen_range(0..3);
            let range = if rng.gen_bool(0.2) {
                None
            } else {
                let (lo, hi) = spans[d];
                Some(FilterRange::new(rng.gen_range(lo..hi), rng.gen_range(lo..hi)))
            };
            let before = index.group_total(groups[d]).unwrap();
            index.set_filter(dims[d], range).unwrap();
            active[d] = range;

            // Own group unaffected by its own filter
            assert_eq!(index.group_total(groups[d]).unwrap(), before);

            let passes = |r: &Row, skip: Option<usize>| {
                (0..3).all(|k| Some(k) == skip || active[k].map_or(true, |f| f.contains(keys[k](r))))
            };
            let expected = data.iter().filter(|r| passes(r, None)).count();
            assert_eq!(index.total_matching(), expected);

            for (k, &g) in groups.iter().enumerate() {
                let others = data.iter().filter(|r| passes(r, Some(k))).count();
                assert_eq!(index.group_total(g).unwrap(), others);
                assert_eq!(index.group_counts(g).unwrap(), index.recount_group(g).unwrap().as_slice());
            }
        }
    }
}
