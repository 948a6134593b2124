//! Per-dimension sorted index

use std::ops::Range;

use ordered_float::OrderedFloat;
use xf_core::FilterRange;

/// Handle to a dimension of a [`super::CrossIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionId(pub(crate) usize);

impl DimensionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One sortable projection of the record set.
///
/// `order` holds record indices sorted by key (ties by record index) and
/// `sorted` the matching keys, so a filter maps to a contiguous position
/// range `accepted` in that order.
pub(crate) struct Dimension {
    pub name: String,
    pub bit: u64,
    pub values: Vec<f64>,
    pub order: Vec<usize>,
    pub sorted: Vec<f64>,
    pub accepted: Range<usize>,
    pub filter: Option<FilterRange>,
}

impl Dimension {
    pub fn new(name: String, bit: u64, values: Vec<f64>) -> Self {
        // NaN keys would break the sort order, store them as zero
        let values: Vec<f64> = values
            .into_iter()
            .map(|v| if v.is_nan() { 0.0 } else { v })
            .collect();

        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by_key(|&i| (OrderedFloat(values[i]), i));
        let sorted = order.iter().map(|&i| values[i]).collect();
        let accepted = 0..values.len();

        Self {
            name,
            bit,
            values,
            order,
            sorted,
            accepted,
            filter: None,
        }
    }

    /// Position range in `order` accepted by `filter`
    pub fn positions(&self, filter: Option<&FilterRange>) -> Range<usize> {
        match filter {
            None => 0..self.sorted.len(),
            Some(range) => {
                let lo = self.sorted.partition_point(|&k| k < range.lo);
                let hi = self.sorted.partition_point(|&k| k <= range.hi);
                lo..hi.max(lo)
            }
        }
    }
}

/// Positions in `a` that are not in `b`, as at most two ranges
pub(crate) fn difference(a: &Range<usize>, b: &Range<usize>) -> [Range<usize>; 2] {
    [
        a.start..a.end.min(b.start).max(a.start),
        a.start.max(b.end).min(a.end)..a.end,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_closed_interval() {
        let dim = Dimension::new("hr".into(), 1, vec![66.0, 59.0, 200.0, 70.0]);
        assert_eq!(dim.sorted, vec![59.0, 66.0, 70.0, 200.0]);
        assert_eq!(dim.positions(Some(&FilterRange::new(55.0, 70.0))), 0..3);
        assert_eq!(dim.positions(Some(&FilterRange::new(71.0, 199.0))), 3..3);
        assert_eq!(dim.positions(None), 0..4);
    }

    #[test]
    fn test_nan_keys_sort_as_zero() {
        let dim = Dimension::new("gsr".into(), 1, vec![0.5, f64::NAN, 0.1]);
        assert_eq!(dim.values[1], 0.0);
        assert_eq!(dim.order, vec![1, 2, 0]);
    }

    #[test]
    fn test_difference() {
        let [x, y] = difference(&(2..8), &(4..6));
        assert_eq!((x, y), (2..4, 6..8));

        let [x, y] = difference(&(2..4), &(6..9));
        assert_eq!(x.len() + y.len(), 2);
        assert_eq!(x, 2..4);

        let [x, y] = difference(&(6..9), &(2..4));
        assert!(x.is_empty());
        assert_eq!(y, 6..9);

        let [x, y] = difference(&(3..5), &(0..10));
        assert!(x.is_empty() && y.is_empty());
    }
}
