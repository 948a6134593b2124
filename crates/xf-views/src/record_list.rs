//! The list of most recent matching records, nested by day

use ahash::AHashSet;
use itertools::Itertools;
use xf_core::{SensorRecord, MS_PER_DAY};

use crate::format::{format_day, format_time};

/// One row of the list, already formatted
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    /// Sequence index of the record, the row's identity
    pub index: usize,
    pub time: String,
    pub gsr: String,
    pub steps: String,
    pub calories: String,
    pub heart_rate: String,
}

impl ListRow {
    fn from_record(record: &SensorRecord) -> Self {
        Self {
            index: record.index,
            time: format_time(&record.timestamp),
            gsr: record.gsr.to_string(),
            steps: record.steps.to_string(),
            calories: record.calories.to_string(),
            heart_rate: record.heart_rate.to_string(),
        }
    }
}

/// Rows sharing a UTC day
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    /// Days since the epoch
    pub day: i64,
    pub label: String,
    pub rows: Vec<ListRow>,
}

/// Row identities that appeared and disappeared since the previous pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPatch {
    pub inserted: Vec<usize>,
    pub removed: Vec<usize>,
    /// Final order of the rows
    pub order: Vec<usize>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty()
    }
}

/// Render output of the list
#[derive(Debug, Clone, PartialEq)]
pub struct ListFrame {
    pub groups: Vec<DayGroup>,
    pub patch: ListPatch,
}

/// Keyed list state, reconciled on every render pass
#[derive(Debug, Default)]
pub struct RecordList {
    shown: Vec<usize>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence indices currently shown
    pub fn shown(&self) -> &[usize] {
        &self.shown
    }

    /// Replace the shown records with `records` (newest first)
    pub fn reconcile(&mut self, records: &[&SensorRecord]) -> ListFrame {
        let order: Vec<usize> = records.iter().map(|r| r.index).collect();
        let before: AHashSet<usize> = self.shown.iter().copied().collect();
        let after: AHashSet<usize> = order.iter().copied().collect();

        let patch = ListPatch {
            inserted: order.iter().copied().filter(|i| !before.contains(i)).collect(),
            removed: self.shown.iter().copied().filter(|i| !after.contains(i)).collect(),
            order: order.clone(),
        };
        self.shown = order;

        ListFrame { groups: nest_by_day(records), patch }
    }
}

fn day_of(record: &SensorRecord) -> i64 {
    (record.epoch_ms() / MS_PER_DAY).floor() as i64
}

/// Group consecutive records by UTC day, keeping first-seen order
pub fn nest_by_day(records: &[&SensorRecord]) -> Vec<DayGroup> {
    let by_day = records.iter().group_by(|r| day_of(r));
    by_day
        .into_iter()
        .map(|(day, rows)| {
            let rows: Vec<&SensorRecord> = rows.copied().collect();
            DayGroup {
                day,
                label: rows.first().map(|r| format_day(&r.timestamp)).unwrap_or_default(),
                rows: rows.into_iter().map(ListRow::from_record).collect(),
            }
        })
        .collect()
}
