//! Dashboard context
//!
//! Owns the index, one coordinator per chart, the record list and a handle to
//! the event bus. Every state transition ends in a render pass that returns a
//! [`DashboardFrame`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use xf_core::events::events::{DatasetLoaded, FilterChanged, Rendered};
use xf_core::{DashboardSettings, Domain, EventBus, FilterRange, Measure, SensorRecord};
use xf_data::{CrossIndex, DimensionId, IndexError, SortOrder};

use crate::bar_chart::ChartFrame;
use crate::brush::BrushEffect;
use crate::coordinator::ChartCoordinator;
use crate::format::format_count;
use crate::record_list::{ListFrame, RecordList};
use crate::scale::LinearScale;
use crate::state::FilterState;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("No chart at position {0}")]
    UnknownChart(usize),
}

/// Everything drawn after one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardFrame {
    pub charts: Vec<ChartFrame>,
    pub list: ListFrame,
    /// Records passing every filter
    pub active: usize,
    pub total: usize,
}

impl DashboardFrame {
    /// Header text, `1,234 of 5,678 selected`
    pub fn summary(&self) -> String {
        format!("{} of {} selected", format_count(self.active), format_count(self.total))
    }
}

pub struct Dashboard {
    source_name: String,
    index: CrossIndex<SensorRecord>,
    charts: Vec<ChartCoordinator>,
    list: RecordList,
    list_dimension: DimensionId,
    list_limit: usize,
    events: Arc<EventBus>,
}

impl Dashboard {
    /// Build dimensions, groups and coordinators for every configured chart
    /// and apply their initial filters.
    pub fn new(
        source_name: impl Into<String>,
        records: Vec<SensorRecord>,
        settings: &DashboardSettings,
        events: Arc<EventBus>,
    ) -> Result<Self, DashboardError> {
        let source_name = source_name.into();
        let mut index = CrossIndex::new(records);
        let mut charts = Vec::with_capacity(settings.charts.len());
        let mut initial = Vec::with_capacity(settings.charts.len());

        for (id, chart) in settings.charts.iter().enumerate() {
            let measure = chart.measure;
            let extent = data_extent(index.records(), measure);
            let domain = match chart.domain {
                Domain::Fixed { min, max } => (min, max),
                Domain::DataExtent => extent,
            };

            let dimension = index.add_dimension(measure.name(), move |r: &SensorRecord| measure.key(r))?;
            let group = index.add_group(dimension, chart.bucket())?;
            let x = LinearScale::rounded(domain, (0.0, chart.width_px));
            charts.push(ChartCoordinator::new(
                id,
                measure,
                dimension,
                group,
                x,
                chart.height_px,
                chart.rounding,
            ));
            initial.push(chart.initial_range(extent));
        }

        let list_dimension = match charts.iter().find(|c| c.measure() == Measure::Date) {
            Some(chart) => chart.dimension(),
            None => index.add_dimension("list-date", |r: &SensorRecord| Measure::Date.key(r))?,
        };

        for (chart, range) in charts.iter_mut().zip(initial) {
            if range.is_some() {
                chart.filter(&mut index, range)?;
            }
        }

        info!(
            "Dashboard over '{}': {} records, {} charts",
            source_name,
            index.size(),
            charts.len()
        );
        events.publish(DatasetLoaded {
            source_name: source_name.clone(),
            record_count: index.size(),
        });

        Ok(Self {
            source_name,
            index,
            charts,
            list: RecordList::new(),
            list_dimension,
            list_limit: settings.list_limit,
            events,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn index(&self) -> &CrossIndex<SensorRecord> {
        &self.index
    }

    pub fn charts(&self) -> &[ChartCoordinator] {
        &self.charts
    }

    pub fn chart(&self, chart: usize) -> Option<&ChartCoordinator> {
        self.charts.get(chart)
    }

    /// Apply each interval to the chart at the same position, then render once.
    /// Entries past the last chart are ignored.
    pub fn apply_filters(&mut self, intervals: &[Option<FilterRange>]) -> Result<DashboardFrame, DashboardError> {
        if intervals.len() > self.charts.len() {
            warn!(
                "{} filters given for {} charts, ignoring the rest",
                intervals.len(),
                self.charts.len()
            );
        }
        for (chart, range) in self.charts.iter_mut().zip(intervals) {
            chart.filter(&mut self.index, *range)?;
            self.events.publish(FilterChanged { chart: chart.id(), range: *range });
        }
        self.render_all()
    }

    /// Clear one chart's filter. Unknown positions are ignored.
    pub fn reset_filter(&mut self, chart: usize) -> Result<DashboardFrame, DashboardError> {
        match self.charts.get_mut(chart) {
            Some(coordinator) => {
                coordinator.reset(&mut self.index)?;
                self.events.publish(FilterChanged { chart, range: None });
            }
            None => warn!("Reset requested for chart {} but there are {}", chart, self.charts.len()),
        }
        self.render_all()
    }

    /// Clear every chart's filter
    pub fn reset_all(&mut self) -> Result<DashboardFrame, DashboardError> {
        let none = vec![None; self.charts.len()];
        self.apply_filters(&none)
    }

    pub fn brush_start(&mut self, chart: usize, px: f64) -> Result<DashboardFrame, DashboardError> {
        let coordinator = self.charts.get_mut(chart).ok_or(DashboardError::UnknownChart(chart))?;
        let effect = coordinator.gesture_start(&mut self.index, px)?;
        self.publish_change(chart, effect);
        self.render_all()
    }

    pub fn brush_move(&mut self, chart: usize, px: f64) -> Result<DashboardFrame, DashboardError> {
        let coordinator = self.charts.get_mut(chart).ok_or(DashboardError::UnknownChart(chart))?;
        let effect = coordinator.gesture_move(&mut self.index, px)?;
        self.publish_change(chart, effect);
        self.render_all()
    }

    pub fn brush_end(&mut self, chart: usize) -> Result<DashboardFrame, DashboardError> {
        let coordinator = self.charts.get_mut(chart).ok_or(DashboardError::UnknownChart(chart))?;
        let effect = coordinator.gesture_end(&mut self.index)?;
        self.publish_change(chart, effect);
        self.render_all()
    }

    fn publish_change(&self, chart: usize, effect: BrushEffect) {
        let range = match effect {
            BrushEffect::None => return,
            BrushEffect::Filter(range) => Some(range),
            BrushEffect::Clear => None,
        };
        self.events.publish(FilterChanged { chart, range });
    }

    /// Current filters by chart position
    pub fn filter_state(&self) -> FilterState {
        FilterState(
            self.charts
                .iter()
                .map(|c| self.index.filter(c.dimension()).ok().flatten())
                .collect(),
        )
    }

    /// Restore saved filters; charts missing from `state` are cleared
    pub fn restore(&mut self, state: &FilterState) -> Result<DashboardFrame, DashboardError> {
        let mut intervals = state.0.clone();
        intervals.resize(self.charts.len(), None);
        self.apply_filters(&intervals)
    }

    /// Recompute every chart and the record list
    pub fn render_all(&mut self) -> Result<DashboardFrame, DashboardError> {
        let mut charts = Vec::with_capacity(self.charts.len());
        for chart in &mut self.charts {
            charts.push(ChartFrame::build(chart, &self.index)?);
        }

        let newest = self.index.top(self.list_dimension, self.list_limit, SortOrder::Descending)?;
        let list = self.list.reconcile(&newest);

        let active = self.index.total_matching();
        let total = self.index.size();
        debug!(
            "Render pass: {} of {} records, {} list rows (+{} -{})",
            active,
            total,
            list.patch.order.len(),
            list.patch.inserted.len(),
            list.patch.removed.len()
        );
        self.events.publish(Rendered { active, total });

        Ok(DashboardFrame { charts, list, active, total })
    }
}

/// First and last key in input order
fn data_extent(records: &[SensorRecord], measure: Measure) -> (f64, f64) {
    match (records.first(), records.last()) {
        (Some(first), Some(last)) => (measure.key(first), measure.key(last)),
        _ => (0.0, 0.0),
    }
}
