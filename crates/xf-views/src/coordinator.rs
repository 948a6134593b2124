//! Chart/filter coordinator
//!
//! One coordinator per chart. It owns the brush state and translates pointer
//! gestures (in pixels) into filter calls on its dimension of the index.

use tracing::debug;
use xf_core::{FilterRange, Measure, Rounding, SensorRecord};
use xf_data::{CrossIndex, DimensionId, GroupId, IndexError};

use crate::brush::{BrushEffect, BrushState, HANDLE_GRAB_PX};
use crate::scale::LinearScale;

/// Binds one chart to a dimension and group of the index
#[derive(Debug, Clone)]
pub struct ChartCoordinator {
    id: usize,
    measure: Measure,
    dimension: DimensionId,
    group: GroupId,
    x: LinearScale,
    height: f64,
    rounding: Option<Rounding>,
    brush: BrushState,
    /// Set when the brush was changed programmatically and must be redrawn
    brush_dirty: bool,
    reset_visible: bool,
}

impl ChartCoordinator {
    pub fn new(
        id: usize,
        measure: Measure,
        dimension: DimensionId,
        group: GroupId,
        x: LinearScale,
        height: f64,
        rounding: Option<Rounding>,
    ) -> Self {
        Self {
            id,
            measure,
            dimension,
            group,
            x,
            height,
            rounding,
            brush: BrushState::Idle,
            brush_dirty: false,
            reset_visible: false,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn dimension(&self) -> DimensionId {
        self.dimension
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn x(&self) -> &LinearScale {
        &self.x
    }

    pub fn width(&self) -> f64 {
        self.x.range.1
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn brush(&self) -> BrushState {
        self.brush
    }

    pub fn reset_visible(&self) -> bool {
        self.reset_visible
    }

    /// Whether the brush needs redrawing, clearing the flag
    pub fn take_brush_dirty(&mut self) -> bool {
        std::mem::take(&mut self.brush_dirty)
    }

    fn value_at(&self, px: f64) -> f64 {
        self.x.invert(self.x.clamp_px(px))
    }

    fn snap(&self, value: f64) -> f64 {
        match self.rounding {
            Some(rounding) => rounding.apply(value),
            None => value,
        }
    }

    fn apply(
        &mut self,
        index: &mut CrossIndex<SensorRecord>,
        (state, effect): (BrushState, BrushEffect),
    ) -> Result<BrushEffect, IndexError> {
        self.brush = state;
        match effect {
            BrushEffect::None => {}
            BrushEffect::Filter(range) => index.set_filter(self.dimension, Some(range))?,
            BrushEffect::Clear => index.set_filter(self.dimension, None)?,
        }
        Ok(effect)
    }

    /// Pointer pressed at `px`. Returns what was applied to the index.
    pub fn gesture_start(
        &mut self,
        index: &mut CrossIndex<SensorRecord>,
        px: f64,
    ) -> Result<BrushEffect, IndexError> {
        let value = self.value_at(px);
        let grab = (self.x.invert(HANDLE_GRAB_PX) - self.x.invert(0.0)).abs();
        self.reset_visible = true;
        debug!("Chart {} brush start at {}", self.id, value);
        self.apply(index, self.brush.start(value, grab))
    }

    /// Pointer dragged to `px`
    pub fn gesture_move(
        &mut self,
        index: &mut CrossIndex<SensorRecord>,
        px: f64,
    ) -> Result<BrushEffect, IndexError> {
        let value = self.value_at(px);
        let bounds = FilterRange::new(self.x.domain.0, self.x.domain.1);
        let transition = self.brush.drag(value, bounds, |v| self.snap(v));
        self.apply(index, transition)
    }

    /// Pointer released
    pub fn gesture_end(
        &mut self,
        index: &mut CrossIndex<SensorRecord>,
    ) -> Result<BrushEffect, IndexError> {
        let effect = self.apply(index, self.brush.end())?;
        if self.brush.is_idle() {
            self.reset_visible = false;
        }
        debug!("Chart {} brush end: {:?}", self.id, self.brush);
        Ok(effect)
    }

    /// Set or clear the filter without a gesture (saved-state restore). The
    /// reset link follows the new brush and the brush is marked for redraw.
    pub fn filter(
        &mut self,
        index: &mut CrossIndex<SensorRecord>,
        range: Option<FilterRange>,
    ) -> Result<(), IndexError> {
        let range = range.map(|r| FilterRange::new(r.lo, r.hi));
        self.apply(index, BrushState::set(range))?;
        self.reset_visible = self.brush.extent().map_or(false, |e| !e.is_empty());
        self.brush_dirty = true;
        Ok(())
    }

    /// Clear the filter and hide the reset link
    pub fn reset(&mut self, index: &mut CrossIndex<SensorRecord>) -> Result<(), IndexError> {
        self.filter(index, None)
    }

    /// Brush extent in pixels
    pub fn brush_px(&self) -> Option<(f64, f64)> {
        self.brush.extent().map(|e| (self.x.map(e.lo), self.x.map(e.hi)))
    }

    /// Foreground clip rectangle `(x, width)`: the brush, or the whole plot
    pub fn clip(&self) -> (f64, f64) {
        match self.brush_px() {
            Some((lo, hi)) => (lo, hi - lo),
            None => (0.0, self.width()),
        }
    }
}
