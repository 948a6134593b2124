//! Brush gesture state machine

use xf_core::FilterRange;

/// Distance in pixels within which a press grabs an edge of the brush
pub const HANDLE_GRAB_PX: f64 = 6.0;

/// Selection state of one chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushState {
    /// No selection, the dimension accepts everything
    Idle,
    /// A drag is in progress; `anchor` is the fixed end in value space
    Dragging { anchor: f64, extent: FilterRange },
    /// The whole selection follows the pointer; `origin` is where it was
    /// grabbed and `from` the extent at that moment
    Moving { origin: f64, from: FilterRange, extent: FilterRange },
    /// A selection persists after the drag ended
    Active { extent: FilterRange },
}

/// What the coordinator has to do to the index after a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushEffect {
    /// Nothing to filter yet
    None,
    /// Restrict the dimension
    Filter(FilterRange),
    /// Accept everything again
    Clear,
}

impl Default for BrushState {
    fn default() -> Self {
        BrushState::Idle
    }
}

impl BrushState {
    /// Current extent, `None` when idle
    pub fn extent(&self) -> Option<FilterRange> {
        match *self {
            BrushState::Idle => None,
            BrushState::Dragging { extent, .. }
            | BrushState::Moving { extent, .. }
            | BrushState::Active { extent } => Some(extent),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, BrushState::Idle)
    }

    /// A gesture is in progress, either resizing or moving
    pub fn is_dragging(&self) -> bool {
        matches!(self, BrushState::Dragging { .. } | BrushState::Moving { .. })
    }

    /// Press at `value`.
    ///
    /// Pressing on an edge of an active selection (within `grab` in value
    /// space) resizes it from the opposite edge, pressing inside it grabs the
    /// whole selection, anywhere else starts a new selection anchored at the
    /// press.
    pub fn start(self, value: f64, grab: f64) -> (Self, BrushEffect) {
        if let BrushState::Active { extent } = self {
            if (value - extent.lo).abs() <= grab {
                return (BrushState::Dragging { anchor: extent.hi, extent }, BrushEffect::None);
            }
            if (value - extent.hi).abs() <= grab {
                return (BrushState::Dragging { anchor: extent.lo, extent }, BrushEffect::None);
            }
            if extent.contains(value) {
                return (BrushState::Moving { origin: value, from: extent, extent }, BrushEffect::None);
            }
        }
        let extent = FilterRange::new(value, value);
        (BrushState::Dragging { anchor: value, extent }, BrushEffect::None)
    }

    /// Pointer moved to `value`; `snap` is applied to both endpoints.
    ///
    /// A moved selection keeps its width and stays inside `bounds`.
    pub fn drag(self, value: f64, bounds: FilterRange, snap: impl Fn(f64) -> f64) -> (Self, BrushEffect) {
        match self {
            BrushState::Dragging { anchor, .. } => {
                let extent = FilterRange::new(anchor, value).map(snap);
                (BrushState::Dragging { anchor, extent }, BrushEffect::Filter(extent))
            }
            BrushState::Moving { origin, from, .. } => {
                let lowest = bounds.lo - from.lo;
                let highest = bounds.hi - from.hi;
                let shift = (value - origin).max(lowest).min(highest.max(lowest));
                let extent = FilterRange::new(from.lo + shift, from.hi + shift).map(snap);
                (BrushState::Moving { origin, from, extent }, BrushEffect::Filter(extent))
            }
            other => (other, BrushEffect::None),
        }
    }

    /// Release. A zero-width selection clears the filter.
    pub fn end(self) -> (Self, BrushEffect) {
        match self {
            BrushState::Dragging { extent, .. } if extent.is_empty() => (BrushState::Idle, BrushEffect::Clear),
            BrushState::Dragging { extent, .. } | BrushState::Moving { extent, .. } => {
                (BrushState::Active { extent }, BrushEffect::None)
            }
            other => (other, BrushEffect::None),
        }
    }

    /// Programmatic filter, bypassing the gesture
    pub fn set(range: Option<FilterRange>) -> (Self, BrushEffect) {
        match range {
            Some(extent) => (BrushState::Active { extent }, BrushEffect::Filter(extent)),
            None => (BrushState::Idle, BrushEffect::Clear),
        }
    }
}
