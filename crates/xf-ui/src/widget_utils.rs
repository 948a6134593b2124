//! Widget ID helpers
//!
//! Charts and the per-day grids of the record list are drawn in loops, so
//! their egui IDs are built from the chart position or the day.

use egui::{Id, ScrollArea};
use std::fmt::Display;

/// Widget ID builder that combines several components
#[derive(Debug, Clone)]
pub struct WidgetId {
    components: Vec<String>,
}

impl WidgetId {
    pub fn new(base: impl Display) -> Self {
        Self {
            components: vec![base.to_string()],
        }
    }

    /// Root ID of the chart at `position`
    pub fn chart(position: usize) -> Self {
        Self::new("chart").with(position)
    }

    /// Grid of one day in the record list
    pub fn list_day(day: i64) -> Self {
        Self::new("record_list").with("day").with(day)
    }

    pub fn with(mut self, component: impl Display) -> Self {
        self.components.push(component.to_string());
        self
    }

    pub fn build(&self) -> String {
        self.components.join("_")
    }

    pub fn id(&self) -> Id {
        Id::new(self.build())
    }
}

/// Extension trait for ScrollArea to easily add unique IDs
pub trait ScrollAreaExt {
    fn id_builder(self, builder: WidgetId) -> Self;
}

impl ScrollAreaExt for ScrollArea {
    fn id_builder(self, builder: WidgetId) -> Self {
        self.id_source(builder.build())
    }
}
