//! Core types for the sensor cross-filter dashboard
//!
//! This crate provides the record model, filter ranges, measures, dashboard
//! settings and the event bus shared by the other crates.

pub mod events;
pub mod filter;
pub mod measure;
pub mod record;
pub mod settings;

// Re-export commonly used types
pub use events::{EventBus, Event, EventHandler, handler_from_fn};
pub use filter::{Bucket, FilterRange, Rounding};
pub use measure::Measure;
pub use record::{SensorRecord, MS_PER_DAY};
pub use settings::{ChartSettings, ConfigError, DashboardSettings, Domain, InitialFilter};
