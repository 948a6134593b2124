//! Chart coordinators, render frames and the dashboard context

pub mod bar_chart;
pub mod brush;
pub mod coordinator;
pub mod dashboard;
pub mod export;
pub mod format;
pub mod record_list;
pub mod scale;
pub mod state;

pub use bar_chart::{bar_path, resize_handle_path, BarGeometry, ChartFrame, ClipRect, Tick};
pub use brush::{BrushEffect, BrushState};
pub use coordinator::ChartCoordinator;
pub use dashboard::{Dashboard, DashboardError, DashboardFrame};
pub use export::{chart_svg, export_dashboard, ExportError, ExportOptions};
pub use format::format_count;
pub use record_list::{DayGroup, ListFrame, ListPatch, ListRow, RecordList};
pub use scale::LinearScale;
pub use state::FilterState;
