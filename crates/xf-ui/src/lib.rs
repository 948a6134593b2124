//! User interface components for the sensor dashboard
//!
//! This crate provides the egui drawing of chart frames and the record list,
//! plus the menu bar, error banner and theme.

pub mod chart_widget;
pub mod record_list_ui;
pub mod shell;
pub mod theme;
pub mod widget_utils;

pub use chart_widget::{chart_ui, BrushGesture, ChartResponse};
pub use record_list_ui::record_list_ui;
pub use shell::{menu_bar, show_error_messages, welcome_screen, ErrorMessage, ShellAction};
pub use theme::{apply_theme, ChartPalette, Theme};
pub use widget_utils::{ScrollAreaExt, WidgetId};
