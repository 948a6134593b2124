use std::time::Instant;

use egui::{Context, TopBottomPanel};

/// Commands raised from the menu bar or the welcome screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    OpenCsv,
    OpenDemo,
    LoadFilters,
    SaveFilters,
    ExportSvg,
    ResetAll,
    Exit,
}

/// Error message to display
#[derive(Debug, Clone)]
pub struct ErrorMessage {
    pub title: String,
    pub message: String,
    pub timestamp: Instant,
}

impl ErrorMessage {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            timestamp: Instant::now(),
        }
    }
}

/// Render the main menu bar. `summary` is shown right-aligned when a
/// dataset is loaded.
pub fn menu_bar(ctx: &Context, summary: Option<&str>) -> Option<ShellAction> {
    let mut action = None;
    let loaded = summary.is_some();

    TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open CSV...").clicked() {
                    action = Some(ShellAction::OpenCsv);
                    ui.close_menu();
                }
                if ui.button("Open demo data").clicked() {
                    action = Some(ShellAction::OpenDemo);
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(loaded, egui::Button::new("Export charts as SVG...")).clicked() {
                    action = Some(ShellAction::ExportSvg);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    action = Some(ShellAction::Exit);
                    ui.close_menu();
                }
            });

            ui.menu_button("Filters", |ui| {
                if ui.add_enabled(loaded, egui::Button::new("Load...")).clicked() {
                    action = Some(ShellAction::LoadFilters);
                    ui.close_menu();
                }
                if ui.add_enabled(loaded, egui::Button::new("Save...")).clicked() {
                    action = Some(ShellAction::SaveFilters);
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(loaded, egui::Button::new("Reset all")).clicked() {
                    action = Some(ShellAction::ResetAll);
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(summary) = summary {
                    ui.label(summary);
                }
            });
        });
    });

    action
}

/// Show error messages, dropping those older than ten seconds
pub fn show_error_messages(ui: &mut egui::Ui, messages: &mut Vec<ErrorMessage>) {
    let now = Instant::now();
    messages.retain(|msg| now.duration_since(msg.timestamp).as_secs() < 10);

    for msg in messages.iter() {
        egui::Frame::none()
            .fill(crate::theme::error_color().linear_multiply(0.2))
            .stroke(egui::Stroke::new(1.0, crate::theme::error_color()))
            .rounding(4.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("⚠").color(crate::theme::error_color()));
                    ui.label(&msg.title);
                    ui.separator();
                    ui.label(&msg.message);
                });
            });
    }
}

/// Shown when no dataset is loaded, including after a failed load
pub fn welcome_screen(ui: &mut egui::Ui, failure: Option<&str>) -> Option<ShellAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(100.0);
        ui.heading("Sensor Dashboard");
        ui.add_space(20.0);

        match failure {
            Some(error) => {
                ui.label(egui::RichText::new("The dataset could not be loaded.").color(crate::theme::error_color()));
                ui.label(error);
            }
            None => {
                ui.label("Open a sensor export with date, calories, gsr, heart-rate, skin-temp and steps columns");
            }
        }
        ui.add_space(40.0);

        ui.horizontal(|ui| {
            if ui.button("Open CSV File").clicked() {
                action = Some(ShellAction::OpenCsv);
            }
            if ui.button("Use demo data").clicked() {
                action = Some(ShellAction::OpenDemo);
            }
        });
    });
    action
}
