//! The eframe application

use std::sync::Arc;

use eframe::egui;
use parking_lot::Mutex;
use tracing::{error, info};

use xf_core::events::events::DatasetLoaded;
use xf_core::{handler_from_fn, DashboardSettings, EventBus};
use xf_ui::{BrushGesture, ChartPalette, ChartResponse, ErrorMessage, ShellAction, Theme};
use xf_views::{export_dashboard, Dashboard, DashboardError, DashboardFrame, ExportOptions, FilterState};

use crate::loader::{self, DataChoice, LoadedRecords};

type LoadResult = Result<LoadedRecords, String>;

/// Main application state
pub struct SensorboardApp {
    /// Tokio runtime for loading files off the UI thread
    runtime: tokio::runtime::Runtime,

    settings: DashboardSettings,

    /// Restored once the next dataset is loaded
    pending_filters: Option<FilterState>,

    events: Arc<EventBus>,

    dashboard: Option<Dashboard>,

    /// Result of the latest render pass
    frame: Option<DashboardFrame>,

    /// Label of the source being loaded
    loading: Option<String>,

    /// Filled by the load task
    load_slot: Arc<Mutex<Option<LoadResult>>>,

    /// Why the last load failed; no charts are shown then
    load_failure: Option<String>,

    errors: Vec<ErrorMessage>,

    palette: ChartPalette,

    egui_ctx: egui::Context,
}

impl SensorboardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        settings: DashboardSettings,
        pending_filters: Option<FilterState>,
        initial: Option<DataChoice>,
    ) -> Self {
        let theme = Theme::default();
        xf_ui::apply_theme(&cc.egui_ctx, &theme);

        let events = Arc::new(EventBus::new());
        events.subscribe::<DatasetLoaded>(handler_from_fn(|event| {
            if let Some(loaded) = event.as_any().downcast_ref::<DatasetLoaded>() {
                info!("Dataset '{}' ready with {} records", loaded.source_name, loaded.record_count);
            }
        }));

        let mut app = Self {
            runtime,
            settings,
            pending_filters,
            events,
            dashboard: None,
            frame: None,
            loading: None,
            load_slot: Arc::new(Mutex::new(None)),
            load_failure: None,
            errors: Vec::new(),
            palette: ChartPalette::for_theme(&theme),
            egui_ctx: cc.egui_ctx.clone(),
        };
        if let Some(choice) = initial {
            app.start_load(choice);
        }
        app
    }

    /// Read the records on the runtime; the dashboard is built on the UI
    /// thread once they arrive
    fn start_load(&mut self, choice: DataChoice) {
        info!("Loading {}", choice.label());
        self.loading = Some(choice.label());

        let slot = self.load_slot.clone();
        let ctx = self.egui_ctx.clone();
        let settings = self.settings.clone();

        self.runtime.spawn(async move {
            let result = loader::load(&choice, &settings)
                .await
                .map_err(|e| format!("{:#}", e));
            *slot.lock() = Some(result);
            ctx.request_repaint();
        });
    }

    fn poll_load(&mut self) {
        let result = self.load_slot.lock().take();
        if let Some(result) = result {
            self.loading = None;
            self.finish_load(result);
        }
    }

    fn finish_load(&mut self, result: LoadResult) {
        // A failed load never leaves a partial or stale dashboard behind
        self.dashboard = None;
        self.frame = None;

        let built = result.and_then(|loaded| {
            self.build_dashboard(loaded).map_err(|e| e.to_string())
        });
        match built {
            Ok((dashboard, frame)) => {
                self.load_failure = None;
                self.dashboard = Some(dashboard);
                self.frame = Some(frame);
            }
            Err(message) => {
                error!("Failed to load dataset: {}", message);
                self.errors.push(ErrorMessage::new("Load failed", message.clone()));
                self.load_failure = Some(message);
            }
        }
    }

    fn build_dashboard(&mut self, loaded: LoadedRecords) -> Result<(Dashboard, DashboardFrame), DashboardError> {
        let mut dashboard = Dashboard::new(loaded.source_name, loaded.records, &self.settings, self.events.clone())?;
        let frame = match self.pending_filters.take() {
            Some(state) => dashboard.restore(&state)?,
            None => dashboard.render_all()?,
        };
        Ok((dashboard, frame))
    }

    fn report(&mut self, title: &str, message: impl std::fmt::Display) {
        error!("{}: {}", title, message);
        self.errors.push(ErrorMessage::new(title, message.to_string()));
    }

    fn apply_interactions(&mut self, interactions: Vec<(usize, ChartResponse)>) {
        let Some(dashboard) = self.dashboard.as_mut() else {
            return;
        };
        let mut failure = None;

        for (chart, response) in interactions {
            for gesture in response.gestures {
                let result = match gesture {
                    BrushGesture::Start(px) => dashboard.brush_start(chart, px),
                    BrushGesture::Move(px) => dashboard.brush_move(chart, px),
                    BrushGesture::End => dashboard.brush_end(chart),
                };
                match result {
                    Ok(frame) => self.frame = Some(frame),
                    Err(e) => failure = Some(e),
                }
            }
            if response.reset_clicked {
                match dashboard.reset_filter(chart) {
                    Ok(frame) => self.frame = Some(frame),
                    Err(e) => failure = Some(e),
                }
            }
        }

        if let Some(e) = failure {
            self.report("Filter failed", e);
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: ShellAction) {
        match action {
            ShellAction::OpenCsv => {
                if let Some(path) = rfd::FileDialog::new().add_filter("CSV Files", &["csv"]).pick_file() {
                    self.start_load(DataChoice::Csv(path));
                }
            }
            ShellAction::OpenDemo => self.start_load(DataChoice::Demo),
            ShellAction::LoadFilters => {
                let Some(path) = rfd::FileDialog::new().add_filter("Filter state", &["json"]).pick_file() else {
                    return;
                };
                let result = FilterState::load(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|state| self.with_dashboard(|d| d.restore(&state)));
                self.take_frame(result, "Could not restore filters");
            }
            ShellAction::SaveFilters => {
                let Some(dashboard) = &self.dashboard else { return };
                let state = dashboard.filter_state();
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Filter state", &["json"])
                    .set_file_name("filters.json")
                    .save_file()
                {
                    if let Err(e) = state.save(&path) {
                        self.report("Could not save filters", e);
                    }
                }
            }
            ShellAction::ExportSvg => {
                let Some(frame) = &self.frame else { return };
                if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                    if let Err(e) = export_dashboard(frame, &dir, &ExportOptions::default()) {
                        self.report("Export failed", e);
                    }
                }
            }
            ShellAction::ResetAll => {
                let result = self.with_dashboard(|d| d.reset_all());
                self.take_frame(result, "Reset failed");
            }
            ShellAction::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn with_dashboard(
        &mut self,
        f: impl FnOnce(&mut Dashboard) -> Result<DashboardFrame, DashboardError>,
    ) -> Result<DashboardFrame, String> {
        match self.dashboard.as_mut() {
            Some(dashboard) => f(dashboard).map_err(|e| e.to_string()),
            None => Err("No dataset loaded".to_string()),
        }
    }

    fn take_frame(&mut self, result: Result<DashboardFrame, String>, title: &str) {
        match result {
            Ok(frame) => self.frame = Some(frame),
            Err(e) => self.report(title, e),
        }
    }
}

impl eframe::App for SensorboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        let summary = self.frame.as_ref().map(|f| f.summary());
        let mut action = xf_ui::menu_bar(ctx, summary.as_deref());

        if let Some(frame) = &self.frame {
            egui::SidePanel::right("record_list")
                .default_width(520.0)
                .show(ctx, |ui| {
                    ui.heading(summary.as_deref().unwrap_or_default());
                    xf_ui::record_list_ui(ui, &frame.list);
                });
        }

        let mut interactions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            xf_ui::show_error_messages(ui, &mut self.errors);

            if let Some(label) = &self.loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Loading {}...", label));
                });
                return;
            }

            match &self.frame {
                Some(frame) => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            for chart in &frame.charts {
                                let response = xf_ui::chart_ui(ui, chart, &self.palette);
                                if !response.gestures.is_empty() || response.reset_clicked {
                                    interactions.push((chart.id, response));
                                }
                            }
                        });
                    });
                }
                None => {
                    if let Some(choice) = xf_ui::welcome_screen(ui, self.load_failure.as_deref()) {
                        action = Some(choice);
                    }
                }
            }
        });

        self.apply_interactions(interactions);
        if let Some(action) = action {
            self.handle_action(ctx, action);
        }
    }
}
