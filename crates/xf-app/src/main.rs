//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xf_core::{DashboardSettings, EventBus};
use xf_views::{export_dashboard, Dashboard, ExportOptions, FilterState};

mod app;
mod loader;

use app::SensorboardApp;
use loader::DataChoice;

#[derive(Parser, Debug)]
#[command(name = "sensorboard")]
#[command(about = "Cross-filtering dashboard for personal sensor exports", long_about = None)]
struct Cli {
    /// Sensor CSV export (date, calories, gsr, heart-rate, skin-temp, steps)
    data: Option<PathBuf>,

    /// Dashboard settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Saved filter state to restore (JSON)
    #[arg(long)]
    filters: Option<PathBuf>,

    /// Render every chart to DIR/chart-<n>.svg and exit without a window
    #[arg(long, value_name = "DIR")]
    export_svg: Option<PathBuf>,

    /// Use synthetic sensor data instead of a file
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => DashboardSettings::load(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?,
        None => DashboardSettings::default(),
    };
    let filters = cli
        .filters
        .as_deref()
        .map(FilterState::load)
        .transpose()
        .context("Failed to read saved filters")?;
    let choice = DataChoice::from_args(cli.data, cli.demo);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;

    if let Some(dir) = cli.export_svg {
        let choice = choice.context("--export-svg needs a data file or --demo")?;
        return export_svg(&runtime, &choice, &settings, filters.as_ref(), &dir);
    }

    info!("Starting sensorboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Light,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Sensor Dashboard",
        options,
        Box::new(move |cc| Box::new(SensorboardApp::new(cc, runtime, settings, filters, choice))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

/// Headless path: load, restore filters, render once and write the charts
fn export_svg(
    runtime: &tokio::runtime::Runtime,
    choice: &DataChoice,
    settings: &DashboardSettings,
    filters: Option<&FilterState>,
    dir: &std::path::Path,
) -> Result<()> {
    let loaded = runtime.block_on(loader::load(choice, settings))?;
    let mut dashboard = Dashboard::new(loaded.source_name, loaded.records, settings, Arc::new(EventBus::new()))?;
    let frame = match filters {
        Some(state) => dashboard.restore(state)?,
        None => dashboard.render_all()?,
    };
    let written = export_dashboard(&frame, dir, &ExportOptions::default())
        .with_context(|| format!("Failed to export charts to {}", dir.display()))?;

    info!("{}; wrote {} files", frame.summary(), written.len());
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
