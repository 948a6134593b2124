//! Chart export functionality
//!
//! Charts are drawn through plotters' SVG backend in plot pixels, the same
//! coordinates the on-screen chart uses.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use thiserror::Error;
use tracing::info;

use crate::bar_chart::{ChartFrame, BAR_WIDTH};
use crate::dashboard::DashboardFrame;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Drawing error: {0}")]
    Draw(String),
}

/// Space around the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self { top: 10.0, right: 10.0, bottom: 20.0, left: 10.0 }
    }
}

/// Export options for charts
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub margin: Margin,
    /// Fill of the unselected bars
    pub background_color: RGBColor,
    /// Fill of the bars inside the brush
    pub foreground_color: RGBColor,
    /// Include title above the plot
    pub include_title: bool,
    /// Include the x axis with tick labels
    pub include_axis: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            background_color: RGBColor(0xcc, 0xcc, 0xcc),
            foreground_color: RGBColor(70, 130, 180),
            include_title: true,
            include_axis: true,
        }
    }
}

const TITLE_HEIGHT: f64 = 20.0;
const HANDLE_FILL: RGBColor = RGBColor(0xee, 0xee, 0xee);
const HANDLE_STROKE: RGBColor = RGBColor(0x66, 0x66, 0x66);

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn px(value: f64) -> i32 {
    value.round() as i32
}

/// Overlap of a bar with the foreground clip, `None` when it lies outside
fn clipped_span(bar_x: f64, clip_x: f64, clip_width: f64) -> Option<(f64, f64)> {
    let lo = bar_x.max(clip_x);
    let hi = (bar_x + BAR_WIDTH).min(clip_x + clip_width);
    (hi > lo).then_some((lo, hi))
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &ChartFrame,
    options: &ExportOptions,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let m = options.margin;
    root.fill(&WHITE)?;

    let title = if options.include_title { TITLE_HEIGHT } else { 0.0 };
    if options.include_title {
        root.draw(&Text::new(
            frame.title.to_string(),
            (px(m.left), 4),
            font(12.0).color(&BLACK),
        ))?;
    }
    let plot = root.margin(px(m.top + title), px(m.bottom), px(m.left), px(m.right));
    let base = px(frame.height);

    for bar in &frame.bars {
        plot.draw(&Rectangle::new(
            [(px(bar.x), px(bar.y)), (px(bar.x + BAR_WIDTH), base)],
            options.background_color.filled(),
        ))?;
    }
    for bar in &frame.bars {
        if let Some((lo, hi)) = clipped_span(bar.x, frame.clip.x, frame.clip.width) {
            plot.draw(&Rectangle::new(
                [(px(lo), px(bar.y)), (px(hi), base)],
                options.foreground_color.filled(),
            ))?;
        }
    }

    if options.include_axis {
        let right = px(frame.width);
        plot.draw(&PathElement::new(vec![(0, base + 6), (0, base), (right, base), (right, base + 6)], BLACK))?;
        let label = font(10.0).color(&BLACK).pos(Pos::new(HPos::Center, VPos::Top));
        for tick in &frame.ticks {
            let x = px(tick.px);
            plot.draw(&PathElement::new(vec![(x, base), (x, base + 6)], BLACK))?;
            plot.draw(&Text::new(tick.label.clone(), (x, base + 8), label.clone()))?;
        }
    }

    if let Some((lo, hi)) = frame.brush {
        plot.draw(&Rectangle::new(
            [(px(lo), 0), (px(hi), base)],
            options.foreground_color.mix(0.125).filled(),
        ))?;
        let (top, bottom) = (px(frame.height / 3.0), px(2.0 * frame.height / 3.0));
        for (x, east) in [(lo, false), (hi, true)] {
            let (left, right) = if east { (x + 0.5, x + 6.5) } else { (x - 6.5, x - 0.5) };
            let corners = [(px(left), top), (px(right), bottom)];
            plot.draw(&Rectangle::new(corners, HANDLE_FILL.filled()))?;
            plot.draw(&Rectangle::new(corners, HANDLE_STROKE.stroke_width(1)))?;
        }
    }

    root.present()
}

/// Standalone SVG document for one chart
pub fn chart_svg(frame: &ChartFrame, options: &ExportOptions) -> Result<String, ExportError> {
    let m = options.margin;
    let title = if options.include_title { TITLE_HEIGHT } else { 0.0 };
    let size = (
        (frame.width + m.left + m.right).round().max(1.0) as u32,
        (frame.height + m.top + m.bottom + title).round().max(1.0) as u32,
    );

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_chart(&root, frame, options).map_err(|e| ExportError::Draw(e.to_string()))?;
    }
    Ok(svg)
}

/// Write every chart to `dir/chart-<n>.svg`
pub fn export_dashboard(
    frame: &DashboardFrame,
    dir: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(frame.charts.len());
    for chart in &frame.charts {
        let path = dir.join(format!("chart-{}.svg", chart.id));
        std::fs::write(&path, chart_svg(chart, options)?)?;
        written.push(path);
    }
    info!("Exported {} charts to {:?}", written.len(), dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar_chart::{BarGeometry, ClipRect, Tick};
    use crate::record_list::{ListFrame, ListPatch};
    use xf_core::Measure;

    fn frame(brush: Option<(f64, f64)>) -> ChartFrame {
        ChartFrame {
            id: 4,
            measure: Measure::HeartRate,
            title: "Heart Rate (bpm)",
            width: 400.0,
            height: 100.0,
            bars: vec![BarGeometry { key: 55.0, count: 1, x: 59.0, y: 0.0 }],
            path: "M59,100V0h9V100".to_string(),
            y_max: 1,
            clip: ClipRect { x: 40.0, width: 60.0, height: 100.0 },
            brush,
            brush_redrawn: false,
            reset_visible: brush.is_some(),
            ticks: vec![Tick { px: 24.0, label: "40".to_string() }],
        }
    }

    #[test]
    fn test_svg_contents() {
        let svg = chart_svg(&frame(Some((40.0, 100.0))), &ExportOptions::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(r#"width="420""#));
        assert!(svg.contains(r#"height="150""#));
        assert!(svg.contains("Heart Rate (bpm)"));
        assert!(svg.contains(">40</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));

        let plain = chart_svg(&frame(None), &ExportOptions::default()).unwrap();
        // brush extent plus a filled and a stroked rect per handle
        assert_eq!(svg.matches("<rect").count(), plain.matches("<rect").count() + 5);
    }

    #[test]
    fn test_svg_without_brush_or_title() {
        let options = ExportOptions { include_title: false, include_axis: false, ..Default::default() };
        let svg = chart_svg(&frame(None), &options).unwrap();
        assert!(svg.contains(r#"height="130""#));
        assert!(!svg.contains("Heart Rate"));
        assert!(!svg.contains("</text>"));
    }

    #[test]
    fn test_foreground_clipped_to_brush() {
        assert_eq!(clipped_span(59.0, 40.0, 60.0), Some((59.0, 68.0)));
        assert_eq!(clipped_span(95.0, 40.0, 60.0), Some((95.0, 100.0)));
        assert_eq!(clipped_span(120.0, 40.0, 60.0), None);
        assert_eq!(clipped_span(0.0, 0.0, 400.0), Some((0.0, 9.0)));
    }

    #[test]
    fn test_export_dashboard_writes_files() {
        let dir = std::env::temp_dir().join(format!("xf-export-{}", std::process::id()));
        let dashboard = DashboardFrame {
            charts: vec![frame(None)],
            list: ListFrame { groups: Vec::new(), patch: ListPatch::default() },
            active: 0,
            total: 0,
        };
        let written = export_dashboard(&dashboard, &dir, &ExportOptions::default()).unwrap();
        assert_eq!(written, vec![dir.join("chart-4.svg")]);
        assert!(std::fs::read_to_string(&written[0]).unwrap().contains("</svg>"));
        let _ = std::fs::remove_dir_all(dir);
    }
}
