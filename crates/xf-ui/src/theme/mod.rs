use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Sensorboard Light".to_string(),
            dark_mode: false,
        }
    }
}

/// Colors used when painting charts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPalette {
    /// Bars outside the brush
    pub background_bar: Color32,
    /// Bars inside the brush
    pub foreground_bar: Color32,
    pub brush_fill: Color32,
    pub handle_fill: Color32,
    pub handle_stroke: Color32,
    pub axis: Color32,
    pub label: Color32,
}

impl ChartPalette {
    pub fn for_theme(theme: &Theme) -> Self {
        let foreground_bar = Color32::from_rgb(70, 130, 180); // steelblue
        if theme.dark_mode {
            Self {
                background_bar: Color32::from_rgb(70, 70, 70),
                foreground_bar,
                brush_fill: foreground_bar.linear_multiply(0.15),
                handle_fill: Color32::from_rgb(60, 60, 60),
                handle_stroke: Color32::from_rgb(160, 160, 160),
                axis: Color32::from_rgb(160, 160, 160),
                label: Color32::from_rgb(220, 220, 220),
            }
        } else {
            Self {
                background_bar: Color32::from_rgb(204, 204, 204),
                foreground_bar,
                brush_fill: foreground_bar.linear_multiply(0.125),
                handle_fill: Color32::from_rgb(238, 238, 238),
                handle_stroke: Color32::from_rgb(102, 102, 102),
                axis: Color32::from_rgb(0, 0, 0),
                label: Color32::from_rgb(51, 51, 51),
            }
        }
    }
}

/// Apply the application theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };

    let accent = accent_color();
    let rounding = Rounding::same(3.0);

    visuals.widgets.noninteractive.rounding = rounding;
    visuals.widgets.inactive.rounding = rounding;
    visuals.widgets.hovered.rounding = rounding;
    visuals.widgets.active.rounding = rounding;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);

    visuals.selection.bg_fill = accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    // The record list is a dense table
    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(10.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(20.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Link and selection color
pub fn accent_color() -> Color32 {
    Color32::from_rgb(70, 130, 180)
}

/// Get the error color for the theme
pub fn error_color() -> Color32 {
    Color32::from_rgb(230, 80, 80)
}
