//! Painter-drawn histogram with a draggable brush

use egui::{pos2, vec2, Align2, FontId, Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui};
use xf_views::bar_chart::BAR_WIDTH;
use xf_views::export::Margin;
use xf_views::{BarGeometry, ChartFrame};

use crate::theme::ChartPalette;
use crate::widget_utils::WidgetId;

/// Pointer input on a chart, in plot pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushGesture {
    Start(f64),
    Move(f64),
    End,
}

/// What the user did to a chart this frame
#[derive(Debug, Default)]
pub struct ChartResponse {
    pub gestures: Vec<BrushGesture>,
    pub reset_clicked: bool,
}

/// Gestures for a drag that just passed egui's drag threshold: the brush is
/// anchored where the button went down, then follows the pointer
fn drag_start_gestures(pressed: Option<f64>, current: Option<f64>) -> Vec<BrushGesture> {
    let Some(anchor) = pressed.or(current) else {
        return Vec::new();
    };
    let mut gestures = vec![BrushGesture::Start(anchor)];
    if let Some(x) = current {
        gestures.push(BrushGesture::Move(x));
    }
    gestures
}

fn bar_rect(origin: Pos2, bar: &BarGeometry, height: f64) -> Rect {
    Rect::from_min_max(
        pos2(origin.x + bar.x as f32, origin.y + bar.y as f32),
        pos2(origin.x + (bar.x + BAR_WIDTH) as f32, origin.y + height as f32),
    )
}

/// Draw one chart and collect its input
pub fn chart_ui(ui: &mut Ui, frame: &ChartFrame, palette: &ChartPalette) -> ChartResponse {
    let mut out = ChartResponse::default();
    let margin = Margin::default();

    ui.push_id(WidgetId::chart(frame.id).id(), |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(frame.title).strong());
            if frame.reset_visible && ui.link("reset").clicked() {
                out.reset_clicked = true;
            }
        });

        let size = vec2(
            (frame.width + margin.left + margin.right) as f32,
            (frame.height + margin.top + margin.bottom) as f32,
        );
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        let origin = rect.min + vec2(margin.left as f32, margin.top as f32);
        let painter = ui.painter_at(rect);
        let height = frame.height as f32;

        for bar in &frame.bars {
            painter.rect_filled(bar_rect(origin, bar, frame.height), Rounding::ZERO, palette.background_bar);
        }

        let clip = Rect::from_min_size(
            origin + vec2(frame.clip.x as f32, 0.0),
            vec2(frame.clip.width as f32, frame.clip.height as f32),
        );
        let foreground = painter.with_clip_rect(clip.intersect(rect));
        for bar in &frame.bars {
            foreground.rect_filled(bar_rect(origin, bar, frame.height), Rounding::ZERO, palette.foreground_bar);
        }

        // x axis
        let axis_y = origin.y + height;
        let stroke = Stroke::new(1.0, palette.axis);
        painter.line_segment([pos2(origin.x, axis_y), pos2(origin.x + frame.width as f32, axis_y)], stroke);
        for tick in &frame.ticks {
            let x = origin.x + tick.px as f32;
            painter.line_segment([pos2(x, axis_y), pos2(x, axis_y + 6.0)], stroke);
            painter.text(
                pos2(x, axis_y + 7.0),
                Align2::CENTER_TOP,
                &tick.label,
                FontId::proportional(10.0),
                palette.label,
            );
        }

        if let Some((lo, hi)) = frame.brush {
            let extent = Rect::from_min_max(
                pos2(origin.x + lo as f32, origin.y),
                pos2(origin.x + hi as f32, axis_y),
            );
            painter.rect_filled(extent, Rounding::ZERO, palette.brush_fill);
            for (x, east) in [(lo as f32, false), (hi as f32, true)] {
                let (left, right) = if east { (0.5, 6.5) } else { (-6.5, -0.5) };
                let handle = Rect::from_min_max(
                    pos2(origin.x + x + left, origin.y + height / 3.0),
                    pos2(origin.x + x + right, origin.y + 2.0 * height / 3.0),
                );
                painter.rect(
                    handle,
                    Rounding::same(3.0),
                    palette.handle_fill,
                    Stroke::new(1.0, palette.handle_stroke),
                );
            }
        }

        let px = |pos: Option<Pos2>| pos.map(|p| (p.x - origin.x) as f64);
        if response.drag_started() {
            let pressed = px(ui.input(|i| i.pointer.press_origin()));
            out.gestures
                .extend(drag_start_gestures(pressed, px(response.interact_pointer_pos())));
        } else if response.dragged() {
            if let Some(x) = px(response.interact_pointer_pos()) {
                out.gestures.push(BrushGesture::Move(x));
            }
        }
        if response.drag_released() {
            out.gestures.push(BrushGesture::End);
        } else if response.clicked() {
            // outside the selection this clears it
            if let Some(x) = px(response.interact_pointer_pos()) {
                out.gestures.push(BrushGesture::Start(x));
                out.gestures.push(BrushGesture::End);
            }
        }
    });

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_anchors_at_press() {
        assert_eq!(
            drag_start_gestures(Some(40.0), Some(46.0)),
            vec![BrushGesture::Start(40.0), BrushGesture::Move(46.0)]
        );
        assert_eq!(drag_start_gestures(None, Some(46.0)), vec![BrushGesture::Start(46.0), BrushGesture::Move(46.0)]);
        assert!(drag_start_gestures(None, None).is_empty());
    }

    #[test]
    fn test_bar_rect_spans_to_baseline() {
        let bar = BarGeometry { key: 55.0, count: 3, x: 59.0, y: 40.0 };
        let rect = bar_rect(pos2(10.0, 10.0), &bar, 100.0);
        assert_eq!(rect.min, pos2(69.0, 50.0));
        assert_eq!(rect.max, pos2(78.0, 110.0));
    }
}
