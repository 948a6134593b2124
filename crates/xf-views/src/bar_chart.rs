//! Bar chart frames
//!
//! A [`ChartFrame`] is everything needed to draw one histogram: bar geometry
//! in pixels, the SVG bar path, the foreground clip rectangle, the brush and
//! the axis ticks. Frames are plain data so the egui front-end and the SVG
//! export draw the same thing.

use chrono::{DateTime, Utc};
use xf_core::{Measure, SensorRecord, MS_PER_DAY};
use xf_data::{CrossIndex, IndexError};

use crate::coordinator::ChartCoordinator;
use crate::format::format_tick;
use crate::scale::{tick_step, LinearScale};

/// Bar width in pixels, fixed like the `h9` in the path
pub const BAR_WIDTH: f64 = 9.0;

/// Approximate number of x axis ticks
const TICK_COUNT: usize = 10;

/// One bucket of the histogram in pixel space
#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub key: f64,
    pub count: usize,
    /// Left edge
    pub x: f64,
    /// Top edge; the bar runs down to the chart height
    pub y: f64,
}

/// Foreground clip rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub px: f64,
    pub label: String,
}

/// Render output for one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub id: usize,
    pub measure: Measure,
    pub title: &'static str,
    pub width: f64,
    pub height: f64,
    pub bars: Vec<BarGeometry>,
    /// Bars as one SVG path, shared by the background and foreground layers
    pub path: String,
    pub y_max: usize,
    pub clip: ClipRect,
    /// Brush extent in pixels
    pub brush: Option<(f64, f64)>,
    /// The brush was set programmatically since the last frame
    pub brush_redrawn: bool,
    pub reset_visible: bool,
    pub ticks: Vec<Tick>,
}

impl ChartFrame {
    pub(crate) fn build(
        chart: &mut ChartCoordinator,
        index: &CrossIndex<SensorRecord>,
    ) -> Result<Self, IndexError> {
        let height = chart.height();
        let groups = index.group_all(chart.group())?;
        let y_max = index.group_max(chart.group())?;
        let y = LinearScale::new((0.0, y_max as f64), (height, 0.0));

        let bars: Vec<BarGeometry> = groups
            .into_iter()
            .map(|(key, count)| BarGeometry {
                key,
                count,
                x: chart.x().map(key),
                y: y.map(count as f64),
            })
            .collect();

        let brush_redrawn = chart.take_brush_dirty();
        let (clip_x, clip_width) = chart.clip();

        Ok(Self {
            id: chart.id(),
            measure: chart.measure(),
            title: chart.measure().title(),
            width: chart.width(),
            height,
            path: bar_path(&bars, height),
            bars,
            y_max,
            clip: ClipRect { x: clip_x, width: clip_width, height },
            brush: chart.brush_px(),
            brush_redrawn,
            reset_visible: chart.reset_visible(),
            ticks: axis_ticks(chart.measure(), chart.x()),
        })
    }
}

/// `M{x},{h}V{y}h9V{h}` for every bar
pub fn bar_path(bars: &[BarGeometry], height: f64) -> String {
    let mut path = String::new();
    for bar in bars {
        path.push_str(&format!("M{},{}V{}h9V{}", bar.x, height, bar.y, height));
    }
    path
}

/// Rounded grip drawn on the east or west edge of the brush
pub fn resize_handle_path(east: bool, height: f64) -> String {
    let e = if east { 1 } else { 0 };
    let x = if east { 1.0 } else { -1.0 };
    let y = height / 3.0;
    format!(
        "M{},{}A6,6 0 0 {} {},{}V{}A6,6 0 0 {} {},{}ZM{},{}V{}M{},{}V{}",
        0.5 * x,
        y,
        e,
        6.5 * x,
        y + 6.0,
        2.0 * y - 6.0,
        e,
        0.5 * x,
        2.0 * y,
        2.5 * x,
        y + 8.0,
        2.0 * y - 8.0,
        4.5 * x,
        y + 8.0,
        2.0 * y - 8.0,
    )
}

fn axis_ticks(measure: Measure, x: &LinearScale) -> Vec<Tick> {
    match measure {
        Measure::Date => date_ticks(x),
        _ => {
            let (lo, hi) = x.domain;
            let step = tick_step(lo.min(hi), lo.max(hi), TICK_COUNT);
            x.ticks(TICK_COUNT)
                .into_iter()
                .map(|value| Tick { px: x.map(value), label: format_tick(value, step) })
                .collect()
        }
    }
}

/// Ticks on UTC midnights, every `n` days
fn date_ticks(x: &LinearScale) -> Vec<Tick> {
    let lo = x.domain.0.min(x.domain.1) / MS_PER_DAY;
    let hi = x.domain.0.max(x.domain.1) / MS_PER_DAY;
    let step = tick_step(lo, hi, TICK_COUNT).ceil().max(1.0);
    if !step.is_finite() || hi <= lo {
        return Vec::new();
    }
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last)
        .filter_map(|i| {
            let ms = i as f64 * step * MS_PER_DAY;
            let day = DateTime::<Utc>::from_timestamp_millis(ms as i64)?;
            Some(Tick { px: x.map(ms), label: day.format("%b %d").to_string() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xf_core::Bucket;

    fn record(index: usize, heart_rate: i64) -> SensorRecord {
        SensorRecord {
            index,
            timestamp: DateTime::<Utc>::from_timestamp_millis(1_435_510_800_000 + index as i64 * 60_000)
                .unwrap_or_default(),
            calories: 1.0,
            gsr: 0.001,
            heart_rate,
            skin_temp: 90.0,
            steps: 0,
        }
    }

    #[test]
    fn test_bar_path_format() {
        let bars = vec![
            BarGeometry { key: 55.0, count: 2, x: 59.0, y: 0.0 },
            BarGeometry { key: 200.0, count: 1, x: 400.0, y: 50.0 },
        ];
        assert_eq!(bar_path(&bars, 100.0), "M59,100V0h9V100M400,100V50h9V100");
        assert_eq!(bar_path(&[], 100.0), "");
    }

    #[test]
    fn test_resize_handle_paths() {
        assert_eq!(
            resize_handle_path(true, 90.0),
            "M0.5,30A6,6 0 0 1 6.5,36V54A6,6 0 0 1 0.5,60ZM2.5,38V52M4.5,38V52"
        );
        assert_eq!(
            resize_handle_path(false, 90.0),
            "M-0.5,30A6,6 0 0 0 -6.5,36V54A6,6 0 0 0 -0.5,60ZM-2.5,38V52M-4.5,38V52"
        );
    }

    #[test]
    fn test_frame_geometry() {
        let mut index = CrossIndex::new(vec![record(0, 59), record(1, 66), record(2, 68), record(3, 200)]);
        let dim = index
            .add_dimension("heart-rate", |r: &SensorRecord| Measure::HeartRate.key(r))
            .unwrap();
        let group = index.add_group(dim, Bucket::Floor { step: 5.0 }).unwrap();
        let x = LinearScale::rounded((30.0, 200.0), (0.0, 400.0));
        let mut chart = ChartCoordinator::new(4, Measure::HeartRate, dim, group, x, 100.0, None);

        let frame = ChartFrame::build(&mut chart, &index).unwrap();
        assert_eq!(frame.y_max, 2);
        assert_eq!(frame.bars.len(), 3);
        // the 65 bucket holds two readings and reaches the top
        assert_eq!(frame.bars[1].y, 0.0);
        assert_eq!(frame.bars[0].y, 50.0);
        assert_eq!(frame.bars[2].x, 400.0);
        assert_eq!(frame.clip, ClipRect { x: 0.0, width: 400.0, height: 100.0 });
        assert!(frame.path.starts_with("M59,100V50h9V100"));
        assert_eq!(frame.ticks.first().map(|t| t.label.as_str()), Some("40"));
    }

    #[test]
    fn test_empty_group_sits_on_baseline() {
        let mut index = CrossIndex::new(vec![record(0, 59)]);
        let hr = index
            .add_dimension("heart-rate", |r: &SensorRecord| Measure::HeartRate.key(r))
            .unwrap();
        let steps = index
            .add_dimension("steps", |r: &SensorRecord| Measure::Steps.key(r))
            .unwrap();
        let group = index.add_group(hr, Bucket::Floor { step: 5.0 }).unwrap();
        index.set_filter(steps, Some((10.0, 20.0).into())).unwrap();

        let x = LinearScale::rounded((30.0, 200.0), (0.0, 400.0));
        let mut chart = ChartCoordinator::new(0, Measure::HeartRate, hr, group, x, 100.0, None);
        let frame = ChartFrame::build(&mut chart, &index).unwrap();
        assert_eq!(frame.y_max, 0);
        assert!(frame.bars.iter().all(|b| b.y == 100.0));
    }

    #[test]
    fn test_date_ticks_fall_on_midnights() {
        let x = LinearScale::rounded((1_435_449_600_000.0, 1_435_449_600_000.0 + 5.0 * MS_PER_DAY), (0.0, 900.0));
        let ticks = date_ticks(&x);
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].label, "Jun 28");
        assert_eq!(ticks[0].px, 0.0);
        assert_eq!(ticks[5].px, 900.0);
    }
}
