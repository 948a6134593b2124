//! Dashboard settings

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{Bucket, FilterRange, Rounding};
use crate::measure::Measure;

/// Errors while loading or saving settings files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Horizontal domain of a chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Domain {
    Fixed { min: f64, max: f64 },
    /// From the first to the last record's key, in input order
    DataExtent,
}

/// Filter a chart starts with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialFilter {
    /// Same as the data extent domain
    FullExtent,
    Range { lo: f64, hi: f64 },
}

/// Settings for one histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    pub measure: Measure,

    /// Overrides the measure's default bucketing
    #[serde(default)]
    pub bucket: Option<Bucket>,

    pub domain: Domain,

    /// Plot width in pixels
    pub width_px: f64,

    /// Plot height in pixels
    #[serde(default = "default_height")]
    pub height_px: f64,

    #[serde(default)]
    pub rounding: Option<Rounding>,

    #[serde(default)]
    pub initial_filter: Option<InitialFilter>,
}

fn default_height() -> f64 {
    100.0
}

impl ChartSettings {
    pub fn new(measure: Measure, min: f64, max: f64, width_px: f64) -> Self {
        Self {
            measure,
            bucket: None,
            domain: Domain::Fixed { min, max },
            width_px,
            height_px: default_height(),
            rounding: None,
            initial_filter: None,
        }
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket.unwrap_or_else(|| self.measure.default_bucket())
    }

    /// Resolve the initial filter against the data extent
    pub fn initial_range(&self, extent: (f64, f64)) -> Option<FilterRange> {
        match self.initial_filter? {
            InitialFilter::FullExtent => Some(FilterRange::new(extent.0, extent.1)),
            InitialFilter::Range { lo, hi } => Some(FilterRange::new(lo, hi)),
        }
    }
}

/// Settings for the whole dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Number of records shown in the list view
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,

    /// Charts in display order; the position is the chart index
    pub charts: Vec<ChartSettings>,

    /// Cell contents treated as a missing GSR reading
    #[serde(default = "default_null_tokens")]
    pub null_tokens: Vec<String>,
}

fn default_list_limit() -> usize {
    40
}

fn default_null_tokens() -> Vec<String> {
    vec![
        String::new(),
        "NaN".to_string(),
        "N/A".to_string(),
        "null".to_string(),
        "-".to_string(),
    ]
}

impl Default for DashboardSettings {
    fn default() -> Self {
        let mut date = ChartSettings::new(Measure::Date, 0.0, 0.0, 900.0);
        date.domain = Domain::DataExtent;
        date.rounding = Some(Rounding::Day);
        date.initial_filter = Some(InitialFilter::FullExtent);

        Self {
            list_limit: default_list_limit(),
            charts: vec![
                ChartSettings::new(Measure::HourOfDay, 0.0, 24.0, 240.0),
                ChartSettings::new(Measure::Calories, 0.0, 5.0, 210.0),
                ChartSettings::new(Measure::Gsr, 0.00001, 0.01, 400.0),
                ChartSettings::new(Measure::SkinTemp, 80.0, 105.0, 400.0),
                ChartSettings::new(Measure::HeartRate, 30.0, 200.0, 400.0),
                ChartSettings::new(Measure::Steps, 0.0, 200.0, 400.0),
                date,
            ],
            null_tokens: default_null_tokens(),
        }
    }
}

impl DashboardSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_seven_charts() {
        let settings = DashboardSettings::default();
        assert_eq!(settings.charts.len(), 7);
        assert_eq!(settings.list_limit, 40);
        assert_eq!(settings.charts[6].measure, Measure::Date);
        assert_eq!(settings.charts[6].rounding, Some(Rounding::Day));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "charts": [
                { "measure": "heart_rate", "domain": { "kind": "fixed", "min": 30, "max": 200 }, "width_px": 400 }
            ]
        }"#;
        let settings: DashboardSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.list_limit, 40);
        assert_eq!(settings.charts[0].height_px, 100.0);
        assert_eq!(settings.charts[0].bucket(), Bucket::Floor { step: 5.0 });
        assert!(settings.null_tokens.contains(&"NaN".to_string()));
    }

    #[test]
    fn test_initial_range() {
        let mut chart = ChartSettings::new(Measure::Date, 0.0, 1.0, 100.0);
        assert_eq!(chart.initial_range((5.0, 9.0)), None);
        chart.initial_filter = Some(InitialFilter::FullExtent);
        assert_eq!(chart.initial_range((5.0, 9.0)), Some(FilterRange::new(5.0, 9.0)));
        chart.initial_filter = Some(InitialFilter::Range { lo: 3.0, hi: 1.0 });
        assert_eq!(chart.initial_range((5.0, 9.0)), Some(FilterRange::new(1.0, 3.0)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("xf-settings-{}", std::process::id()));
        let path = dir.join("settings.json");
        let settings = DashboardSettings::default();
        settings.save(&path).unwrap();
        let loaded = DashboardSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
