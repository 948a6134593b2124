//! Picking and loading the record source

use std::path::PathBuf;

use anyhow::{Context, Result};
use xf_core::{DashboardSettings, SensorRecord};
use xf_data::{CsvSource, DemoSource, NullConfig, RecordSource};

/// Where the records come from
#[derive(Debug, Clone, PartialEq)]
pub enum DataChoice {
    Csv(PathBuf),
    Demo,
}

impl DataChoice {
    /// `--demo` wins over a path; neither means nothing to load yet
    pub fn from_args(data: Option<PathBuf>, demo: bool) -> Option<Self> {
        if demo {
            return Some(DataChoice::Demo);
        }
        data.map(DataChoice::Csv)
    }

    pub fn label(&self) -> String {
        match self {
            DataChoice::Csv(path) => path.display().to_string(),
            DataChoice::Demo => "demo data".to_string(),
        }
    }
}

/// Records ready to build a dashboard from
#[derive(Debug)]
pub struct LoadedRecords {
    pub source_name: String,
    pub records: Vec<SensorRecord>,
}

fn source_for(choice: &DataChoice, settings: &DashboardSettings) -> Box<dyn RecordSource> {
    match choice {
        DataChoice::Csv(path) => Box::new(
            CsvSource::new(path.clone()).with_nulls(NullConfig::from_tokens(&settings.null_tokens)),
        ),
        DataChoice::Demo => Box::new(DemoSource::default()),
    }
}

/// Load every record. Any malformed row fails the whole load.
pub async fn load(choice: &DataChoice, settings: &DashboardSettings) -> Result<LoadedRecords> {
    let source = source_for(choice, settings);
    let records = source
        .load()
        .await
        .with_context(|| format!("Failed to load {}", choice.label()))?;
    Ok(LoadedRecords {
        source_name: source.source_name().to_string(),
        records,
    })
}
