use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;
use xf_core::SensorRecord;

use super::RecordSource;
use crate::ingest::{read_records, NullConfig};
use crate::IngestError;

/// CSV file with the sensor export columns
pub struct CsvSource {
    /// Path to the CSV file
    path: PathBuf,
    /// Tokens read as a missing GSR value
    nulls: NullConfig,
}

impl CsvSource {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            nulls: NullConfig::default(),
        }
    }

    pub fn with_nulls(mut self, nulls: NullConfig) -> Self {
        self.nulls = nulls;
        self
    }
}

#[async_trait]
impl RecordSource for CsvSource {
    async fn load(&self) -> Result<Vec<SensorRecord>, IngestError> {
        info!("Loading sensor records from {:?}", self.path);
        let path = self.path.clone();
        let nulls = self.nulls.clone();

        tokio::task::spawn_blocking(move || {
            let file = File::open(&path)?;
            read_records(BufReader::new(file), &nulls)
        })
        .await?
    }

    fn source_name(&self) -> &str {
        self.path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_csv(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("xf-{}-{}.csv", name, std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_file() {
        let path = temp_csv(
            "load",
            "date,calories,gsr,heart-rate,skin-temp,steps\n2015-06-28 17:00Z,2,0.10887,59,93.2,0\n",
        );
        let source = CsvSource::new(path.clone());
        let records = source.load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(source.source_name().starts_with("xf-load-"));
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = CsvSource::new(PathBuf::from("/definitely/not/here.csv"));
        assert!(matches!(source.load().await, Err(IngestError::Io(_))));
        assert_eq!(source.source_name(), "here.csv");
    }
}
