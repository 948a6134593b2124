//! Record sources

pub mod csv_source;
pub mod demo_source;

pub use csv_source::CsvSource;
pub use demo_source::DemoSource;

use async_trait::async_trait;
use xf_core::SensorRecord;

use crate::IngestError;

/// Something the dashboard can ingest its records from.
///
/// Loading happens exactly once, before the dashboard is built.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Read and coerce the whole record set
    async fn load(&self) -> Result<Vec<SensorRecord>, IngestError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
