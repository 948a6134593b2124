//! Record ingestion and the cross-filter index

pub mod index;
pub mod ingest;
pub mod sources;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use index::{CrossIndex, DimensionId, GroupId, IndexError, SortOrder};
pub use ingest::{read_records, NullConfig};
pub use sources::{CsvSource, DemoSource, RecordSource};

/// Errors raised while ingesting the record set.
///
/// Any of these is fatal: no dashboard is built from a partial dataset.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Line {line}: column '{column}' value '{value}' is out of range")]
    OutOfRange {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Line {line}: unparsable timestamp '{value}'")]
    InvalidTimestamp {
        line: u64,
        value: String,
    },

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for IngestError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => IngestError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => IngestError::Csv(error.to_string()),
        }
    }
}
