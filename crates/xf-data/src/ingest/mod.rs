//! Coercion of the untyped sensor table into records
//!
//! Every row must coerce cleanly. The first failure aborts the load with an
//! [`IngestError`] naming the line and column; no rows are skipped.

mod nulls;
mod timestamp;

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};
use xf_core::SensorRecord;

use crate::IngestError;

pub use nulls::NullConfig;
pub use timestamp::parse_timestamp;

pub const DATE_COLUMN: &str = "date";
pub const CALORIES_COLUMN: &str = "calories";
pub const GSR_COLUMN: &str = "gsr";
pub const HEART_RATE_COLUMN: &str = "heart-rate";
pub const SKIN_TEMP_COLUMN: &str = "skin-temp";
pub const STEPS_COLUMN: &str = "steps";

/// Header positions of the required columns
struct Columns {
    date: usize,
    calories: usize,
    gsr: usize,
    heart_rate: usize,
    skin_temp: usize,
    steps: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            date: find(DATE_COLUMN)?,
            calories: find(CALORIES_COLUMN)?,
            gsr: find(GSR_COLUMN)?,
            heart_rate: find(HEART_RATE_COLUMN)?,
            skin_temp: find(SKIN_TEMP_COLUMN)?,
            steps: find(STEPS_COLUMN)?,
        })
    }
}

/// One row being coerced, for error reporting
struct Row<'a> {
    record: &'a StringRecord,
    line: u64,
}

impl<'a> Row<'a> {
    fn cell(&self, position: usize) -> &'a str {
        self.record.get(position).unwrap_or("").trim()
    }

    fn invalid(&self, column: &str, value: &str) -> IngestError {
        IngestError::InvalidNumber {
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn float(&self, position: usize, column: &str) -> Result<f64, IngestError> {
        let value = self.cell(position);
        match value.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.invalid(column, value)),
        }
    }

    /// Integers may be written as `66` or `66.0`
    fn integer(&self, position: usize, column: &str) -> Result<i64, IngestError> {
        let value = self.cell(position);
        if let Ok(v) = value.parse::<i64>() {
            return Ok(v);
        }
        match value.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
            _ => Err(self.invalid(column, value)),
        }
    }

    fn non_negative<N: PartialOrd + Default>(&self, value: N, position: usize, column: &str) -> Result<N, IngestError> {
        if value < N::default() {
            return Err(IngestError::OutOfRange {
                line: self.line,
                column: column.to_string(),
                value: self.cell(position).to_string(),
            });
        }
        Ok(value)
    }
}

/// Read and coerce every row of a sensor CSV.
///
/// Sequence indices are assigned in input order starting at zero.
pub fn read_records<R: Read>(reader: R, nulls: &NullConfig) -> Result<Vec<SensorRecord>, IngestError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = Columns::locate(csv_reader.headers()?)?;
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let raw = result?;
        let index = records.len();
        let row = Row {
            record: &raw,
            // header is line 1
            line: raw.position().map(|p| p.line()).unwrap_or(index as u64 + 2),
        };

        let date = row.cell(columns.date);
        let timestamp = parse_timestamp(date).ok_or_else(|| IngestError::InvalidTimestamp {
            line: row.line,
            value: date.to_string(),
        })?;

        let gsr = if nulls.is_null(row.cell(columns.gsr)) {
            f64::NAN
        } else {
            row.float(columns.gsr, GSR_COLUMN)?
        };

        let calories = row.float(columns.calories, CALORIES_COLUMN)?;
        let steps = row.integer(columns.steps, STEPS_COLUMN)?;

        records.push(SensorRecord {
            index,
            timestamp,
            calories: row.non_negative(calories, columns.calories, CALORIES_COLUMN)?,
            gsr,
            heart_rate: row.integer(columns.heart_rate, HEART_RATE_COLUMN)?,
            skin_temp: row.float(columns.skin_temp, SKIN_TEMP_COLUMN)?,
            steps: row.non_negative(steps, columns.steps, STEPS_COLUMN)?,
        });
    }

    let missing_gsr = records.iter().filter(|r| r.gsr.is_nan()).count();
    if missing_gsr > 0 {
        debug!("{} records without a GSR reading", missing_gsr);
    }
    info!("Ingested {} sensor records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
date,calories,gsr,heart-rate,skin-temp,steps
2015-06-28 17:00Z,2,0.10887,59,93.2,0
2015-06-28 17:01Z,2.1,0.00135857,66,92.3,0
2015-06-28 17:02Z,1.4,,200,91.0,12
";

    #[test]
    fn test_read_sample() {
        let records = read_records(SAMPLE.as_bytes(), &NullConfig::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(records[0].heart_rate, 59);
        assert_eq!(records[1].calories, 2.1);
        assert_eq!(records[1].skin_temp, 92.3);
        assert!(records[2].gsr.is_nan());
        assert_eq!(records[2].steps, 12);
        assert_eq!(records[1].hour_of_day(), 17.0 + 1.0 / 60.0);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "steps,heart-rate,date,gsr,calories,skin-temp\n3,70,2015-06-28 17:00Z,NaN,1,90\n";
        let records = read_records(csv.as_bytes(), &NullConfig::default()).unwrap();
        assert_eq!(records[0].steps, 3);
        assert_eq!(records[0].heart_rate, 70);
        assert!(records[0].gsr.is_nan());
    }

    #[test]
    fn test_non_numeric_heart_rate_is_fatal() {
        let csv = "date,calories,gsr,heart-rate,skin-temp,steps\n\
                   2015-06-28 17:00Z,2,0.1,59,93.2,0\n\
                   2015-06-28 17:01Z,2,0.1,fast,93.2,0\n";
        let err = read_records(csv.as_bytes(), &NullConfig::default()).unwrap_err();
        match err {
            IngestError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, HEART_RATE_COLUMN);
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let csv = "date,calories,gsr,heart-rate,skin-temp,steps\nsoon,2,0.1,59,93.2,0\n";
        let err = read_records(csv.as_bytes(), &NullConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::InvalidTimestamp { line: 2, .. }));
    }

    #[test]
    fn test_missing_column() {
        let csv = "date,calories,gsr,skin-temp,steps\n";
        let err = read_records(csv.as_bytes(), &NullConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(ref c) if c == HEART_RATE_COLUMN));
    }

    #[test]
    fn test_negative_steps_rejected() {
        let csv = "date,calories,gsr,heart-rate,skin-temp,steps\n2015-06-28 17:00Z,2,0.1,59,93.2,-4\n";
        let err = read_records(csv.as_bytes(), &NullConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::OutOfRange { .. }));
    }

    #[test]
    fn test_integer_written_as_float() {
        let csv = "date,calories,gsr,heart-rate,skin-temp,steps\n2015-06-28 17:00Z,2,0.1,59.0,93.2,7.0\n";
        let records = read_records(csv.as_bytes(), &NullConfig::default()).unwrap();
        assert_eq!(records[0].heart_rate, 59);
        assert_eq!(records[0].steps, 7);
    }

    #[test]
    fn test_empty_heart_rate_is_fatal() {
        let csv = "date,calories,gsr,heart-rate,skin-temp,steps\n2015-06-28 17:00Z,2,0.1,,93.2,0\n";
        assert!(read_records(csv.as_bytes(), &NullConfig::default()).is_err());
    }
}
