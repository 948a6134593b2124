//! Sensor record model

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one UTC day
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// One sensor reading.
///
/// Records are immutable once ingested. `index` is the sequence index assigned
/// at load time in input order and is used as the record's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Sequence index (input order)
    pub index: usize,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,

    /// Calorie estimate for the sample
    pub calories: f64,

    /// Galvanic skin response, NaN when the sensor reported nothing
    pub gsr: f64,

    /// Heart rate in bpm
    pub heart_rate: i64,

    /// Skin temperature in °F
    pub skin_temp: f64,

    /// Step count
    pub steps: i64,
}

impl SensorRecord {
    /// Timestamp as epoch milliseconds, the value space of the date chart
    pub fn epoch_ms(&self) -> f64 {
        self.timestamp.timestamp_millis() as f64
    }

    /// Fractional hour of day in UTC, e.g. 17:30 -> 17.5
    pub fn hour_of_day(&self) -> f64 {
        self.timestamp.hour() as f64 + self.timestamp.minute() as f64 / 60.0
    }
}
