//! The measured attributes a chart can be bound to

use serde::{Deserialize, Serialize};

use crate::filter::Bucket;
use crate::record::SensorRecord;

/// Bucket width of the GSR histogram
pub const GSR_BUCKET_STEP: f64 = 0.00025;

/// A derived per-record key used for filtering and aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    HourOfDay,
    Calories,
    Gsr,
    SkinTemp,
    HeartRate,
    Steps,
    Date,
}

impl Measure {
    pub const ALL: [Measure; 7] = [
        Measure::HourOfDay,
        Measure::Calories,
        Measure::Gsr,
        Measure::SkinTemp,
        Measure::HeartRate,
        Measure::Steps,
        Measure::Date,
    ];

    /// Dimension key for a record.
    ///
    /// Missing GSR readings key as `0.0`, so they land in the first bucket
    /// and stay filterable.
    pub fn key(&self, record: &SensorRecord) -> f64 {
        match self {
            Measure::HourOfDay => record.hour_of_day(),
            Measure::Calories => record.calories,
            Measure::Gsr => {
                if record.gsr.is_nan() {
                    0.0
                } else {
                    record.gsr
                }
            }
            Measure::SkinTemp => record.skin_temp,
            Measure::HeartRate => record.heart_rate as f64,
            Measure::Steps => record.steps as f64,
            Measure::Date => record.epoch_ms(),
        }
    }

    /// Default grouping for the measure's histogram
    pub fn default_bucket(&self) -> Bucket {
        match self {
            Measure::HourOfDay | Measure::SkinTemp | Measure::Steps => Bucket::Floor { step: 1.0 },
            Measure::Calories => Bucket::Identity,
            Measure::Gsr => Bucket::Floor { step: GSR_BUCKET_STEP },
            Measure::HeartRate => Bucket::Floor { step: 5.0 },
            Measure::Date => Bucket::Day,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Measure::HourOfDay => "hour",
            Measure::Calories => "calories",
            Measure::Gsr => "gsr",
            Measure::SkinTemp => "skin-temp",
            Measure::HeartRate => "heart-rate",
            Measure::Steps => "steps",
            Measure::Date => "date",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Measure::HourOfDay => "Time of Day",
            Measure::Calories => "Calories",
            Measure::Gsr => "Galvanic Skin Response",
            Measure::SkinTemp => "Skin Temperature (°F)",
            Measure::HeartRate => "Heart Rate (bpm)",
            Measure::Steps => "Steps",
            Measure::Date => "Date",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_missing_gsr_keys_as_zero() {
        let record = SensorRecord {
            index: 3,
            timestamp: Utc.with_ymd_and_hms(2015, 6, 28, 17, 1, 0).unwrap(),
            calories: 2.1,
            gsr: f64::NAN,
            heart_rate: 66,
            skin_temp: 92.3,
            steps: 0,
        };
        let key = Measure::Gsr.key(&record);
        assert_eq!(key, 0.0);
        assert_eq!(Measure::Gsr.default_bucket().key(key), 0.0);
    }
}
