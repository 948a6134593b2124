//! Synthetic sensor data for running the dashboard without a file

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use xf_core::SensorRecord;

use super::RecordSource;
use crate::IngestError;

/// Generates one reading per minute with daily rhythms and bursts of walking
pub struct DemoSource {
    start: DateTime<Utc>,
    total_rows: usize,
}

impl DemoSource {
    pub fn new(total_rows: usize) -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2015, 6, 28, 17, 0, 0).single().unwrap_or_default(),
            total_rows,
        }
    }

    /// Deterministic reading for minute `idx`
    pub fn generate(&self, idx: usize) -> SensorRecord {
        let t = idx as f64;
        let timestamp = self.start + Duration::minutes(idx as i64);

        // Pseudo-random but reproducible
        let noise = (t * 12345.6789).sin();
        let day_phase = (t / 1440.0) * std::f64::consts::TAU;

        let walking = (t / 37.0).sin() > 0.7;
        let steps = if walking { (60.0 + noise.abs() * 60.0) as i64 } else { (noise.abs() * 4.0) as i64 };

        let exertion = if walking { 35.0 } else { 0.0 };
        let heart_rate = (62.0 + day_phase.sin() * 8.0 + exertion + noise * 5.0) as i64;
        let skin_temp = 91.5 + day_phase.cos() * 2.0 + noise * 0.6;
        let calories = ((1.2 + steps as f64 * 0.04 + noise.abs() * 0.3) * 10.0).round() / 10.0;

        // The sensor drops GSR readings now and then
        let gsr = if idx % 97 == 13 {
            f64::NAN
        } else {
            0.0005 + (day_phase * 3.0).sin().abs() * 0.004 + noise.abs() * 0.0008
        };

        SensorRecord {
            index: idx,
            timestamp,
            calories,
            gsr,
            heart_rate,
            skin_temp,
            steps,
        }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new(4 * 1440)
    }
}

#[async_trait]
impl RecordSource for DemoSource {
    async fn load(&self) -> Result<Vec<SensorRecord>, IngestError> {
        Ok((0..self.total_rows).map(|idx| self.generate(idx)).collect())
    }

    fn source_name(&self) -> &str {
        "demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_rows_are_valid() {
        let records = DemoSource::new(2000).load().await.unwrap();
        assert_eq!(records.len(), 2000);
        assert!(records.iter().enumerate().all(|(i, r)| r.index == i));
        assert!(records.iter().all(|r| r.steps >= 0 && r.calories >= 0.0));
        assert!(records.iter().any(|r| r.gsr.is_nan()));
        assert!(records.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let source = DemoSource::default();
        assert_eq!(source.generate(500).heart_rate, source.generate(500).heart_rate);
    }
}
