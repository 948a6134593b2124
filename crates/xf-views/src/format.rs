//! Text formatting for counts, axis ticks and list rows

use chrono::{DateTime, Utc};

/// Integer with thousands separators, `12,345`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Tick label with just enough decimals for `step`
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    format!("{:.*}", decimals, value)
}

/// Day heading of the record list, `June 28, 2015`
pub fn format_day(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%B %d, %Y").to_string()
}

/// Time column of the record list, `05:00 PM`
pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(40.0, 20.0), "40");
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(0.002, 0.001), "0.002");
    }

    #[test]
    fn test_dates() {
        let ts = Utc.with_ymd_and_hms(2015, 6, 28, 17, 5, 0).unwrap();
        assert_eq!(format_day(&ts), "June 28, 2015");
        assert_eq!(format_time(&ts), "05:05 PM");
    }
}
