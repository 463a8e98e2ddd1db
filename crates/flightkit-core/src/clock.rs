//! HHMM clock strings for departure times and ETAs.

use crate::error::NavError;
use chrono::{NaiveTime, Timelike};

pub const MINUTES_PER_DAY: i64 = 1440;

/// Parse an `HHMM` (or `HH:MM`) clock time into minutes after midnight.
pub fn parse_hhmm(value: &str) -> Result<u32, NavError> {
    let trimmed = value.trim();
    let time = NaiveTime::parse_from_str(trimmed, "%H%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| {
            NavError::invalid(
                "departure_time",
                format!("expected an HHMM clock time, got {trimmed:?}"),
            )
        })?;
    Ok(time.hour() * 60 + time.minute())
}

/// Format minutes after midnight as `HHMM`, rounding to the nearest minute
/// and wrapping past midnight.
pub fn format_hhmm(minutes: f64) -> String {
    let wrapped = (minutes.round() as i64).rem_euclid(MINUTES_PER_DAY);
    let hours = (wrapped / 60) as u32;
    let mins = (wrapped % 60) as u32;
    NaiveTime::from_hms_opt(hours, mins, 0)
        .map(|time| time.format("%H%M").to_string())
        .unwrap_or_else(|| format!("{hours:02}{mins:02}"))
}

/// ETA for a departure clock time plus elapsed minutes.
pub fn eta_from_departure(departure_min: u32, elapsed_min: f64) -> String {
    format_hhmm(f64::from(departure_min) + elapsed_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_forms() {
        assert_eq!(parse_hhmm("0930").unwrap(), 570);
        assert_eq!(parse_hhmm("09:30").unwrap(), 570);
        assert_eq!(parse_hhmm(" 2359 ").unwrap(), 1439);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hhmm("2460").is_err());
        assert!(parse_hhmm("noon").is_err());
    }

    #[test]
    fn wraps_past_midnight() {
        assert_eq!(eta_from_departure(23 * 60 + 50, 25.0), "0015");
        assert_eq!(format_hhmm(1440.0 * 2.0 + 61.0), "0101");
    }

    #[test]
    fn rounds_only_when_formatting() {
        assert_eq!(eta_from_departure(600, 3.75), "1004");
        assert_eq!(eta_from_departure(600, 3.49), "1003");
    }
}
