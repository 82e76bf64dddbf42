//! Clock-time arithmetic for shift windows.
//!
//! All values are minutes since midnight. An overnight shift (end <= start)
//! is modeled as ending at midnight of the day it starts on; the part after
//! midnight only exists if the following weekday has its own shift row.

use chrono::{NaiveDateTime, Timelike};
use thiserror::Error;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Errors raised while validating shift configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShiftTimeError {
    #[error("Invalid time of day: {0:?} (expected HH:MM or HH:MM:SS)")]
    InvalidTimeOfDay(String),
    #[error("Invalid day of week: {0} (expected 0=Sunday..6=Saturday)")]
    InvalidDayOfWeek(u8),
}

/// Parse `HH:MM` or `HH:MM:SS` into minutes since midnight.
///
/// Seconds are validated but otherwise ignored.
pub fn time_of_day_to_minutes(time: &str) -> Result<u32, ShiftTimeError> {
    let invalid = || ShiftTimeError::InvalidTimeOfDay(time.to_string());

    let parts: Vec<&str> = time.trim().split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(invalid());
    }

    let mut fields = [0u32; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse().map_err(|_| invalid())?;
    }

    let [hours, minutes, seconds] = fields;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

/// Whether a shift crosses midnight.
#[inline]
pub fn is_overnight_shift(start: u32, end: u32) -> bool {
    end <= start
}

/// End of the shift on the day it starts (midnight for overnight shifts).
#[inline]
pub fn effective_end(start: u32, end: u32) -> u32 {
    if is_overnight_shift(start, end) {
        MINUTES_PER_DAY
    } else {
        end
    }
}

/// Capacity left in a shift when the clock stands at `current`.
pub fn available_minutes(current: u32, start: u32, end: u32) -> u32 {
    effective_end(start, end).saturating_sub(current.max(start))
}

/// Minutes since midnight of an instant, seconds truncated.
#[inline]
pub fn minute_of_day(instant: NaiveDateTime) -> u32 {
    instant.time().num_seconds_from_midnight() / 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_hh_mm() {
        assert_eq!(time_of_day_to_minutes("00:00"), Ok(0));
        assert_eq!(time_of_day_to_minutes("08:00"), Ok(480));
        assert_eq!(time_of_day_to_minutes("23:59"), Ok(1439));
        assert_eq!(time_of_day_to_minutes("6:30"), Ok(390));
    }

    #[test]
    fn test_parse_hh_mm_ss() {
        assert_eq!(time_of_day_to_minutes("22:00:00"), Ok(1320));
        assert_eq!(time_of_day_to_minutes("13:45:59"), Ok(825));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "8", "24:00", "12:60", "12:00:60", "ab:cd", "12:", "1:2:3:4", "-1:00"] {
            assert!(
                matches!(time_of_day_to_minutes(bad), Err(ShiftTimeError::InvalidTimeOfDay(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_overnight_detection() {
        assert!(is_overnight_shift(1320, 360)); // 22:00-06:00
        assert!(is_overnight_shift(480, 480)); // equal times count as overnight
        assert!(!is_overnight_shift(480, 960));
    }

    #[test]
    fn test_effective_end() {
        assert_eq!(effective_end(1320, 360), MINUTES_PER_DAY);
        assert_eq!(effective_end(480, 960), 960);
    }

    #[test]
    fn test_available_minutes() {
        // Before the shift: full capacity
        assert_eq!(available_minutes(0, 480, 960), 480);
        // Mid shift
        assert_eq!(available_minutes(600, 480, 960), 360);
        // Shift already over
        assert_eq!(available_minutes(960, 480, 960), 0);
        assert_eq!(available_minutes(1000, 480, 960), 0);
        // Overnight shift capacity stops at midnight
        assert_eq!(available_minutes(0, 1320, 360), 120);
        assert_eq!(available_minutes(1380, 1320, 360), 60);
    }

    #[test]
    fn test_minute_of_day_truncates_seconds() {
        let instant = NaiveDate::from_ymd_opt(2025, 3, 3)
            .unwrap()
            .and_hms_opt(8, 15, 42)
            .unwrap();
        assert_eq!(minute_of_day(instant), 495);
    }
}
