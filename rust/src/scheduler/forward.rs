//! Forward simulation of shift capacity.
//!
//! A cursor walks day by day through the weekly shift table, skipping days the
//! working-day calendar rules out and consuming the remaining capacity of each
//! shift until the requested number of minutes is used up.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::calendar::{HolidaySource, WorkdayCalendar};
use crate::config::{PlannerConfig, DEFAULT_LOOKAHEAD_DAYS, DEFAULT_MAX_SIMULATION_DAYS};
use crate::models::WorkdayOverride;
use crate::shift_time::minute_of_day;
use crate::{log_checks, log_debug};

use super::shift_table::ShiftTable;

/// Instant `minutes` after midnight of `date` (1440 is the next midnight).
fn at_minute(date: NaiveDate, minutes: u32) -> NaiveDateTime {
    offset_by_minutes(date.and_time(NaiveTime::MIN), minutes as i64)
}

/// `start` shifted by `minutes`, or `start` itself when the offset does not fit.
fn offset_by_minutes(start: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    Duration::try_minutes(minutes)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(start)
}

fn next_midnight(date: NaiveDate) -> NaiveDateTime {
    date.checked_add_days(Days::new(1))
        .unwrap_or(date)
        .and_time(NaiveTime::MIN)
}

/// Walks a machine's shift calendar forward in time.
pub struct ForwardScheduler<'a> {
    shifts: &'a ShiftTable,
    calendar: WorkdayCalendar<'a>,
    lookahead_days: u32,
    max_simulation_days: u32,
    verbosity: u8,
}

impl<'a> ForwardScheduler<'a> {
    /// Create a scheduler with the default limits (14-day look-ahead, one-year cap).
    pub fn new(shifts: &'a ShiftTable, calendar: WorkdayCalendar<'a>) -> Self {
        Self {
            shifts,
            calendar,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            max_simulation_days: DEFAULT_MAX_SIMULATION_DAYS,
            verbosity: 0,
        }
    }

    /// Take limits and verbosity from a planner configuration.
    pub fn with_config(mut self, config: &PlannerConfig) -> Self {
        self.lookahead_days = config.lookahead_days;
        self.max_simulation_days = config.max_simulation_days;
        self.verbosity = config.verbosity;
        self
    }

    /// Earliest instant at or after `from` that lies inside a shift with capacity left.
    ///
    /// Searches `lookahead_days` calendar days starting with the day of `from`.
    /// A found start is minute-aligned; seconds of `from` are dropped. If
    /// nothing is found, `from` is returned unchanged.
    pub fn find_next_shift_start(&mut self, from: NaiveDateTime) -> NaiveDateTime {
        if self.shifts.is_empty() {
            return from;
        }

        let from_date = from.date();
        for offset in 0..self.lookahead_days {
            let Some(date) = from_date.checked_add_days(Days::new(offset as u64)) else {
                break;
            };
            if !self.calendar.is_working_day(date) {
                log_checks!(self.verbosity, "  {}: not a working day", date);
                continue;
            }

            let floor = if offset == 0 { minute_of_day(from) } else { 0 };
            let shifts = self.shifts.for_weekday(date.weekday());
            if let Some(window) = shifts.iter().find(|w| w.effective_end() > floor) {
                return at_minute(date, floor.max(window.start));
            }
        }

        log_checks!(
            self.verbosity,
            "  no shift within {} days of {}, keeping start",
            self.lookahead_days,
            from
        );
        from
    }

    /// Instant at which `duration_minutes` of in-shift time have elapsed from `start`.
    ///
    /// Without shifts (or for non-positive durations) time runs linearly. The
    /// simulation stops after `max_simulation_days` days; the cursor reached at
    /// that point is returned even if capacity was left unconsumed.
    pub fn calculate_completion_time(
        &mut self,
        start: NaiveDateTime,
        duration_minutes: i64,
    ) -> NaiveDateTime {
        if duration_minutes <= 0 || self.shifts.is_empty() {
            return offset_by_minutes(start, duration_minutes);
        }

        let mut remaining = duration_minutes;
        let mut cursor = start;

        for _ in 0..self.max_simulation_days {
            let date = cursor.date();
            let shifts = self.shifts.for_weekday(date.weekday());
            if shifts.is_empty() || !self.calendar.is_working_day(date) {
                log_checks!(self.verbosity, "  {}: no capacity, skipping", date);
                cursor = next_midnight(date);
                continue;
            }

            let mut minute = minute_of_day(cursor);
            for window in shifts {
                let available = window.available_from(minute);
                if available == 0 {
                    continue;
                }
                let effective_start = minute.max(window.start);
                if remaining <= available as i64 {
                    return at_minute(date, effective_start + remaining as u32);
                }
                remaining -= available as i64;
                minute = window.effective_end();
                log_debug!(
                    self.verbosity,
                    "  {} {}: used {} min, {} min left",
                    date,
                    window.label,
                    available,
                    remaining
                );
            }
            cursor = next_midnight(date);
        }

        log_checks!(
            self.verbosity,
            "  gave up after {} days with {} min unscheduled",
            self.max_simulation_days,
            remaining
        );
        cursor
    }
}

/// [`ForwardScheduler::find_next_shift_start`] with default limits.
pub fn find_next_shift_start(
    from: NaiveDateTime,
    shifts: &ShiftTable,
    overrides: &[WorkdayOverride],
    holidays: &dyn HolidaySource,
) -> NaiveDateTime {
    ForwardScheduler::new(shifts, WorkdayCalendar::new(overrides, holidays))
        .find_next_shift_start(from)
}

/// [`ForwardScheduler::calculate_completion_time`] with default limits.
pub fn calculate_completion_time(
    start: NaiveDateTime,
    duration_minutes: i64,
    shifts: &ShiftTable,
    overrides: &[WorkdayOverride],
    holidays: &dyn HolidaySource,
) -> NaiveDateTime {
    ForwardScheduler::new(shifts, WorkdayCalendar::new(overrides, holidays))
        .calculate_completion_time(start, duration_minutes)
}
