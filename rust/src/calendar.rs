//! Working-day oracle: weekends, regional holidays and per-date overrides.
//!
//! A date is a working day if an override says so, or, absent an override,
//! if it is a weekday that is not a holiday. Holiday computation itself is
//! delegated to a [`HolidaySource`].

use chrono::{Datelike, NaiveDate, Weekday};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::models::WorkdayOverride;

/// Errors raised while reading calendar configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid calendar date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Supplies the public holidays of a year.
///
/// Movable feasts depend on the year, so the set is requested per year.
pub trait HolidaySource {
    fn holidays_in_year(&self, year: i32) -> Vec<NaiveDate>;
}

/// Holiday source without any holidays.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHolidays;

impl HolidaySource for NoHolidays {
    fn holidays_in_year(&self, _year: i32) -> Vec<NaiveDate> {
        Vec::new()
    }
}

/// Holiday source backed by an explicit list of dates.
#[derive(Clone, Debug, Default)]
pub struct HolidayList {
    dates: Vec<NaiveDate>,
}

impl HolidayList {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self { dates }
    }
}

impl HolidaySource for HolidayList {
    fn holidays_in_year(&self, year: i32) -> Vec<NaiveDate> {
        self.dates
            .iter()
            .copied()
            .filter(|d| d.year() == year)
            .collect()
    }
}

#[inline]
fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Decide whether `date` is a working day.
///
/// The first override for the date wins; otherwise weekdays that are not
/// holidays are working days.
pub fn is_working_day(
    date: NaiveDate,
    overrides: &[WorkdayOverride],
    holidays: &dyn HolidaySource,
) -> bool {
    if let Some(o) = overrides.iter().find(|o| o.date == date) {
        return o.is_working_day;
    }
    !is_weekend(date) && !holidays.holidays_in_year(date.year()).contains(&date)
}

/// Indexed working-day calendar used by the scheduler.
///
/// Overrides are looked up by date and holiday sets are cached per year, so
/// repeated queries during a simulation stay cheap.
pub struct WorkdayCalendar<'a> {
    overrides: FxHashMap<NaiveDate, bool>,
    holidays: &'a dyn HolidaySource,
    holiday_cache: FxHashMap<i32, FxHashSet<NaiveDate>>,
}

impl<'a> WorkdayCalendar<'a> {
    /// Create a calendar. For duplicate override dates the first entry wins,
    /// matching [`is_working_day`].
    pub fn new(overrides: &[WorkdayOverride], holidays: &'a dyn HolidaySource) -> Self {
        let mut index: FxHashMap<NaiveDate, bool> =
            FxHashMap::with_capacity_and_hasher(overrides.len(), Default::default());
        for o in overrides {
            index.entry(o.date).or_insert(o.is_working_day);
        }
        Self {
            overrides: index,
            holidays,
            holiday_cache: FxHashMap::default(),
        }
    }

    /// Whether `date` is a working day.
    pub fn is_working_day(&mut self, date: NaiveDate) -> bool {
        if let Some(&working) = self.overrides.get(&date) {
            return working;
        }
        if is_weekend(date) {
            return false;
        }
        let holidays = self.holidays;
        !self
            .holiday_cache
            .entry(date.year())
            .or_insert_with(|| holidays.holidays_in_year(date.year()).into_iter().collect())
            .contains(&date)
    }

    /// Number of years whose holidays have been loaded.
    pub fn cached_years(&self) -> usize {
        self.holiday_cache.len()
    }
}
