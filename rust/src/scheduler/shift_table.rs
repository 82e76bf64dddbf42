//! Validated weekly shift table.

use chrono::Weekday;

use crate::models::ShiftDefinition;
use crate::shift_time::{available_minutes, effective_end, is_overnight_shift, ShiftTimeError};

/// One active shift window of a weekday, in minutes since midnight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftWindow {
    pub label: String,
    pub start: u32,
    pub end: u32,
}

impl ShiftWindow {
    #[inline]
    pub fn is_overnight(&self) -> bool {
        is_overnight_shift(self.start, self.end)
    }

    /// End on the start day (1440 for overnight shifts).
    #[inline]
    pub fn effective_end(&self) -> u32 {
        effective_end(self.start, self.end)
    }

    /// Capacity left when the clock stands at `minute`.
    #[inline]
    pub fn available_from(&self, minute: u32) -> u32 {
        available_minutes(minute, self.start, self.end)
    }
}

/// Active shifts per weekday, each list sorted by start time.
///
/// Rows sharing a start time keep their configuration order. Overlapping rows
/// are neither merged nor rejected; the forward walk measures capacity from its
/// cursor, so the overlap is consumed once, as the union of the rows.
#[derive(Clone, Debug, Default)]
pub struct ShiftTable {
    /// Indexed by days from Sunday (0 = Sunday .. 6 = Saturday)
    by_weekday: [Vec<ShiftWindow>; 7],
}

impl ShiftTable {
    /// Build a table from shift rows, skipping inactive ones.
    ///
    /// Fails on the first active row with an invalid weekday or time of day.
    pub fn from_definitions(definitions: &[ShiftDefinition]) -> Result<Self, ShiftTimeError> {
        let mut table = Self::default();
        for def in definitions.iter().filter(|d| d.is_active) {
            if def.day_of_week > 6 {
                return Err(ShiftTimeError::InvalidDayOfWeek(def.day_of_week));
            }
            let (start, end) = def.minutes()?;
            table.by_weekday[def.day_of_week as usize].push(ShiftWindow {
                label: def.shift_name.clone(),
                start,
                end,
            });
        }
        for windows in table.by_weekday.iter_mut() {
            windows.sort_by_key(|w| w.start);
        }
        Ok(table)
    }

    /// Build a table from the rows belonging to one machine.
    pub fn for_machine(
        definitions: &[ShiftDefinition],
        machine_id: &str,
    ) -> Result<Self, ShiftTimeError> {
        let own: Vec<ShiftDefinition> = definitions
            .iter()
            .filter(|d| d.machine_id == machine_id)
            .cloned()
            .collect();
        Self::from_definitions(&own)
    }

    /// Active windows of a weekday, sorted by start.
    #[inline]
    pub fn for_weekday(&self, weekday: Weekday) -> &[ShiftWindow] {
        &self.by_weekday[weekday.num_days_from_sunday() as usize]
    }

    /// True when no active shift exists on any weekday.
    pub fn is_empty(&self) -> bool {
        self.by_weekday.iter().all(|w| w.is_empty())
    }

    /// Nominal weekly capacity in minutes, as the scheduler models it.
    ///
    /// Overnight shifts only contribute up to midnight of their start day.
    pub fn weekly_capacity_minutes(&self) -> u32 {
        self.by_weekday
            .iter()
            .flatten()
            .map(|w| w.effective_end() - w.start)
            .sum()
    }
}
