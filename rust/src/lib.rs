//! Rust implementation of the order-planning schedule projection engine.
//!
//! Given a machine's ordered job queue, its weekly shift calendar, workday
//! overrides and an efficiency factor, this crate projects the start and end
//! instant of every job. Python bindings expose the same operations.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::{NaiveDate, NaiveDateTime};
use pyo3::prelude::*;
use std::collections::{BTreeMap, HashMap};

pub mod calendar;
mod config;
pub mod duration;
pub mod logging;
mod models;
pub mod numeric;
pub mod rotation;
pub mod scheduler;
pub mod sequencing;
pub mod shift_time;

pub use calendar::{
    is_working_day, CalendarError, HolidayList, HolidaySource, NoHolidays, WorkdayCalendar,
};
pub use config::{PlannerConfig, DEFAULT_LOOKAHEAD_DAYS, DEFAULT_MAX_SIMULATION_DAYS};
pub use duration::{resolve_duration_minutes, DurationUnit, DURATION_CANDIDATES, HOURS_NAME_HINTS};
pub use models::{AttributeValue, Job, ScheduledResult, ShiftDefinition, WorkdayOverride};
pub use rotation::{shift_type_for_date, shift_type_for_week, ShiftModel};
pub use scheduler::{
    calculate_completion_time, find_next_shift_start, project_schedule, project_schedule_ordered,
    ForwardScheduler, ShiftTable, ShiftWindow,
};
pub use sequencing::{order_jobs, SequenceMode, SequencingError};
pub use shift_time::{ShiftTimeError, MINUTES_PER_DAY};

fn value_error<E: std::fmt::Display>(err: E) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(err.to_string())
}

fn holiday_list(holidays: Option<Vec<NaiveDate>>) -> HolidayList {
    HolidayList::new(holidays.unwrap_or_default())
}

/// Decide whether a calendar date is a working day.
///
/// # Arguments
/// * `date` - Date to check
/// * `overrides` - Per-date working/non-working overrides
/// * `holidays` - Public holidays (any years)
#[pyfunction]
#[pyo3(name = "is_working_day", signature = (date, overrides=Vec::new(), holidays=None))]
fn py_is_working_day(
    date: NaiveDate,
    overrides: Vec<WorkdayOverride>,
    holidays: Option<Vec<NaiveDate>>,
) -> bool {
    is_working_day(date, &overrides, &holiday_list(holidays))
}

/// Resolve a job's nominal duration in minutes from its spreadsheet row.
///
/// # Arguments
/// * `attributes` - Column name -> cell value
/// * `duration_field` - Column explicitly configured as the duration column
#[pyfunction]
#[pyo3(name = "resolve_duration_minutes", signature = (attributes, duration_field=None))]
fn py_resolve_duration_minutes(
    attributes: BTreeMap<String, AttributeValue>,
    duration_field: Option<String>,
) -> i64 {
    resolve_duration_minutes(&attributes, duration_field.as_deref())
}

/// Find the first instant at or after `from_time` inside a usable shift.
///
/// # Raises
/// * ValueError if a shift definition is malformed
#[pyfunction]
#[pyo3(name = "find_next_shift_start", signature = (from_time, shifts, overrides=Vec::new(), holidays=None))]
fn py_find_next_shift_start(
    from_time: NaiveDateTime,
    shifts: Vec<ShiftDefinition>,
    overrides: Vec<WorkdayOverride>,
    holidays: Option<Vec<NaiveDate>>,
) -> PyResult<NaiveDateTime> {
    let table = ShiftTable::from_definitions(&shifts).map_err(value_error)?;
    Ok(find_next_shift_start(
        from_time,
        &table,
        &overrides,
        &holiday_list(holidays),
    ))
}

/// Compute when `duration_minutes` of in-shift time starting at `start` are used up.
///
/// # Raises
/// * ValueError if a shift definition is malformed
#[pyfunction]
#[pyo3(name = "calculate_completion_time", signature = (start, duration_minutes, shifts, overrides=Vec::new(), holidays=None))]
fn py_calculate_completion_time(
    start: NaiveDateTime,
    duration_minutes: i64,
    shifts: Vec<ShiftDefinition>,
    overrides: Vec<WorkdayOverride>,
    holidays: Option<Vec<NaiveDate>>,
) -> PyResult<NaiveDateTime> {
    let table = ShiftTable::from_definitions(&shifts).map_err(value_error)?;
    Ok(calculate_completion_time(
        start,
        duration_minutes,
        &table,
        &overrides,
        &holiday_list(holidays),
    ))
}

/// Project start/end instants for an ordered job queue of one machine.
///
/// # Arguments
/// * `jobs` - Jobs in queue order
/// * `shifts` - Shift definitions of the machine
/// * `production_start` - Anchor instant; `None` yields an empty result
/// * `config` - Efficiency, duration column hint and limits
/// * `overrides` - Per-date working/non-working overrides
/// * `holidays` - Public holidays (any years)
///
/// # Returns
/// * Dict mapping job id to ScheduledResult
///
/// # Raises
/// * ValueError if a shift definition is malformed
#[pyfunction]
#[pyo3(name = "project_schedule", signature = (jobs, shifts, production_start=None, config=None, overrides=Vec::new(), holidays=None))]
fn py_project_schedule(
    jobs: Vec<Job>,
    shifts: Vec<ShiftDefinition>,
    production_start: Option<NaiveDateTime>,
    config: Option<PlannerConfig>,
    overrides: Vec<WorkdayOverride>,
    holidays: Option<Vec<NaiveDate>>,
) -> PyResult<HashMap<String, ScheduledResult>> {
    let table = ShiftTable::from_definitions(&shifts).map_err(value_error)?;
    let config = config.unwrap_or_default();
    Ok(project_schedule(
        &jobs,
        &table,
        production_start,
        &config,
        &overrides,
        &holiday_list(holidays),
    ))
}

/// Order a job queue manually or by a due-date column.
///
/// # Arguments
/// * `jobs` - Jobs to order
/// * `mode` - "manual" or "due_date"
/// * `due_date_field` - Column holding the due date (required for "due_date")
///
/// # Raises
/// * ValueError for an unknown mode or a missing due-date field
#[pyfunction]
#[pyo3(name = "order_jobs", signature = (jobs, mode="manual", due_date_field=None))]
fn py_order_jobs(jobs: Vec<Job>, mode: &str, due_date_field: Option<&str>) -> PyResult<Vec<Job>> {
    let mode = SequenceMode::parse(mode, due_date_field).map_err(value_error)?;
    Ok(order_jobs(&jobs, &mode))
}

/// Shift type of an ISO week under a rotating shift model.
#[pyfunction]
#[pyo3(name = "shift_type_for_week")]
fn py_shift_type_for_week(iso_week: u32, model: ShiftModel) -> Option<String> {
    shift_type_for_week(iso_week, &model).map(str::to_string)
}

/// Weekly capacity in minutes of the active shifts, as the scheduler models it.
///
/// # Raises
/// * ValueError if a shift definition is malformed
#[pyfunction]
#[pyo3(name = "weekly_capacity_minutes")]
fn py_weekly_capacity_minutes(shifts: Vec<ShiftDefinition>) -> PyResult<u32> {
    let table = ShiftTable::from_definitions(&shifts).map_err(value_error)?;
    Ok(table.weekly_capacity_minutes())
}

/// The shiftplan.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<ShiftDefinition>()?;
    m.add_class::<WorkdayOverride>()?;
    m.add_class::<Job>()?;
    m.add_class::<ScheduledResult>()?;
    m.add_class::<ShiftModel>()?;

    // Config types
    m.add_class::<PlannerConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_is_working_day, m)?)?;
    m.add_function(wrap_pyfunction!(py_resolve_duration_minutes, m)?)?;
    m.add_function(wrap_pyfunction!(py_find_next_shift_start, m)?)?;
    m.add_function(wrap_pyfunction!(py_calculate_completion_time, m)?)?;
    m.add_function(wrap_pyfunction!(py_project_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_order_jobs, m)?)?;
    m.add_function(wrap_pyfunction!(py_shift_type_for_week, m)?)?;
    m.add_function(wrap_pyfunction!(py_weekly_capacity_minutes, m)?)?;

    Ok(())
}
