//! Alternating shift models (e.g. early shift in odd weeks, late shift in even weeks).
//!
//! The shift type of a week is a pure function of the ISO week number and the
//! model. Weeks 53 and 1 are both odd, so a 2-pattern model repeats the same
//! type across such a year boundary.

use chrono::{Datelike, NaiveDate};
use pyo3::prelude::*;

/// A rotation of shift types over consecutive ISO weeks.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftModel {
    #[pyo3(get, set)]
    pub id: String,
    /// Shift type for week 1, 2, ... repeating
    #[pyo3(get, set)]
    pub pattern: Vec<String>,
}

#[pymethods]
impl ShiftModel {
    #[new]
    fn new(id: String, pattern: Vec<String>) -> Self {
        Self { id, pattern }
    }

    fn __repr__(&self) -> String {
        format!("ShiftModel(id={:?}, pattern={:?})", self.id, self.pattern)
    }
}

/// Shift type of ISO week `iso_week` (1-based) under `model`.
///
/// Returns `None` for week 0 or an empty pattern.
pub fn shift_type_for_week(iso_week: u32, model: &ShiftModel) -> Option<&str> {
    if iso_week == 0 || model.pattern.is_empty() {
        return None;
    }
    let slot = (iso_week as usize - 1) % model.pattern.len();
    Some(model.pattern[slot].as_str())
}

/// Shift type in effect on `date`.
pub fn shift_type_for_date(date: NaiveDate, model: &ShiftModel) -> Option<&str> {
    shift_type_for_week(date.iso_week().week(), model)
}
