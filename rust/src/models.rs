//! Core data types for schedule projection.

use chrono::{NaiveDate, NaiveDateTime};
use pyo3::prelude::*;
use std::collections::BTreeMap;

use crate::calendar::CalendarError;
use crate::numeric::parse_decimal;
use crate::shift_time::{effective_end, time_of_day_to_minutes, ShiftTimeError};

// Note: attribute bags use BTreeMap so key scans are deterministic

/// One recurring weekly work window of a machine.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ShiftDefinition {
    #[pyo3(get, set)]
    pub machine_id: String,
    /// 0 = Sunday .. 6 = Saturday
    #[pyo3(get, set)]
    pub day_of_week: u8,
    #[pyo3(get, set)]
    pub shift_name: String,
    /// "HH:MM" or "HH:MM:SS"
    #[pyo3(get, set)]
    pub start_time: String,
    /// "HH:MM" or "HH:MM:SS"; end <= start marks an overnight shift
    #[pyo3(get, set)]
    pub end_time: String,
    /// Display-only; the scheduler derives capacity from start/end
    #[pyo3(get, set)]
    pub hours: f64,
    #[pyo3(get, set)]
    pub is_active: bool,
}

impl ShiftDefinition {
    /// Parsed `(start, end)` in minutes since midnight.
    pub fn minutes(&self) -> Result<(u32, u32), ShiftTimeError> {
        Ok((
            time_of_day_to_minutes(&self.start_time)?,
            time_of_day_to_minutes(&self.end_time)?,
        ))
    }

    /// Shift length in hours derived from start/end.
    ///
    /// Overnight shifts count their post-midnight part as well, which matches what
    /// callers display as `hours`; the scheduler itself stops such shifts at midnight.
    pub fn derived_hours(&self) -> Result<f64, ShiftTimeError> {
        let (start, end) = self.minutes()?;
        let span = if end <= start {
            effective_end(start, end) - start + end
        } else {
            end - start
        };
        Ok(span as f64 / 60.0)
    }
}

#[pymethods]
impl ShiftDefinition {
    #[new]
    #[pyo3(signature = (
        machine_id,
        day_of_week,
        shift_name,
        start_time,
        end_time,
        hours=0.0,
        is_active=true
    ))]
    fn new(
        machine_id: String,
        day_of_week: u8,
        shift_name: String,
        start_time: String,
        end_time: String,
        hours: f64,
        is_active: bool,
    ) -> Self {
        Self {
            machine_id,
            day_of_week,
            shift_name,
            start_time,
            end_time,
            hours,
            is_active,
        }
    }

    fn computed_hours(&self) -> PyResult<f64> {
        self.derived_hours()
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "ShiftDefinition(machine_id={:?}, day_of_week={}, shift_name={:?}, {}-{}, active={})",
            self.machine_id,
            self.day_of_week,
            self.shift_name,
            self.start_time,
            self.end_time,
            self.is_active
        )
    }
}

/// Calendar-date exception to the weekday/holiday rule.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkdayOverride {
    #[pyo3(get, set)]
    pub date: NaiveDate,
    #[pyo3(get, set)]
    pub is_working_day: bool,
}

impl WorkdayOverride {
    /// Parse the `YYYY-MM-DD` storage form.
    pub fn from_iso(date: &str, is_working_day: bool) -> Result<Self, CalendarError> {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| CalendarError::InvalidDate(date.to_string()))?;
        Ok(Self {
            date: parsed,
            is_working_day,
        })
    }
}

#[pymethods]
impl WorkdayOverride {
    #[new]
    fn new(date: NaiveDate, is_working_day: bool) -> Self {
        Self {
            date,
            is_working_day,
        }
    }

    #[staticmethod]
    #[pyo3(name = "from_iso")]
    fn py_from_iso(date: &str, is_working_day: bool) -> PyResult<Self> {
        Self::from_iso(date, is_working_day)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "WorkdayOverride(date={}, is_working_day={})",
            self.date, self.is_working_day
        )
    }
}

/// A single cell of an imported spreadsheet row.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Null,
}

impl AttributeValue {
    /// Numeric reading of the cell; text is parsed with either decimal separator.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) | Self::Null => None,
            Self::Text(s) => parse_decimal(s),
        }
    }

    /// Text reading of the cell (numbers are not formatted).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<'py> FromPyObject<'py> for AttributeValue {
    fn extract_bound(ob: &Bound<'py, PyAny>) -> PyResult<Self> {
        if ob.is_none() {
            return Ok(Self::Null);
        }
        if let Ok(text) = ob.extract::<String>() {
            return Ok(Self::Text(text));
        }
        if let Ok(number) = ob.extract::<f64>() {
            return Ok(Self::Number(number));
        }
        Ok(Self::Text(ob.str()?.to_string()))
    }
}

impl IntoPy<PyObject> for AttributeValue {
    fn into_py(self, py: Python<'_>) -> PyObject {
        match self {
            Self::Text(s) => s.into_py(py),
            Self::Number(n) => n.into_py(py),
            Self::Null => py.None(),
        }
    }
}

impl ToPyObject for AttributeValue {
    fn to_object(&self, py: Python<'_>) -> PyObject {
        match self {
            Self::Text(s) => s.to_object(py),
            Self::Number(n) => n.to_object(py),
            Self::Null => py.None(),
        }
    }
}

/// A production order: an identifier plus its imported spreadsheet row.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Job {
    #[pyo3(get, set)]
    pub id: String,
    /// Manual queue position, if one was assigned
    #[pyo3(get, set)]
    pub sequence: Option<i64>,
    #[pyo3(get, set)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Job {
    /// Build a job from `(column, value)` pairs.
    pub fn with_attributes<I, K, V>(id: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        Self {
            id: id.to_string(),
            sequence: None,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[pymethods]
impl Job {
    #[new]
    #[pyo3(signature = (id, attributes=None, sequence=None))]
    fn new(
        id: String,
        attributes: Option<BTreeMap<String, AttributeValue>>,
        sequence: Option<i64>,
    ) -> Self {
        Self {
            id,
            sequence,
            attributes: attributes.unwrap_or_default(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Job(id={:?}, sequence={:?}, attributes={})",
            self.id,
            self.sequence,
            self.attributes.len()
        )
    }
}

/// Projected placement of one job.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledResult {
    #[pyo3(get, set)]
    pub job_id: String,
    #[pyo3(get, set)]
    pub start: NaiveDateTime,
    #[pyo3(get, set)]
    pub end: NaiveDateTime,
    /// Nominal duration before efficiency derating
    #[pyo3(get, set)]
    pub duration_minutes: i64,
    /// Duration actually simulated after efficiency derating
    #[pyo3(get, set)]
    pub effective_minutes: i64,
}

#[pymethods]
impl ScheduledResult {
    #[new]
    fn new(
        job_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
        duration_minutes: i64,
        effective_minutes: i64,
    ) -> Self {
        Self {
            job_id,
            start,
            end,
            duration_minutes,
            effective_minutes,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduledResult(job_id={:?}, start={}, end={}, duration_minutes={})",
            self.job_id, self.start, self.end, self.duration_minutes
        )
    }
}
