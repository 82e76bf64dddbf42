//! Job queue ordering before projection.
//!
//! Two modes:
//! - `manual`: by the manual queue position, unpositioned jobs last
//! - `due_date`: by a date column of the imported row, undated jobs last,
//!   ties broken by manual position
//!
//! Remaining ties keep the input order.

use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use thiserror::Error;

use crate::models::{AttributeValue, Job};

/// Errors that can occur while configuring job ordering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequencingError {
    #[error("Unknown sequencing mode: {0}")]
    UnknownMode(String),
    #[error("Due-date sequencing requires a date field")]
    MissingDueDateField,
}

/// How a machine's queue is ordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceMode {
    Manual,
    /// Attribute key holding the due date
    DueDate(String),
}

impl SequenceMode {
    /// Parse a mode name ("manual" or "due_date").
    pub fn parse(mode: &str, due_date_field: Option<&str>) -> Result<Self, SequencingError> {
        match mode {
            "manual" => Ok(Self::Manual),
            "due_date" => match due_date_field {
                Some(field) if !field.trim().is_empty() => Ok(Self::DueDate(field.to_string())),
                _ => Err(SequencingError::MissingDueDateField),
            },
            other => Err(SequencingError::UnknownMode(other.to_string())),
        }
    }
}

// Two-digit years must be tried before %Y, which would accept "25" as year 25
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Read a due date from a spreadsheet cell.
///
/// Numeric cells (spreadsheet day serials) are not interpreted.
pub fn parse_due_date(value: &AttributeValue) -> Option<NaiveDate> {
    let raw = value.as_text()?.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Sort key of a job within its queue. Lower sorts first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceKey {
    Manual {
        position: Option<i64>,
        index: usize,
    },
    DueDate {
        due: Option<NaiveDate>,
        position: Option<i64>,
        index: usize,
    },
}

/// Compare optional values with `None` after every `Some`.
fn cmp_missing_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl SequenceKey {
    pub fn index(&self) -> usize {
        match self {
            Self::Manual { index, .. } | Self::DueDate { index, .. } => *index,
        }
    }
}

impl Ord for SequenceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                Self::Manual {
                    position: p1,
                    index: i1,
                },
                Self::Manual {
                    position: p2,
                    index: i2,
                },
            ) => cmp_missing_last(p1, p2).then(i1.cmp(i2)),

            (
                Self::DueDate {
                    due: d1,
                    position: p1,
                    index: i1,
                },
                Self::DueDate {
                    due: d2,
                    position: p2,
                    index: i2,
                },
            ) => cmp_missing_last(d1, d2)
                .then(cmp_missing_last(p1, p2))
                .then(i1.cmp(i2)),

            // Keys of one queue always share a mode; fall back to input order
            _ => self.index().cmp(&other.index()),
        }
    }
}

impl PartialOrd for SequenceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compute the sort key of the job at `index`.
pub fn compute_sequence_key(job: &Job, index: usize, mode: &SequenceMode) -> SequenceKey {
    match mode {
        SequenceMode::Manual => SequenceKey::Manual {
            position: job.sequence,
            index,
        },
        SequenceMode::DueDate(field) => SequenceKey::DueDate {
            due: job.attributes.get(field).and_then(parse_due_date),
            position: job.sequence,
            index,
        },
    }
}

/// Return the jobs in queue order.
pub fn order_jobs(jobs: &[Job], mode: &SequenceMode) -> Vec<Job> {
    let mut keys: Vec<SequenceKey> = jobs
        .iter()
        .enumerate()
        .map(|(i, job)| compute_sequence_key(job, i, mode))
        .collect();
    keys.sort();
    keys.into_iter().map(|k| jobs[k.index()].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn job(id: &str, sequence: Option<i64>, due: Option<&str>) -> Job {
        let mut job = match due {
            Some(d) => Job::with_attributes(id, [("Liefertermin", AttributeValue::from(d))]),
            None => Job::with_attributes(id, Vec::<(String, AttributeValue)>::new()),
        };
        job.sequence = sequence;
        job
    }

    fn ids(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(SequenceMode::parse("manual", None), Ok(SequenceMode::Manual));
        assert_eq!(
            SequenceMode::parse("due_date", Some("Liefertermin")),
            Ok(SequenceMode::DueDate("Liefertermin".to_string()))
        );
        assert_eq!(
            SequenceMode::parse("due_date", None),
            Err(SequencingError::MissingDueDateField)
        );
        assert_eq!(
            SequenceMode::parse("fifo", None),
            Err(SequencingError::UnknownMode("fifo".to_string()))
        );
    }

    #[test]
    fn test_parse_due_date_formats() {
        let expected = Some(make_date(2025, 4, 9));
        for raw in [
            "2025-04-09",
            "09.04.2025",
            "09.04.25",
            "2025-04-09 13:30:00",
            "2025-04-09T13:30",
            " 2025-04-09 ",
        ] {
            assert_eq!(parse_due_date(&AttributeValue::from(raw)), expected, "{}", raw);
        }
    }

    #[test]
    fn test_parse_due_date_rejects() {
        assert_eq!(parse_due_date(&AttributeValue::from("")), None);
        assert_eq!(parse_due_date(&AttributeValue::from("KW 15")), None);
        assert_eq!(parse_due_date(&AttributeValue::Number(45756.0)), None);
        assert_eq!(parse_due_date(&AttributeValue::Null), None);
    }

    #[test]
    fn test_manual_order() {
        let jobs = vec![
            job("c", Some(3), None),
            job("none", None, None),
            job("a", Some(1), None),
            job("b", Some(2), None),
        ];
        let ordered = order_jobs(&jobs, &SequenceMode::Manual);
        assert_eq!(ids(&ordered), vec!["a", "b", "c", "none"]);
    }

    #[test]
    fn test_manual_ties_keep_input_order() {
        let jobs = vec![job("x", Some(1), None), job("y", Some(1), None), job("z", None, None)];
        let ordered = order_jobs(&jobs, &SequenceMode::Manual);
        assert_eq!(ids(&ordered), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_due_date_order() {
        let jobs = vec![
            job("late", Some(1), Some("2025-05-01")),
            job("undated", Some(0), None),
            job("early", Some(5), Some("15.04.2025")),
            job("early_first", Some(2), Some("2025-04-15")),
        ];
        let mode = SequenceMode::DueDate("Liefertermin".to_string());
        let ordered = order_jobs(&jobs, &mode);
        assert_eq!(ids(&ordered), vec!["early_first", "early", "late", "undated"]);
    }

    #[test]
    fn test_empty_queue() {
        assert!(order_jobs(&[], &SequenceMode::Manual).is_empty());
    }
}
