//! Order duration resolution from imported spreadsheet rows.
//!
//! Column naming differs between imports, so the duration is looked up in a
//! fixed precedence order:
//! 1. the explicitly configured duration column (unit guessed from its name)
//! 2. well-known minute columns
//! 3. well-known hour columns
//!
//! Only strictly positive numeric values count as a match; anything else falls
//! through to the next candidate. If nothing matches the duration is 0.

use std::collections::BTreeMap;

use crate::models::AttributeValue;

/// Unit a duration column is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationUnit {
    Minutes,
    Hours,
}

impl DurationUnit {
    /// Convert a positive value to whole minutes.
    ///
    /// Minutes are floored, hours are converted and rounded.
    pub fn to_minutes(self, value: f64) -> i64 {
        match self {
            Self::Minutes => value.floor().max(0.0) as i64,
            Self::Hours => (value * 60.0).round().max(0.0) as i64,
        }
    }
}

/// Fallback column names in precedence order (matched case-insensitively).
pub const DURATION_CANDIDATES: &[(&str, DurationUnit)] = &[
    ("tg", DurationUnit::Minutes),
    ("minuten", DurationUnit::Minutes),
    ("min", DurationUnit::Minutes),
    ("dauer_min", DurationUnit::Minutes),
    ("zeit", DurationUnit::Hours),
    ("stunden", DurationUnit::Hours),
    ("hours", DurationUnit::Hours),
    ("dauer", DurationUnit::Hours),
    ("duration", DurationUnit::Hours),
];

/// Substrings that mark an explicitly configured column as holding hours.
pub const HOURS_NAME_HINTS: &[&str] = &["zeit", "stunden", "hours", "dauer", "duration"];

/// Guess the unit of an explicitly configured duration column from its name.
pub fn unit_for_field_name(field: &str) -> DurationUnit {
    let lowered = field.to_lowercase();
    if HOURS_NAME_HINTS.iter().any(|hint| lowered.contains(hint)) {
        DurationUnit::Hours
    } else {
        DurationUnit::Minutes
    }
}

fn positive(value: &AttributeValue) -> Option<f64> {
    value.as_number().filter(|v| *v > 0.0)
}

/// Positive value of the first column whose name equals `name` ignoring case.
fn lookup_positive(attributes: &BTreeMap<String, AttributeValue>, name: &str) -> Option<f64> {
    if let Some(v) = attributes.get(name).and_then(positive) {
        return Some(v);
    }
    attributes
        .iter()
        .filter(|(key, _)| key.trim().to_lowercase() == name)
        .find_map(|(_, value)| positive(value))
}

/// Resolve the nominal duration of an order in minutes.
///
/// `explicit_field` is the column the user marked as the duration column, if any.
pub fn resolve_duration_minutes(
    attributes: &BTreeMap<String, AttributeValue>,
    explicit_field: Option<&str>,
) -> i64 {
    if let Some(field) = explicit_field {
        if let Some(value) = attributes.get(field).and_then(positive) {
            return unit_for_field_name(field).to_minutes(value);
        }
    }

    DURATION_CANDIDATES
        .iter()
        .find_map(|(name, unit)| lookup_positive(attributes, name).map(|v| unit.to_minutes(v)))
        .unwrap_or(0)
}
