//! Locale-tolerant number parsing for imported spreadsheet values.

/// Parse a decimal number that may use either `.` or `,` as separator.
///
/// Returns `None` for empty, unparseable or non-finite input.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}
