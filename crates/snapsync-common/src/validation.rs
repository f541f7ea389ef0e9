//! Input validation utilities.
//!
//! Centralized validation helpers used across API routes.

use chrono::{DateTime, NaiveDate, Utc};
use validator::Validate;

use crate::error::SnapError;

/// Validate a request body, returning a SnapError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), SnapError> {
    body.validate()
        .map_err(|e| SnapError::validation(format_validation_errors(e)))
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: validator::ValidationErrors) -> String {
    let mut messages = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"))
            })
        })
        .collect::<Vec<_>>();
    messages.sort();
    messages.join("; ")
}

/// Return the trimmed value of a required form field.
///
/// Absent and blank values are both "missing", matching what the dashboard forms send.
pub fn required(value: Option<&str>) -> Result<&str, SnapError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SnapError::missing_fields()),
    }
}

/// Parse an event date.
///
/// Accepts a bare `YYYY-MM-DD` from a date input (taken as midnight UTC) or a full RFC 3339
/// timestamp as echoed back from a previous fetch.
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, SnapError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(SnapError::validation(format!("Invalid date: '{raw}'")))
}
