//! One module per resource; every operation runs against the shared pool and
//! reports failures as [`ApiError`](crate::error::ApiError).

pub mod accounts;
pub mod artists;
pub mod bookings;
pub mod events;

use chrono::NaiveDate;

use crate::error::ApiError;

/// Trims an optional text field, treating blank input as absent.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    trimmed(value).ok_or_else(|| ApiError::validation(message))
}

pub(crate) fn parse_date(value: &str, field: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("{field} must be a date in YYYY-MM-DD format")))
}
