//! Input validation utilities.
//!
//! Every failure message starts with the field name so clients (and tests) can tell which
//! input was rejected.

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, NaiveDate, Utc};
use mission_types::NonEmptyText;

/// A field that must be present and non-blank.
pub fn required_text(field: &str, value: Option<&str>) -> ServiceResult<NonEmptyText> {
    value
        .and_then(|v| NonEmptyText::new(v).ok())
        .ok_or_else(|| ServiceError::Validation(format!("{field} can't be blank")))
}

/// A field that, when supplied, must be non-blank.
pub fn present_text(field: &str, value: Option<&str>) -> ServiceResult<Option<NonEmptyText>> {
    match value {
        Some(v) => required_text(field, Some(v)).map(Some),
        None => Ok(None),
    }
}

/// Free text; blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A `YYYY-MM-DD` calendar date; blank becomes `None`.
pub fn optional_date(field: &str, value: Option<&str>) -> ServiceResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                ServiceError::Validation(format!("{field} is not a valid date (expected YYYY-MM-DD)"))
            }),
        None => Ok(None),
    }
}

/// An RFC 3339 timestamp normalised to UTC; blank becomes `None`.
pub fn optional_timestamp(
    field: &str,
    value: Option<&str>,
) -> ServiceResult<Option<DateTime<Utc>>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| {
                ServiceError::Validation(format!("{field} is not a valid RFC 3339 timestamp"))
            }),
        None => Ok(None),
    }
}
