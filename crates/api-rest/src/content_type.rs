//! Content-Type validation.

use crate::error::ApiError;
use axum::http::Method;

pub const JSON: &str = "application/json";
pub const FORM: &str = "application/x-www-form-urlencoded";
pub const TEXT: &str = "text/plain";

/// The media type without parameters, lowercased: `Application/JSON; charset=utf-8` is
/// `application/json`.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Requests that carry a body must declare JSON or form encoding; the rest may omit the header
/// or declare JSON or plain text.
pub fn check(method: &Method, content_type: Option<&str>) -> Result<(), ApiError> {
    let carries_body = matches!(*method, Method::POST | Method::PUT | Method::PATCH);
    let essence = content_type.map(essence);

    let acceptable = match (carries_body, essence.as_deref()) {
        (true, Some(JSON | FORM)) => true,
        (true, _) => false,
        (false, None | Some(JSON | TEXT)) => true,
        (false, Some(_)) => false,
    };

    if acceptable {
        Ok(())
    } else {
        Err(ApiError::InvalidContentType)
    }
}
