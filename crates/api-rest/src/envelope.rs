//! Uniform response wrapper.
//!
//! Success bodies are `{"<root>": data}`, or `data` itself when there is no root. Errors are
//! always `{"error": {"httpCode": <int>, "message": <string>}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A response body plus the status it is sent with.
///
/// There is no constructor without a status.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    status: StatusCode,
    root: Option<&'static str>,
    data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(status: StatusCode, root: Option<&'static str>, data: T) -> Self {
        Self { status, root, data }
    }

    pub fn ok(root: Option<&'static str>, data: T) -> Self {
        Self::new(StatusCode::OK, root, data)
    }

    pub fn created(root: Option<&'static str>, data: T) -> Self {
        Self::new(StatusCode::CREATED, root, data)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.root {
            Some(root) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(root, &self.data)?;
                map.end()
            }
            None => self.data.serialize(serializer),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub http_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope<ErrorBody> {
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(
            status,
            Some("error"),
            ErrorBody {
                http_code: status.as_u16(),
                message: Some(message.into()),
            },
        )
    }
}

/// `{"message": "<Type> deleted"}`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Deleted {
    pub message: String,
}

impl Deleted {
    pub fn envelope(type_name: &str) -> Envelope<Self> {
        Envelope::ok(
            None,
            Self {
                message: format!("{type_name} deleted"),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wraps_under_root() {
        let body = serde_json::to_value(Envelope::ok(Some("patient"), json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"patient": {"id": 1}}));
    }

    #[test]
    fn no_root_is_unwrapped() {
        let body = serde_json::to_value(Envelope::ok(None, json!([1, 2]))).unwrap();
        assert_eq!(body, json!([1, 2]));
    }

    #[test]
    fn errors_carry_http_code() {
        let envelope = Envelope::error(StatusCode::NOT_FOUND, "Not Found");
        assert_eq!(envelope.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            json!({"error": {"httpCode": 404, "message": "Not Found"}})
        );
    }

    #[test]
    fn delete_message_names_type() {
        let envelope = Deleted::envelope("Case");
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            json!({"message": "Case deleted"})
        );
    }
}
