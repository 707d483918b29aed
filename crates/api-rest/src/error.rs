//! HTTP error mapping.

use crate::envelope::Envelope;
use api_shared::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mission_core::ServiceError;

/// Every way a request can fail, as seen by a client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    MissingParameter(String),
    #[error("{0}")]
    MismatchedPatient(String),
    /// The body or query string could not be decoded.
    #[error("{0}")]
    BadRequest(String),
    #[error("Bad credentials")]
    BadCredentials,
    #[error("Invalid content type")]
    InvalidContentType,
    #[error("Missing clientId")]
    ClientIdMissing,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadCredentials => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_)
            | Self::MissingParameter(_)
            | Self::MismatchedPatient(_)
            | Self::BadRequest(_)
            | Self::InvalidContentType
            | Self::ClientIdMissing => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => Self::NotFound,
            ServiceError::Validation(msg) => Self::Validation(msg),
            ServiceError::MissingParameter(msg) => Self::MissingParameter(msg),
            err @ ServiceError::MismatchedPatient => Self::MismatchedPatient(err.to_string()),
            err @ (ServiceError::Store(_) | ServiceError::Files(_)) => {
                tracing::error!("service failure: {err:?}");
                Self::Internal
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::BadCredentials => Self::BadCredentials,
            AuthError::ClientIdMissing => Self::ClientIdMissing,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Envelope::error(self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mission_core::DbError;

    #[test]
    fn service_errors_map_to_client_statuses() {
        let cases = [
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (
                ServiceError::Validation("name can't be blank".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::missing(&["recordId"]), StatusCode::BAD_REQUEST),
            (ServiceError::MismatchedPatient, StatusCode::BAD_REQUEST),
            (
                ServiceError::Store(DbError::Poisoned),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn messages_are_fixed_for_gate_failures() {
        assert_eq!(ApiError::BadCredentials.to_string(), "Bad credentials");
        assert_eq!(ApiError::InvalidContentType.to_string(), "Invalid content type");
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert!(ApiError::from(AuthError::ClientIdMissing)
            .to_string()
            .contains("clientId"));
    }

    #[test]
    fn mismatched_patient_mentions_patient() {
        let err = ApiError::from(ServiceError::MismatchedPatient);
        assert!(err.to_string().contains("patient"));
    }
}
