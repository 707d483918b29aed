//! The request gate in front of every resource route.
//!
//! Steps run in a fixed order and the first failure ends the request:
//!
//! 1. negotiate the API version (never fails)
//! 2. extract credentials: no usable `Authorization` header is `401`
//! 3. validate the Content-Type: `400`
//! 4. verify credentials for the negotiated version: `400` (missing `clientId`) or `401`
//!
//! On success the [`ApiVersion`] is stored in the request extensions for handlers.

use crate::content_type;
use crate::error::ApiError;
use crate::version::ApiVersion;
use crate::AppState;
use api_shared::Credentials;
use axum::extract::{Query, Request, State};
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

/// Header legacy clients may use to name themselves.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

pub async fn gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match admit(&state, &req) {
        Ok(version) => {
            req.extensions_mut().insert(version);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

/// Runs every step against the request, returning the negotiated version.
fn admit(state: &AppState, req: &Request) -> Result<ApiVersion, ApiError> {
    let version = negotiate(state, req);
    let credentials = extract_credentials(req)?;
    validate_content_type(req)?;
    verify(state, version, credentials)?;
    Ok(version)
}

fn header<'a>(req: &'a Request, name: impl axum::http::header::AsHeaderName) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn negotiate(state: &AppState, req: &Request) -> ApiVersion {
    ApiVersion::negotiate(header(req, ACCEPT), state.cfg.api_product())
}

#[derive(Debug, Default, Deserialize)]
struct ClientIdQuery {
    #[serde(rename = "clientId")]
    client_id: Option<String>,
}

fn extract_credentials(req: &Request) -> Result<Credentials, ApiError> {
    let credentials = header(req, AUTHORIZATION)
        .and_then(Credentials::from_authorization)
        .ok_or(ApiError::BadCredentials)?;

    let client_id = header(req, CLIENT_ID_HEADER)
        .map(str::to_string)
        .or_else(|| {
            Query::<ClientIdQuery>::try_from_uri(req.uri())
                .ok()
                .and_then(|Query(q)| q.client_id)
        });

    Ok(credentials.with_client_id(client_id))
}

fn validate_content_type(req: &Request) -> Result<(), ApiError> {
    content_type::check(req.method(), header(req, CONTENT_TYPE))
}

fn verify(state: &AppState, version: ApiVersion, credentials: Credentials) -> Result<(), ApiError> {
    let client = state
        .authenticator
        .verify(&credentials, version.auth_mode())?;
    tracing::debug!(client = %client, ?version, "request authenticated");
    Ok(())
}
