//! Accept-header version negotiation.
//!
//! Clients ask for a version with `Accept: application/vnd.<product>-api.<version>+json`.
//! Anything unrecognised, including an absent header, gets the default version.

use api_shared::AuthMode;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
    /// Unwrapped bodies and client-named authentication.
    Legacy,
    #[default]
    V1,
}

impl ApiVersion {
    /// Picks the first recognised vendor media type in `accept`.
    pub fn negotiate(accept: Option<&str>, product: &str) -> Self {
        let Some(accept) = accept else {
            return Self::default();
        };
        let prefix = format!("application/vnd.{}-api.", product.to_ascii_lowercase());

        accept
            .split(',')
            .filter_map(|entry| {
                let essence = entry.split(';').next()?.trim().to_ascii_lowercase();
                let token = essence.strip_prefix(&prefix)?.strip_suffix("+json")?;
                Self::from_token(token)
            })
            .next()
            .unwrap_or_default()
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "v1" => Some(Self::V1),
            "legacy" | "v0" => Some(Self::Legacy),
            _ => None,
        }
    }

    pub fn auth_mode(self) -> AuthMode {
        match self {
            Self::Legacy => AuthMode::NamedClient,
            Self::V1 => AuthMode::AnyClient,
        }
    }

    /// The envelope root for this version; legacy bodies are never wrapped.
    pub fn root(self, name: &'static str) -> Option<&'static str> {
        match self {
            Self::Legacy => None,
            Self::V1 => Some(name),
        }
    }
}

/// Handlers read the version the request pipeline negotiated.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ApiVersion {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ApiVersion>()
            .copied()
            .unwrap_or_default())
    }
}
