//! Client authentication.
//!
//! Every API client is issued one static token per runtime environment. The registry is read
//! once at startup (usually from a YAML file) and handed to an [`Authenticator`], which is the
//! only thing request handling ever consults.
//!
//! ```yaml
//! field-app:
//!   development: dev-token
//!   production: 6f1c...
//! reporting:
//!   production: 99ab...
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Reasons a request fails authentication.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Bad credentials")]
    BadCredentials,
    /// Legacy clients must name themselves with `clientId`.
    #[error("Missing clientId")]
    ClientIdMissing,
}

/// Failures loading the client registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read client registry {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse client registry: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// `{client name: {environment: token}}`, read-only after load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ClientRegistry {
    clients: BTreeMap<String, BTreeMap<String, String>>,
}

impl ClientRegistry {
    /// Parses a registry from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a registry file.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Adds or replaces one client token.
    pub fn with_token(
        mut self,
        client: impl Into<String>,
        environment: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.clients
            .entry(client.into())
            .or_default()
            .insert(environment.into(), token.into());
        self
    }

    pub fn token_for(&self, client: &str, environment: &str) -> Option<&str> {
        self.clients
            .get(client)
            .and_then(|envs| envs.get(environment))
            .map(String::as_str)
    }

    /// Clients that hold a token for `environment`.
    pub fn clients_in<'a>(&'a self, environment: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.clients.iter().filter_map(move |(client, envs)| {
            envs.get(environment)
                .map(|token| (client.as_str(), token.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// Credentials presented by a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub client_id: Option<String>,
}

impl Credentials {
    /// Parses an `Authorization` header value.
    ///
    /// Accepts `Bearer <token>` and `Token token="<token>"`. Returns `None` when no token can be
    /// found.
    pub fn from_authorization(value: &str) -> Option<Self> {
        let value = value.trim();
        let token = if let Some(rest) = strip_scheme(value, "Bearer") {
            rest.trim()
        } else if let Some(rest) = strip_scheme(value, "Token") {
            let rest = rest.trim();
            let rest = rest.strip_prefix("token=").unwrap_or(rest);
            rest.trim_matches('"')
        } else {
            return None;
        };

        if token.is_empty() {
            return None;
        }

        Some(Self {
            token: token.to_string(),
            client_id: None,
        })
    }

    pub fn with_client_id(mut self, client_id: Option<String>) -> Self {
        self.client_id = client_id.filter(|c| !c.trim().is_empty());
        self
    }
}

fn strip_scheme<'a>(value: &'a str, scheme: &str) -> Option<&'a str> {
    let head = value.get(..scheme.len())?;
    let rest = &value[scheme.len()..];
    if head.eq_ignore_ascii_case(scheme) && rest.starts_with(' ') {
        Some(rest)
    } else {
        None
    }
}

/// How the presented credentials are matched against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// The token must belong to some client in the active environment.
    AnyClient,
    /// The caller names its client; the token must be that client's token.
    NamedClient,
}

/// Validates credentials against the registry for one runtime environment.
#[derive(Debug, Clone)]
pub struct Authenticator {
    registry: Arc<ClientRegistry>,
    environment: String,
}

impl Authenticator {
    pub fn new(registry: Arc<ClientRegistry>, environment: impl Into<String>) -> Self {
        Self {
            registry,
            environment: environment.into(),
        }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Returns the authenticated client name.
    pub fn verify(&self, credentials: &Credentials, mode: AuthMode) -> Result<String, AuthError> {
        let matched = match mode {
            AuthMode::AnyClient => self
                .registry
                .clients_in(&self.environment)
                .find(|(_, token)| *token == credentials.token)
                .map(|(client, _)| client.to_string()),
            AuthMode::NamedClient => {
                let client = credentials
                    .client_id
                    .as_deref()
                    .ok_or(AuthError::ClientIdMissing)?;
                self.registry
                    .token_for(client, &self.environment)
                    .filter(|token| *token == credentials.token)
                    .map(|_| client.to_string())
            }
        };

        matched.ok_or_else(|| {
            tracing::debug!(environment = %self.environment, "credential lookup failed");
            AuthError::BadCredentials
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
field-app:
  development: dev-token
  production: prod-token
reporting:
  production: report-token
"#;

    fn authenticator(env: &str) -> Authenticator {
        let registry = ClientRegistry::from_yaml_str(REGISTRY).unwrap();
        Authenticator::new(Arc::new(registry), env)
    }

    fn creds(token: &str, client: Option<&str>) -> Credentials {
        Credentials {
            token: token.into(),
            client_id: client.map(str::to_string),
        }
    }

    #[test]
    fn registry_parses_nested_tokens() {
        let registry = ClientRegistry::from_yaml_str(REGISTRY).unwrap();
        assert_eq!(registry.token_for("field-app", "production"), Some("prod-token"));
        assert_eq!(registry.token_for("reporting", "development"), None);
        assert_eq!(registry.clients_in("production").count(), 2);
    }

    #[test]
    fn empty_registry_file_is_allowed() {
        let registry = ClientRegistry::from_yaml_str("\n").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_from_path_reports_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("clients.yaml");
        assert!(matches!(
            ClientRegistry::from_path(&missing),
            Err(RegistryError::Read { .. })
        ));
    }

    #[test]
    fn parses_bearer_and_token_schemes() {
        assert_eq!(
            Credentials::from_authorization("Bearer abc123").map(|c| c.token),
            Some("abc123".to_string())
        );
        assert_eq!(
            Credentials::from_authorization("Token token=\"abc123\"").map(|c| c.token),
            Some("abc123".to_string())
        );
        assert_eq!(
            Credentials::from_authorization("bearer abc123").map(|c| c.token),
            Some("abc123".to_string())
        );
        assert!(Credentials::from_authorization("Basic Zm9vOmJhcg==").is_none());
        assert!(Credentials::from_authorization("Bearer ").is_none());
        assert!(Credentials::from_authorization("").is_none());
    }

    #[test]
    fn any_client_mode_matches_environment_only() {
        let auth = authenticator("development");
        assert_eq!(
            auth.verify(&creds("dev-token", None), AuthMode::AnyClient),
            Ok("field-app".to_string())
        );
        assert_eq!(
            auth.verify(&creds("prod-token", None), AuthMode::AnyClient),
            Err(AuthError::BadCredentials)
        );
    }

    #[test]
    fn named_client_mode_requires_client_id() {
        let auth = authenticator("production");
        assert_eq!(
            auth.verify(&creds("report-token", None), AuthMode::NamedClient),
            Err(AuthError::ClientIdMissing)
        );
        assert_eq!(
            auth.verify(&creds("report-token", Some("field-app")), AuthMode::NamedClient),
            Err(AuthError::BadCredentials)
        );
        assert_eq!(
            auth.verify(&creds("report-token", Some("reporting")), AuthMode::NamedClient),
            Ok("reporting".to_string())
        );
    }

    #[test]
    fn blank_client_id_counts_as_missing() {
        let credentials = creds("dev-token", None).with_client_id(Some("  ".into()));
        assert_eq!(credentials.client_id, None);
    }
}
