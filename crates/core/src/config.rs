//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{
    DEFAULT_API_PRODUCT, DEFAULT_ATTACHMENTS_DIR, DEFAULT_CLIENTS_FILE, DEFAULT_DATABASE_PATH,
    DEFAULT_ENVIRONMENT,
};
use crate::error::ConfigError;
use mission_types::NonEmptyText;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    attachments_dir: PathBuf,
    clients_file: PathBuf,
    environment: NonEmptyText,
    api_product: NonEmptyText,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidInput` if `environment` or `api_product` is blank, or if
    /// `api_product` contains characters that cannot appear in a media type.
    pub fn new(
        database_path: PathBuf,
        attachments_dir: PathBuf,
        clients_file: PathBuf,
        environment: &str,
        api_product: &str,
    ) -> Result<Self, ConfigError> {
        let environment = NonEmptyText::new(environment)
            .map_err(|_| ConfigError::InvalidInput("environment cannot be empty".into()))?;
        let api_product = NonEmptyText::new(api_product)
            .map_err(|_| ConfigError::InvalidInput("api product cannot be empty".into()))?;

        let ok = api_product
            .as_str()
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !ok {
            return Err(ConfigError::InvalidInput(
                "api product may only contain alphanumeric characters, '-' and '_'".into(),
            ));
        }

        Ok(Self {
            database_path,
            attachments_dir,
            clients_file,
            environment,
            api_product,
        })
    }

    /// Resolve configuration from raw (usually environment-sourced) values.
    ///
    /// Absent or blank values fall back to the crate defaults.
    pub fn from_values(
        database_path: Option<String>,
        attachments_dir: Option<String>,
        clients_file: Option<String>,
        environment: Option<String>,
        api_product: Option<String>,
    ) -> Result<Self, ConfigError> {
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self::new(
            PathBuf::from(or_default(database_path, DEFAULT_DATABASE_PATH)),
            PathBuf::from(or_default(attachments_dir, DEFAULT_ATTACHMENTS_DIR)),
            PathBuf::from(or_default(clients_file, DEFAULT_CLIENTS_FILE)),
            &or_default(environment, DEFAULT_ENVIRONMENT),
            &or_default(api_product, DEFAULT_API_PRODUCT),
        )
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn attachments_dir(&self) -> &Path {
        &self.attachments_dir
    }

    pub fn clients_file(&self) -> &Path {
        &self.clients_file
    }

    /// Runtime environment used for credential lookup.
    pub fn environment(&self) -> &str {
        self.environment.as_str()
    }

    pub fn api_product(&self) -> &str {
        self.api_product.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = CoreConfig::from_values(None, Some("  ".into()), None, None, None).unwrap();
        assert_eq!(cfg.database_path(), Path::new(DEFAULT_DATABASE_PATH));
        assert_eq!(cfg.attachments_dir(), Path::new(DEFAULT_ATTACHMENTS_DIR));
        assert_eq!(cfg.environment(), "development");
        assert_eq!(cfg.api_product(), "mission");
    }

    #[test]
    fn explicit_values_are_kept() {
        let cfg = CoreConfig::from_values(
            Some("/tmp/m.db".into()),
            None,
            Some("clients.yml".into()),
            Some("production".into()),
            Some("walk".into()),
        )
        .unwrap();
        assert_eq!(cfg.database_path(), Path::new("/tmp/m.db"));
        assert_eq!(cfg.clients_file(), Path::new("clients.yml"));
        assert_eq!(cfg.environment(), "production");
        assert_eq!(cfg.api_product(), "walk");
    }

    #[test]
    fn rejects_media_type_unsafe_product() {
        let result = CoreConfig::new(
            PathBuf::from("db"),
            PathBuf::from("att"),
            PathBuf::from("clients.yaml"),
            "test",
            "bad/product",
        );
        assert!(matches!(result, Err(ConfigError::InvalidInput(_))));
    }

    #[test]
    fn rejects_blank_environment() {
        let result = CoreConfig::new(
            PathBuf::from("db"),
            PathBuf::from("att"),
            PathBuf::from("clients.yaml"),
            "  ",
            "mission",
        );
        assert!(result.is_err());
    }
}
