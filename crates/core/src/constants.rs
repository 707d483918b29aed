//! Constants used throughout the mission core crate.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "mission.sqlite3";

/// Default directory for attachment blobs.
pub const DEFAULT_ATTACHMENTS_DIR: &str = "attachments";

/// Default client registry file.
pub const DEFAULT_CLIENTS_FILE: &str = "config/clients.yaml";

/// Runtime environment used when none is configured.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Product segment of the vendor media type (`application/vnd.<product>-api.<version>+json`).
pub const DEFAULT_API_PRODUCT: &str = "mission";

/// Tracing target for soft-delete audit lines.
pub const AUDIT_TARGET: &str = "audit";
