use crate::db::DbError;
use mission_files::FilesError;

/// Service-level failures, one per client-visible error kind.
///
/// `Store` and `Files` wrap infrastructure failures; they are never the client's fault.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Record absent, or deliberately hidden (soft-deleted).
    #[error("Not Found")]
    NotFound,
    /// A field failed validation. The message names the field.
    #[error("{0}")]
    Validation(String),
    /// A required request parameter was absent. The message names it.
    #[error("{0}")]
    MissingParameter(String),
    #[error("patientId cannot be changed: appointment belongs to another patient")]
    MismatchedPatient,
    #[error("store error: {0}")]
    Store(DbError),
    #[error("blob store error: {0}")]
    Files(#[from] FilesError),
}

impl ServiceError {
    /// `Missing <a>, <b>` for a set of absent parameters.
    pub fn missing(fields: &[&str]) -> Self {
        Self::MissingParameter(format!("Missing {}", fields.join(", ")))
    }
}

/// A store-level `NotFound` (e.g. a row that stopped being active mid-operation) stays a
/// client-visible `NotFound`.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(_) => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(DbError::Sqlite(err))
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Failures resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidInput(String),
}
