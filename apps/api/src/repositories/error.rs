//! Repository error type
//!
//! Errors are cheap to clone so a failed batch can hand the same error to
//! every caller waiting on it.

use std::sync::Arc;

use thiserror::Error;

/// Failure reported by a repository call
#[derive(Error, Debug, Clone)]
pub enum RepositoryError {
    /// Write or delete addressed a row that does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violated
    #[error("{entity} already exists: {reason}")]
    Conflict { entity: &'static str, reason: String },

    /// Foreign key points at a missing row
    #[error("invalid {entity} reference: {reason}")]
    InvalidReference { entity: &'static str, reason: String },

    /// Storage could not be reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Any other driver error
    #[error("database error: {0}")]
    Database(Arc<sqlx::Error>),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classify a driver error raised by an insert, update or delete
    pub fn from_write(entity: &'static str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Self::Conflict {
                    entity,
                    reason: db.message().to_string(),
                };
            }
            if db.is_foreign_key_violation() {
                return Self::InvalidReference {
                    entity,
                    reason: db.message().to_string(),
                };
            }
        }
        err.into()
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        let unreachable = matches!(
            err,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        );
        if unreachable {
            Self::Unavailable(err.to_string())
        } else {
            Self::Database(Arc::new(err))
        }
    }
}
