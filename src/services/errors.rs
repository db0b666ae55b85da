use thiserror::Error;
use validator::ValidationErrors;

/// Failures of the content and account services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The store stayed locked for every retry attempt.
    #[error("storage is busy, try again")]
    ConcurrencyConflict,

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

/// Returns true for SQLite "database is busy/locked" failures, which are safe
/// to retry.
pub(crate) fn is_contention(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };
    // Extended result codes keep the primary code in the low byte.
    match db_err.code().and_then(|code| code.parse::<i32>().ok()) {
        Some(code) => matches!(code & 0xff, 5 | 6),
        None => db_err.message().contains("database is locked"),
    }
}
