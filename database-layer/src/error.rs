use error_common::AppError;
use thiserror::Error;

/// SQLSTATE reported by PostgreSQL for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Write attempted in a read-only transaction")]
    ReadOnlyTransaction,

    #[error("Transaction already committed")]
    TransactionClosed,

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Whether the error was raised by a unique constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::SqlxError(sqlx::Error::Database(db)) => {
                db.code().as_deref() == Some(UNIQUE_VIOLATION)
            }
            _ => false,
        }
    }

    /// Whether the store could not be reached at all
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_)
                | DatabaseError::SqlxError(sqlx::Error::PoolTimedOut)
                | DatabaseError::SqlxError(sqlx::Error::PoolClosed)
                | DatabaseError::SqlxError(sqlx::Error::Io(_))
        )
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let err = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_connection_error());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_row_not_found_is_neither() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(!err.is_connection_error());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_converts_to_app_error() {
        let err: AppError = DatabaseError::MigrationError("checksum mismatch".into()).into();
        assert!(matches!(err, AppError::DatabaseError(msg) if msg.contains("checksum mismatch")));
    }
}
