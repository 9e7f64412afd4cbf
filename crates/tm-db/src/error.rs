//! Error types for tm-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Script or statement execution error (D002)
    #[error("[D002] Failed to execute: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// Version tracking table could not be read or written (D004)
    #[error("[D004] Version tracking failed: {0}")]
    VersionStoreError(String),

    /// Stored version is not a valid version (D005)
    #[error("[D005] Stored version {0} is not a valid version")]
    CorruptVersion(i64),

    /// Unknown or disabled driver (D006)
    #[error("[D006] Driver \"{0}\" not found")]
    UnknownDriver(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<postgres::Error> for DbError {
    fn from(err: postgres::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

#[cfg(feature = "mysql")]
impl From<mysql::Error> for DbError {
    fn from(err: mysql::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
