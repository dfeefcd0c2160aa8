use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

/// Error types for the store layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// A user with this username already exists
    #[error("Username '{0}' already exists")]
    DuplicateUser(String),

    /// The addressed record does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The database could not be reached or did not answer in time
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(DbErr),

    /// Hashing or verifying a password failed
    #[error("Password hashing error: {0}")]
    Hashing(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                error!(?err, "Database connection failure");
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// True when the database rejected a write because of a unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// True when the database rejected a write because a referenced row is missing.
pub(crate) fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// Type alias for Result with StoreError
pub type Result<T> = std::result::Result<T, StoreError>;
