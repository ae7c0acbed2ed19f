use thiserror::Error;

use crate::filter::FilterError;

/// Errors raised by a `FlashcardStore` backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Query error: {0}")]
    Query(#[from] FilterError),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                let message = match db.constraint() {
                    Some(c) if c.contains("username") => "Username already exists",
                    Some(c) if c.contains("email") => "Account with email already exists",
                    _ => "Duplicate record",
                };
                return StorageError::Conflict(message.to_string());
            }
            // Parent row vanished between the guard check and the write
            if db.is_foreign_key_violation() {
                return StorageError::NotFound("Referenced record no longer exists".to_string());
            }
        }
        StorageError::Sqlx(err)
    }
}
