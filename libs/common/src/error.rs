//! Custom error types for the common library
//!
//! This module defines the persistence error type shared by every service
//! that talks to the document store.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A document could not be converted to or from JSON
    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A unique key is already taken by another document
    #[error("Duplicate value for unique field `{0}`")]
    Duplicate(String),
}

impl DatabaseError {
    /// Classify a sqlx error raised by a query, surfacing unique-key
    /// violations as [`DatabaseError::Duplicate`].
    pub fn from_query(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = db_err
                    .constraint()
                    .and_then(|name| name.rsplit("__").next())
                    .unwrap_or("unknown")
                    .to_string();
                return DatabaseError::Duplicate(field);
            }
        }
        DatabaseError::Query(err)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
