//! Database error types

use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// The row changed under us: the caller should reload and retry
    #[error("Concurrent modification of {entity} '{id}'")]
    ConcurrentModification { entity: &'static str, id: String },

    /// A business rule blocked the operation at the storage layer
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Stored state could not be decoded into a domain value
    #[error("Corrupt stored state: {0}")]
    CorruptState(String),

    /// Generic SQL error
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Creates a not found error for an entity type and identifier
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Creates a concurrent-modification error
    pub fn concurrent(entity: &'static str, id: impl std::fmt::Display) -> Self {
        DatabaseError::ConcurrentModification {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a corrupt-state error
    pub fn corrupt(detail: impl std::fmt::Display) -> Self {
        DatabaseError::CorruptState(detail.to_string())
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error should be retried by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, DatabaseError::ConcurrentModification { .. })
    }
}
