//! Storage error types.

use thiserror::Error;

use permtree_domain::DomainError;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Entity not found.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Entity already exists.
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },

    /// A group was used where only users are allowed.
    #[error("invalid principal '{value}': {reason}")]
    InvalidPrincipal { value: String, reason: String },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Serialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },

    /// I/O error while reading or writing a snapshot.
    #[error("i/o error: {message}")]
    IoError { message: String },
}

impl StorageError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn already_exists(kind: &'static str, id: impl ToString) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { kind, id } => DomainError::NotFound { kind, id },
            StorageError::InvalidPrincipal { value, reason } => {
                DomainError::InvalidPrincipal { value, reason }
            }
            other => DomainError::StorageError {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
