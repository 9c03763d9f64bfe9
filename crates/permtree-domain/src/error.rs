//! Domain error types for grant resolution.

use thiserror::Error;

/// Domain-specific errors for grant resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A principal, node, asset or record id is unknown.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The principal cannot be used this way (groups have no groups).
    #[error("invalid principal '{value}': {reason}")]
    InvalidPrincipal { value: String, reason: String },

    /// A node key is not a well-formed colon-delimited path.
    #[error("inconsistent node key '{key}': {reason}")]
    InconsistentKey { key: String, reason: String },

    /// A collaborator failed while serving a query.
    #[error("storage error: {message}")]
    StorageError { message: String },
}

impl DomainError {
    /// Shorthand for [`DomainError::NotFound`].
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Shorthand for [`DomainError::InconsistentKey`].
    pub fn inconsistent_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InconsistentKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
