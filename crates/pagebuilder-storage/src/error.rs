//! Storage error types for the catalog store abstraction layer.

use std::fmt;

/// Errors that can occur during catalog store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested row was not found.
    #[error("Not found: {entity}/{key}")]
    NotFound {
        /// The entity kind that was looked up.
        entity: String,
        /// The key or id that did not resolve.
        key: String,
    },

    /// A unique key is already taken (possibly by a trashed row).
    #[error("Already exists: {entity}/{key}")]
    AlreadyExists {
        /// The entity kind that conflicted.
        entity: String,
        /// The conflicting key.
        key: String,
    },

    /// The row data is invalid for the requested operation.
    #[error("Invalid entity: {message}")]
    InvalidEntity {
        /// Description of why the row is invalid.
        message: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>, key: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(entity: impl Into<String>, key: impl fmt::Display) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Creates a new `InvalidEntity` error.
    #[must_use]
    pub fn invalid_entity(message: impl Into<String>) -> Self {
        Self::InvalidEntity {
            message: message.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an already exists error.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::InvalidEntity { .. } => ErrorCategory::Validation,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Row not found.
    NotFound,
    /// Key conflict.
    Conflict,
    /// Validation error.
    Validation,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("Template", "landing");
        assert_eq!(err.to_string(), "Not found: Template/landing");

        let err = StorageError::already_exists("SectionDefinition", "home-hero");
        assert_eq!(err.to_string(), "Already exists: SectionDefinition/home-hero");
    }

    #[test]
    fn test_error_predicates() {
        let err = StorageError::not_found("Page", "1");
        assert!(err.is_not_found());
        assert!(!err.is_already_exists());

        let err = StorageError::already_exists("Template", "home");
        assert!(err.is_already_exists());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::not_found("Page", "1").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            StorageError::already_exists("Template", "home").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            StorageError::invalid_entity("bad data").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            StorageError::connection_error("refused").category(),
            ErrorCategory::Infrastructure
        );
    }
}
