//! Error types for the reconciliation engine.
//!
//! The three kinds map onto three blast radii: an unreadable template root
//! aborts the run, a malformed descriptor is isolated to its template, and a
//! store failure is fatal and propagated to the caller.

use pagebuilder_storage::StorageError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by the catalog sync and the page-section reconciler.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The template root (or an entry under it) could not be read.
    #[error("Failed to read template root {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One template's configuration descriptor is malformed. The sync run
    /// records this and continues with the remaining templates.
    #[error("Invalid configuration for template '{template}': {message}")]
    Configuration {
        /// The template directory whose descriptor was rejected.
        template: String,
        /// Description of the problem.
        message: String,
    },

    /// The catalog store failed. Always fatal for the operation in flight.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SyncError {
    /// Creates a new `Io` error.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Returns `true` when the error aborts a full sync run rather than
    /// being isolated to a single template.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Configuration { .. })
    }
}

/// Convenience result type for reconciliation operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = SyncError::configuration("home", "bad descriptor");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for template 'home': bad descriptor"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_error_is_fatal() {
        let err = SyncError::io(
            "/missing/root",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_storage_error_is_fatal() {
        let err = SyncError::from(StorageError::connection_error("refused"));
        assert!(err.is_fatal());
    }
}
