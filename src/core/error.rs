//! Error types and error handling for xtindex.
//!
//! This module defines the error types used throughout the
//! indexing core. Errors are grouped by how callers are expected
//! to react: integrity failures stop the unit of work, cleanup
//! failures are only ever logged, and configuration failures end
//! an indexing run before it writes anything.

use thiserror::Error;

/// Result type alias for xtindex operations
pub type Result<T> = std::result::Result<T, XtIndexError>;

/// Main error type for the indexing core
#[derive(Error, Debug)]
pub enum XtIndexError {
    #[error("Index store not found: {0}")]
    StoreNotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Index integrity failure: {0}")]
    IntegrityError(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Tree error: {0}")]
    TreeError(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl XtIndexError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            XtIndexError::StoreNotFound(_) | XtIndexError::InvalidPath(_)
        )
    }

    /// Check if this error may have left a store partially repaired
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, XtIndexError::IntegrityError(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            XtIndexError::ConfigError(_) | XtIndexError::TomlError(_)
        )
    }
}
