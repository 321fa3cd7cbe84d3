//! Error types and error handling for the furqan corpus service.
//!
//! This module defines the error types used throughout the
//! application. Protocol-specific handling (HTTP status codes) lives
//! in the adapter modules.

use thiserror::Error;

/// Result type alias for furqan operations
pub type Result<T> = std::result::Result<T, FurqanError>;

/// Main error type for the furqan service
#[derive(Error, Debug)]
pub enum FurqanError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("Invalid {entity}.{field}: {message}")]
    Validation {
        entity: &'static str,
        field: &'static str,
        message: String,
    },

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Cannot delete {entity} {number}: referenced by {references} verses")]
    ProtectedReference {
        entity: &'static str,
        number: u16,
        references: usize,
    },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid query field '{field}': {message}")]
    InvalidQueryField {
        field: String,
        message: String,
        valid_fields: Vec<String>,
        suggestion: Option<String>,
    },

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl FurqanError {
    /// Shorthand for a field validation failure
    pub fn validation(entity: &'static str, field: &'static str, message: impl Into<String>) -> Self {
        FurqanError::Validation {
            entity,
            field,
            message: message.into(),
        }
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, FurqanError::NotFound(_))
    }

    /// Check if this is a conflict error (integrity or protected reference)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            FurqanError::Integrity(_) | FurqanError::ProtectedReference { .. }
        )
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            FurqanError::Validation { .. }
                | FurqanError::InvalidQuery(_)
                | FurqanError::InvalidQueryField { .. }
                | FurqanError::InvalidCursor(_)
                | FurqanError::ConfigError(_)
        )
    }

    /// Check if the search index has not been built yet
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FurqanError::IndexUnavailable(_))
    }
}
