//! Error types for fields and the field registry

use std::path::PathBuf;

use craft_common::{ErrorSeverity, Severity};
use craft_templating::TemplatingError;
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in field registry operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Field definition has invalid settings or an invalid handle
    #[error("invalid configuration for field '{field}': {message}")]
    Configuration { field: String, message: String },

    /// No field type registered under this identifier
    #[error("unknown field type: {type_id}")]
    UnknownFieldType { type_id: String },

    /// Field type identifier already registered
    #[error("field type already registered: {type_id}")]
    DuplicateFieldType { type_id: String },

    /// Handle already used in this schema
    #[error("duplicate field handle: {handle}")]
    DuplicateFieldHandle { handle: String },

    /// Field not found by handle
    #[error("field not found: {handle}")]
    FieldNotFound { handle: String },

    /// Field not found by ULID
    #[error("field not found by id: {id}")]
    FieldNotFoundById { id: String },

    /// Fields directory missing
    #[error("fields directory not found: {path}")]
    NotInitialized { path: PathBuf },

    /// Rendering an input failed
    #[error(transparent)]
    Templating(#[from] TemplatingError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FieldsError {
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldsError::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Severity for FieldsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FieldsError::FieldNotFound { .. } | FieldsError::FieldNotFoundById { .. } => {
                ErrorSeverity::Warning
            }
            FieldsError::Configuration { .. }
            | FieldsError::UnknownFieldType { .. }
            | FieldsError::DuplicateFieldType { .. }
            | FieldsError::DuplicateFieldHandle { .. }
            | FieldsError::NotInitialized { .. } => ErrorSeverity::Error,
            FieldsError::Templating(err) => err.severity(),
            FieldsError::Io(_) | FieldsError::Yaml(_) => ErrorSeverity::Critical,
        }
    }
}
