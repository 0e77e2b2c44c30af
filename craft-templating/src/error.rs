//! Error types for template rendering

use craft_common::{ErrorSeverity, Severity};
use craft_elements::ElementsError;
use thiserror::Error;

/// Result type for templating operations
pub type Result<T> = std::result::Result<T, TemplatingError>;

/// Errors that can occur while loading or rendering templates
#[derive(Debug, Error)]
pub enum TemplatingError {
    /// No template registered under this path
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    /// Template source failed to parse
    #[error("template parse error: {0}")]
    Parse(String),

    /// Template failed while rendering
    #[error("template render error: {0}")]
    Render(String),

    /// A query run on behalf of a template failed
    #[error(transparent)]
    Elements(#[from] ElementsError),
}

impl Severity for TemplatingError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TemplatingError::TemplateNotFound { .. } => ErrorSeverity::Error,
            TemplatingError::Parse(_) | TemplatingError::Render(_) => ErrorSeverity::Error,
            TemplatingError::Elements(err) => err.severity(),
        }
    }
}
