//! Error types for the template variable façade

use craft_common::{ErrorSeverity, Severity};
use craft_elements::ElementsError;
use thiserror::Error;

/// Result type for façade operations
pub type Result<T> = std::result::Result<T, VariableError>;

#[derive(Debug, Error)]
pub enum VariableError {
    /// No service registered under this name for the current edition and plugins
    #[error("unknown service: craft.{name}")]
    UnknownService { name: String },

    /// Called as a method with arguments, which the façade does not support
    #[error("calling unknown method: craft.{name}()")]
    UnknownMethod { name: String },

    /// A query shortcut failed to configure its query
    #[error(transparent)]
    Elements(#[from] ElementsError),
}

impl Severity for VariableError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            VariableError::UnknownService { .. } | VariableError::UnknownMethod { .. } => {
                ErrorSeverity::Error
            }
            VariableError::Elements(err) => err.severity(),
        }
    }
}
