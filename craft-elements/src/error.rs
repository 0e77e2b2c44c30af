//! Error types for element queries

use craft_common::{ErrorSeverity, Severity};
use thiserror::Error;

use crate::kind::ElementKind;

/// Result type for element operations
pub type Result<T> = std::result::Result<T, ElementsError>;

/// Errors raised while resolving criteria or running element queries
#[derive(Debug, Error)]
pub enum ElementsError {
    /// Criteria named an attribute the element kind cannot be queried by
    #[error("unknown criteria attribute '{attribute}' for {kind} queries")]
    UnknownCriteriaAttribute {
        attribute: String,
        kind: ElementKind,
    },

    /// Operand shape could not be turned into a constraint
    #[error("invalid operand for '{attribute}': {message}")]
    InvalidCriteriaOperand { attribute: String, message: String },

    /// Pagination requested on criteria without a limit
    #[error("pagination requires a page size; set a limit on the criteria")]
    MissingPageSize,

    /// Element kind name not recognised
    #[error("unknown element kind: {name}")]
    UnknownElementKind { name: String },

    /// Storage collaborator failed
    #[error("storage error: {0}")]
    Storage(String),
}

impl ElementsError {
    pub fn unknown_attribute(attribute: impl Into<String>, kind: ElementKind) -> Self {
        ElementsError::UnknownCriteriaAttribute {
            attribute: attribute.into(),
            kind,
        }
    }

    pub fn invalid_operand(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        ElementsError::InvalidCriteriaOperand {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

impl Severity for ElementsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ElementsError::Storage(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}
