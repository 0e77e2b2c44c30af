//! Error severity classification
//!
//! Every Craft crate defines its own `thiserror` enum; this module provides
//! the shared vocabulary for how serious each variant is, so callers can pick
//! a log level or decide whether a failure is recoverable.

/// Severity levels for error classification
///
/// - **Warning**: Potential issue but the operation can proceed.
/// - **Error**: The operation failed; correcting the input makes it succeed.
/// - **Critical**: Setup is broken (bad schema, conflicting registrations);
///   the system should not keep serving with it.
///
/// # Examples
///
/// ```rust
/// use craft_common::ErrorSeverity;
///
/// // Unknown criteria attribute: the caller can fix the query
/// let misuse = ErrorSeverity::Error;
///
/// // Duplicate field type registration: setup is inconsistent
/// let setup = ErrorSeverity::Critical;
/// assert_ne!(misuse, setup);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,

    /// Operation failed but the caller can recover by correcting input
    Error,

    /// Configuration or registration is inconsistent
    Critical,
}

/// Trait for error types that have severity levels
///
/// # Example
///
/// ```rust
/// use craft_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum RegistryError {
///     Duplicate,
///     Missing,
/// }
///
/// impl Severity for RegistryError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             RegistryError::Duplicate => ErrorSeverity::Critical,
///             RegistryError::Missing => ErrorSeverity::Error,
///         }
///     }
/// }
///
/// assert_eq!(RegistryError::Duplicate.severity(), ErrorSeverity::Critical);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}
