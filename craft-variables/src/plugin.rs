//! Plugin contributions to the façade.

use std::fmt;

use crate::service::ServiceDefinition;

/// A loaded plugin that may expose a template service under its handle.
pub trait Plugin: fmt::Debug {
    /// Unique plugin handle; also the service name it contributes.
    fn handle(&self) -> &str;

    /// Service exposed as `craft.<handle>`, if any.
    fn variable_definition(&self) -> Option<ServiceDefinition> {
        None
    }
}
