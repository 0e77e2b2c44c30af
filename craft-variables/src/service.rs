//! Service definitions: how a named component is instantiated.

use std::fmt;
use std::sync::Arc;

use craft_config::CraftConfig;
use craft_elements::{CriteriaResolver, ElementStore};

use crate::deprecator::Deprecator;
use crate::variable::{CoreVariable, Variable};

/// What a service factory can draw on when it is instantiated.
#[derive(Clone, Copy)]
pub struct ServiceContext<'a> {
    /// Name the service is being instantiated under
    pub handle: &'a str,
    pub config: &'a CraftConfig,
    pub store: &'a Arc<dyn ElementStore>,
    pub resolver: &'a Arc<CriteriaResolver>,
    pub deprecator: &'a Arc<Deprecator>,
}

impl fmt::Debug for ServiceContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

type Factory = Arc<dyn Fn(&ServiceContext<'_>) -> Arc<dyn Variable>>;

/// An implementation identifier plus the factory that builds it.
#[derive(Clone)]
pub struct ServiceDefinition {
    implementation: String,
    factory: Factory,
}

impl ServiceDefinition {
    pub fn new<F>(implementation: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&ServiceContext<'_>) -> Arc<dyn Variable> + 'static,
    {
        Self {
            implementation: implementation.into(),
            factory: Arc::new(factory),
        }
    }

    /// Definition producing a [`CoreVariable`] marker.
    pub fn core(implementation: impl Into<String>) -> Self {
        let implementation = implementation.into();
        let name = implementation.clone();
        Self::new(implementation, move |ctx| {
            Arc::new(CoreVariable {
                handle: ctx.handle.to_string(),
                implementation: name.clone(),
            })
        })
    }

    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn instantiate(&self, ctx: &ServiceContext<'_>) -> Arc<dyn Variable> {
        (self.factory)(ctx)
    }
}

impl fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDefinition")
            .field("implementation", &self.implementation)
            .finish_non_exhaustive()
    }
}
