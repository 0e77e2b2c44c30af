//! The `craft` template global.

use std::fmt;
use std::sync::Arc;

use craft_common::Edition;
use craft_config::CraftConfig;
use craft_elements::{CriteriaResolver, CriteriaSpec, ElementKind, ElementQuery, ElementStore};
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use serde_json::Value;
use tracing::{debug, warn};

use crate::components::component_definitions;
use crate::deprecator::Deprecator;
use crate::error::{Result, VariableError};
use crate::plugin::Plugin;
use crate::service::{ServiceContext, ServiceDefinition};
use crate::variable::Variable;

/// Deprecation key shared by every legacy `craft.<name>()` call.
pub const LEGACY_CALL_KEY: &str = "CraftVariable::__call()";

/// Where a service came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSource {
    /// Core or edition-tier service
    Builtin,
    /// Contributed by the plugin with this handle
    Plugin(String),
}

struct Service {
    definition: ServiceDefinition,
    source: ServiceSource,
    instance: OnceCell<Arc<dyn Variable>>,
}

/// Request-scoped registry of named template services.
///
/// Services are instantiated on first access and then reused. Which names
/// exist depends on the edition and on the plugins handed to the builder.
pub struct CraftVariable {
    edition: Edition,
    config: CraftConfig,
    store: Arc<dyn ElementStore>,
    resolver: Arc<CriteriaResolver>,
    deprecator: Arc<Deprecator>,
    services: IndexMap<String, Service>,
}

impl CraftVariable {
    pub fn builder(store: Arc<dyn ElementStore>) -> CraftVariableBuilder {
        CraftVariableBuilder {
            store,
            config: CraftConfig::default(),
            edition: None,
            plugins: Vec::new(),
            deprecator: None,
            resolver: None,
        }
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    pub fn has(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Registered service names, core first, then edition and plugin services.
    pub fn names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    pub fn source(&self, name: &str) -> Option<&ServiceSource> {
        self.services.get(name).map(|service| &service.source)
    }

    /// The service registered as `name`, instantiated on first use.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Variable>> {
        self.instance(name).map(Arc::clone)
    }

    /// The service as its concrete type, `None` when it is another type.
    pub fn get_as<T: Variable>(&self, name: &str) -> Result<Option<&T>> {
        Ok(self.instance(name)?.as_any().downcast_ref::<T>())
    }

    /// Legacy function-call form, `craft.sections()`.
    ///
    /// With no arguments and a registered name this logs a deprecation notice
    /// and returns the same instance as [`get`](Self::get).
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Arc<dyn Variable>> {
        if !args.is_empty() {
            return Err(VariableError::UnknownMethod {
                name: name.to_string(),
            });
        }
        if !self.has(name) {
            return Err(VariableError::UnknownService {
                name: name.to_string(),
            });
        }
        self.deprecator.log(
            LEGACY_CALL_KEY,
            format!(
                "craft.{name}() is no longer a function. Use \"craft.{name}\" instead (without the parentheses)."
            ),
        );
        self.get(name)
    }

    /// Language of the current request.
    pub fn locale(&self) -> &str {
        &self.config.language
    }

    pub fn is_localized(&self) -> bool {
        self.config.is_localized()
    }

    pub fn config(&self) -> &CraftConfig {
        &self.config
    }

    pub fn deprecator(&self) -> &Arc<Deprecator> {
        &self.deprecator
    }

    /// New query for `kind`; configured only when `spec` is given.
    pub fn elements(&self, kind: ElementKind, spec: Option<CriteriaSpec>) -> Result<ElementQuery> {
        let query =
            ElementQuery::with_resolver(kind, Arc::clone(&self.store), Arc::clone(&self.resolver));
        match spec {
            Some(spec) => Ok(query.configured(spec)?),
            None => Ok(query),
        }
    }

    pub fn assets(&self, spec: Option<CriteriaSpec>) -> Result<ElementQuery> {
        self.elements(ElementKind::Asset, spec)
    }

    pub fn categories(&self, spec: Option<CriteriaSpec>) -> Result<ElementQuery> {
        self.elements(ElementKind::Category, spec)
    }

    pub fn entries(&self, spec: Option<CriteriaSpec>) -> Result<ElementQuery> {
        self.elements(ElementKind::Entry, spec)
    }

    pub fn tags(&self, spec: Option<CriteriaSpec>) -> Result<ElementQuery> {
        self.elements(ElementKind::Tag, spec)
    }

    pub fn users(&self, spec: Option<CriteriaSpec>) -> Result<ElementQuery> {
        self.elements(ElementKind::User, spec)
    }

    fn instance(&self, name: &str) -> Result<&Arc<dyn Variable>> {
        let service = self
            .services
            .get(name)
            .ok_or_else(|| VariableError::UnknownService {
                name: name.to_string(),
            })?;
        Ok(service.instance.get_or_init(|| {
            debug!(service = %name, implementation = %service.definition.implementation(), "instantiating service");
            let ctx = ServiceContext {
                handle: name,
                config: &self.config,
                store: &self.store,
                resolver: &self.resolver,
                deprecator: &self.deprecator,
            };
            service.definition.instantiate(&ctx)
        }))
    }
}

impl fmt::Debug for CraftVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CraftVariable")
            .field("edition", &self.edition)
            .field("services", &self.names())
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`CraftVariable::builder`].
pub struct CraftVariableBuilder {
    store: Arc<dyn ElementStore>,
    config: CraftConfig,
    edition: Option<Edition>,
    plugins: Vec<Arc<dyn Plugin>>,
    deprecator: Option<Arc<Deprecator>>,
    resolver: Option<CriteriaResolver>,
}

impl CraftVariableBuilder {
    pub fn config(mut self, config: &CraftConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Override the configured edition.
    pub fn edition(mut self, edition: Edition) -> Self {
        self.edition = Some(edition);
        self
    }

    /// Add a plugin; earlier plugins win name conflicts.
    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Share a deprecator with other request components.
    pub fn deprecator(mut self, deprecator: Arc<Deprecator>) -> Self {
        self.deprecator = Some(deprecator);
        self
    }

    /// Resolver with custom field handles registered.
    pub fn resolver(mut self, resolver: CriteriaResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn build(self) -> CraftVariable {
        let edition = self.edition.unwrap_or(self.config.edition);
        let mut services: IndexMap<String, Service> = component_definitions(edition)
            .into_iter()
            .map(|(name, definition)| {
                let service = Service {
                    definition,
                    source: ServiceSource::Builtin,
                    instance: OnceCell::new(),
                };
                (name, service)
            })
            .collect();

        for plugin in &self.plugins {
            let handle = plugin.handle();
            if services.contains_key(handle) {
                warn!(plugin = %handle, "plugin service name already registered, skipping");
                continue;
            }
            if let Some(definition) = plugin.variable_definition() {
                debug!(plugin = %handle, implementation = %definition.implementation(), "registered plugin service");
                services.insert(
                    handle.to_string(),
                    Service {
                        definition,
                        source: ServiceSource::Plugin(handle.to_string()),
                        instance: OnceCell::new(),
                    },
                );
            }
        }

        debug!(%edition, services = services.len(), "built craft variable");
        CraftVariable {
            edition,
            config: self.config,
            store: self.store,
            resolver: Arc::new(self.resolver.unwrap_or_default()),
            deprecator: self.deprecator.unwrap_or_default(),
            services,
        }
    }
}

impl fmt::Debug for CraftVariableBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CraftVariableBuilder")
            .field("edition", &self.edition)
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}
