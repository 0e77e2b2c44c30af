//! Template-facing service objects.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use craft_config::CraftConfig;
use craft_elements::{
    CriteriaResolver, CriteriaSpec, ElementKind, ElementQuery, ElementStore,
};
use serde_json::Value;

use crate::deprecator::{DeprecationNotice, Deprecator};
use crate::error::Result;

/// A service exposed as `craft.<handle>`.
pub trait Variable: Any + fmt::Debug {
    /// Name the service is registered under.
    fn handle(&self) -> &str;

    /// Implementation identifier from the service definition.
    fn implementation(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// A service with no behaviour of its own beyond its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreVariable {
    pub handle: String,
    pub implementation: String,
}

impl Variable for CoreVariable {
    fn handle(&self) -> &str {
        &self.handle
    }

    fn implementation(&self) -> &str {
        &self.implementation
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `craft.config`: read-only configuration values.
#[derive(Debug, Clone)]
pub struct ConfigVariable {
    config: CraftConfig,
}

impl ConfigVariable {
    pub fn new(config: CraftConfig) -> Self {
        Self { config }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.config.get(key)
    }

    pub fn language(&self) -> &str {
        &self.config.language
    }

    pub fn page_trigger(&self) -> &str {
        &self.config.page_trigger
    }

    pub fn dev_mode(&self) -> bool {
        self.config.dev_mode
    }
}

impl Variable for ConfigVariable {
    fn handle(&self) -> &str {
        "config"
    }

    fn implementation(&self) -> &str {
        "Config"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `craft.deprecator`: notices logged during this request.
#[derive(Debug, Clone)]
pub struct DeprecatorVariable {
    deprecator: Arc<Deprecator>,
}

impl DeprecatorVariable {
    pub fn new(deprecator: Arc<Deprecator>) -> Self {
        Self { deprecator }
    }

    pub fn notices(&self) -> Vec<DeprecationNotice> {
        self.deprecator.notices()
    }

    pub fn total_notices(&self) -> usize {
        self.deprecator.total()
    }
}

impl Variable for DeprecatorVariable {
    fn handle(&self) -> &str {
        "deprecator"
    }

    fn implementation(&self) -> &str {
        "Deprecator"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `craft.elements`: queries for any element kind by name.
#[derive(Debug, Clone)]
pub struct ElementsVariable {
    store: Arc<dyn ElementStore>,
    resolver: Arc<CriteriaResolver>,
}

impl ElementsVariable {
    pub fn new(store: Arc<dyn ElementStore>, resolver: Arc<CriteriaResolver>) -> Self {
        Self { store, resolver }
    }

    /// Query for the kind named `kind` (`"entries"`, `"Entry"`, ...).
    pub fn query(&self, kind: &str, spec: Option<CriteriaSpec>) -> Result<ElementQuery> {
        let kind: ElementKind = kind.parse()?;
        let query = ElementQuery::with_resolver(kind, Arc::clone(&self.store), Arc::clone(&self.resolver));
        match spec {
            Some(spec) => Ok(query.configured(spec)?),
            None => Ok(query),
        }
    }

    /// Kinds this variable can query.
    pub fn kinds(&self) -> &'static [ElementKind] {
        &ElementKind::ALL
    }
}

impl Variable for ElementsVariable {
    fn handle(&self) -> &str {
        "elements"
    }

    fn implementation(&self) -> &str {
        "Elements"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
