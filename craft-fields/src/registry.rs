//! Field type registry.
//!
//! Maps type identifiers to factories. Core types are registered up front;
//! plugins add theirs with [`FieldRegistry::register_plugin_field`]. An
//! identifier can only be registered once.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::field::{Field, FieldFactory};
use crate::fieldtypes::{ColorFieldType, LightswitchFieldType, NumberFieldType, PlainTextFieldType};
use crate::types::{validate_handle, FieldDef};

#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    factories: IndexMap<String, Arc<dyn FieldFactory>>,
}

impl FieldRegistry {
    /// Registry with no types at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with `Color`, `PlainText`, `Number` and `Lightswitch`.
    pub fn with_core_types() -> Self {
        let core: [Arc<dyn FieldFactory>; 4] = [
            Arc::new(ColorFieldType),
            Arc::new(PlainTextFieldType),
            Arc::new(NumberFieldType),
            Arc::new(LightswitchFieldType),
        ];
        let factories = core
            .into_iter()
            .map(|factory| (factory.type_id().to_string(), factory))
            .collect();
        Self { factories }
    }

    /// Register a plugin-provided type under `type_id`.
    pub fn register_plugin_field(
        &mut self,
        type_id: impl Into<String>,
        factory: Arc<dyn FieldFactory>,
    ) -> Result<()> {
        let type_id = type_id.into();
        if self.factories.contains_key(&type_id) {
            return Err(FieldsError::DuplicateFieldType { type_id });
        }
        debug!(type_id = %type_id, display_name = factory.display_name(), "registered field type");
        self.factories.insert(type_id, factory);
        Ok(())
    }

    pub fn resolve(&self, type_id: &str) -> Result<Arc<dyn FieldFactory>> {
        self.factories
            .get(type_id)
            .cloned()
            .ok_or_else(|| FieldsError::UnknownFieldType {
                type_id: type_id.to_string(),
            })
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.factories.contains_key(type_id)
    }

    /// Validate the handle, resolve the type and instantiate.
    pub fn create(&self, def: &FieldDef) -> Result<Box<dyn Field>> {
        validate_handle(&def.handle)?;
        self.resolve(&def.type_)?.create(def)
    }

    /// `(identifier, display name)` pairs, sorted by identifier.
    pub fn types(&self) -> Vec<(String, &'static str)> {
        let mut types: Vec<(String, &'static str)> = self
            .factories
            .iter()
            .map(|(id, factory)| (id.clone(), factory.display_name()))
            .collect();
        types.sort();
        types
    }
}
