//! Variables bound while rendering a template.

use liquid::model::{KString, Value};
use serde::Serialize;

use crate::engine::Templates;
use crate::error::{Result, TemplatingError};

/// Mutable set of globals for one render.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    globals: liquid::Object,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_object(globals: liquid::Object) -> Self {
        Self { globals }
    }

    /// Bind a serializable value, returning what was bound before.
    pub fn set<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<Option<Value>> {
        let value = to_liquid(value)?;
        Ok(self.insert(name, value))
    }

    /// Bind a liquid value, returning what was bound before.
    pub fn insert(&mut self, name: &str, value: Value) -> Option<Value> {
        self.globals.insert(KString::from(name.to_string()), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.globals.remove(name)
    }

    /// Put back a binding saved from [`insert`](Self::insert): re-bind the
    /// old value, or drop the name when there was none.
    pub fn restore(&mut self, name: &str, previous: Option<Value>) {
        match previous {
            Some(value) => {
                self.insert(name, value);
            }
            None => {
                self.remove(name);
            }
        }
    }

    pub fn as_object(&self) -> &liquid::Object {
        &self.globals
    }

    pub fn into_object(self) -> liquid::Object {
        self.globals
    }

    /// Render `path` with the current bindings.
    pub fn render(&self, templates: &dyn Templates, path: &str) -> Result<String> {
        templates.render(path, self.globals.clone())
    }
}

/// Convert any serializable value into a liquid value.
pub fn to_liquid<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    liquid::model::to_value(&value).map_err(|e| TemplatingError::Render(e.to_string()))
}
