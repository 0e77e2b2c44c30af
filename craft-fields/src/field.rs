//! The field abstraction.
//!
//! A [`Field`] is an instantiated field definition: it knows its content
//! column, how to render an input for a value, and how to render a value
//! read-only. Instances are created by a [`FieldFactory`], which validates the
//! definition's settings so that a bad configuration fails up front and never
//! at render time.

use std::fmt;

use craft_elements::Element;
use craft_templating::Templates;
use serde_json::Value;

use crate::error::{FieldsError, Result};
use crate::types::{ColumnType, FieldDef};

/// Creates [`Field`] instances of one type.
pub trait FieldFactory: Send + Sync + fmt::Debug {
    /// Type identifier used in definitions, e.g. `Color`.
    fn type_id(&self) -> &'static str;

    /// Human-readable type label.
    fn display_name(&self) -> &'static str;

    /// Instantiate a field from its definition, validating settings.
    fn create(&self, def: &FieldDef) -> Result<Box<dyn Field>>;
}

/// A typed custom field.
pub trait Field: Send + Sync + fmt::Debug {
    fn def(&self) -> &FieldDef;

    /// Static label of the field's type.
    fn display_name(&self) -> &'static str;

    fn handle(&self) -> &str {
        &self.def().handle
    }

    fn name(&self) -> &str {
        &self.def().name
    }

    fn content_column_type(&self) -> ColumnType;

    /// Value shown in the input when the stored value is empty.
    fn default_value(&self) -> Value;

    /// Canonical form of a stored or submitted value.
    fn normalize_value(&self, value: &Value) -> Value {
        value.clone()
    }

    /// Path of the form include that renders this field's input.
    fn input_template(&self) -> &'static str;

    /// Extra include parameters beyond `id`, `name` and `value`.
    fn input_params(&self, _value: &Value) -> liquid::Object {
        liquid::Object::new()
    }

    /// Editable markup for `value`.
    fn input_html(
        &self,
        value: &Value,
        _element: Option<&Element>,
        templates: &dyn Templates,
    ) -> Result<String> {
        let value = if is_empty_value(value) {
            self.default_value()
        } else {
            self.normalize_value(value)
        };

        let mut params = self.input_params(&value);
        params.insert("id".into(), liquid::model::Value::scalar(templates.format_input_id(self.handle())));
        params.insert("name".into(), liquid::model::Value::scalar(self.handle().to_string()));
        params.insert("value".into(), liquid::model::Value::scalar(value_text(&value)));
        Ok(templates.render(self.input_template(), params)?)
    }

    /// Read-only markup for `value`, `None` when there is nothing to show.
    fn static_html(&self, value: &Value, _element: Option<&Element>) -> Option<String> {
        if is_empty_value(value) {
            return None;
        }
        let text = value_text(&self.normalize_value(value));
        Some(html_escape::encode_text(&text).into_owned())
    }
}

/// `null`, empty strings and empty arrays or objects count as empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Plain-text form of a scalar value.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}

/// Typed access to a definition's settings.
///
/// A setting that is present with the wrong JSON type is a configuration
/// error; an absent or `null` setting reads as `None`.
#[derive(Debug, Clone, Copy)]
pub struct Settings<'a> {
    def: &'a FieldDef,
}

impl<'a> Settings<'a> {
    pub fn new(def: &'a FieldDef) -> Self {
        Self { def }
    }

    pub fn str(&self, key: &str) -> Result<Option<&'a str>> {
        match self.def.setting(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.wrong_type(key, "a string", other)),
        }
    }

    pub fn f64(&self, key: &str) -> Result<Option<f64>> {
        match self.def.setting(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.wrong_type(key, "a number", &Value::String(s.clone()))),
            Some(other) => Err(self.wrong_type(key, "a number", other)),
        }
    }

    pub fn u32(&self, key: &str) -> Result<Option<u32>> {
        match self.def.setting(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a non-negative integer", &Value::Number(n.clone()))),
            Some(other) => Err(self.wrong_type(key, "a non-negative integer", other)),
        }
    }

    pub fn bool(&self, key: &str) -> Result<Option<bool>> {
        match self.def.setting(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.wrong_type(key, "a boolean", other)),
        }
    }

    fn wrong_type(&self, key: &str, expected: &str, got: &Value) -> FieldsError {
        FieldsError::configuration(
            &self.def.handle,
            format!("setting '{key}' must be {expected}, got {got}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!("  ")));
        assert!(is_empty_value(&json!([])));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!("#fff")));
    }

    #[test]
    fn test_settings_types() {
        let def = FieldDef::new("Price", "price", "Number")
            .with_setting("min", 1)
            .with_setting("max", "10.5")
            .with_setting("decimals", 2)
            .with_setting("placeholder", 3);
        let settings = Settings::new(&def);
        assert_eq!(settings.f64("min").unwrap(), Some(1.0));
        assert_eq!(settings.f64("max").unwrap(), Some(10.5));
        assert_eq!(settings.u32("decimals").unwrap(), Some(2));
        assert_eq!(settings.u32("absent").unwrap(), None);
        assert!(matches!(
            settings.str("placeholder"),
            Err(FieldsError::Configuration { field, .. }) if field == "price"
        ));
    }
}
