//! On/off toggle stored as a boolean.

use serde_json::Value;

use crate::error::Result;
use crate::field::{Field, FieldFactory, Settings};
use crate::types::{ColumnType, FieldDef};

#[derive(Debug, Default, Clone, Copy)]
pub struct LightswitchFieldType;

impl FieldFactory for LightswitchFieldType {
    fn type_id(&self) -> &'static str {
        "Lightswitch"
    }

    fn display_name(&self) -> &'static str {
        "Lightswitch"
    }

    fn create(&self, def: &FieldDef) -> Result<Box<dyn Field>> {
        Ok(Box::new(LightswitchField::from_def(def)?))
    }
}

/// On/off toggle.
#[derive(Debug, Clone)]
pub struct LightswitchField {
    def: FieldDef,
    default_on: bool,
}

impl LightswitchField {
    pub fn from_def(def: &FieldDef) -> Result<Self> {
        let default_on = Settings::new(def).bool("default")?.unwrap_or(false);
        Ok(Self {
            def: def.clone(),
            default_on,
        })
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl Field for LightswitchField {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn display_name(&self) -> &'static str {
        "Lightswitch"
    }

    fn content_column_type(&self) -> ColumnType {
        ColumnType::Boolean
    }

    fn default_value(&self) -> Value {
        Value::Bool(self.default_on)
    }

    fn normalize_value(&self, value: &Value) -> Value {
        Value::Bool(truthy(value))
    }

    fn input_template(&self) -> &'static str {
        "_includes/forms/lightswitch"
    }

    fn input_params(&self, value: &Value) -> liquid::Object {
        let mut params = liquid::Object::new();
        params.insert("on".into(), liquid::model::Value::scalar(truthy(value)));
        params
    }

    fn static_html(&self, value: &Value, _element: Option<&craft_elements::Element>) -> Option<String> {
        if crate::field::is_empty_value(value) {
            return None;
        }
        let label = if truthy(value) { "Yes" } else { "No" };
        Some(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthy_values() {
        let field = LightswitchField::from_def(&FieldDef::new("Featured", "featured", "Lightswitch")).unwrap();
        assert_eq!(field.normalize_value(&json!("on")), json!(true));
        assert_eq!(field.normalize_value(&json!("1")), json!(true));
        assert_eq!(field.normalize_value(&json!(0)), json!(false));
        assert_eq!(field.normalize_value(&json!("")), json!(false));
    }

    #[test]
    fn test_default_setting() {
        let def = FieldDef::new("Featured", "featured", "Lightswitch").with_setting("default", true);
        let field = LightswitchField::from_def(&def).unwrap();
        assert_eq!(field.default_value(), json!(true));
        assert_eq!(field.content_column_type(), ColumnType::Boolean);

        let bad = FieldDef::new("Featured", "featured", "Lightswitch").with_setting("default", "yes");
        assert!(LightswitchField::from_def(&bad).is_err());
    }

    #[test]
    fn test_static_html() {
        let field = LightswitchField::from_def(&FieldDef::new("Featured", "featured", "Lightswitch")).unwrap();
        assert_eq!(field.static_html(&json!(null), None), None);
        assert_eq!(field.static_html(&json!(true), None).as_deref(), Some("Yes"));
        assert_eq!(field.static_html(&json!(false), None).as_deref(), Some("No"));
    }
}
