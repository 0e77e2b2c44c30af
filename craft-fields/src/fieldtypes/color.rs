//! Color picker field stored as a `#rrggbb` hex string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{FieldsError, Result};
use crate::field::{is_empty_value, value_text, Field, FieldFactory, Settings};
use crate::types::{ColumnType, FieldDef};

/// Input value when nothing is stored; keeps the color picker consistent
/// with browsers, which also start at black.
pub const DEFAULT_COLOR: &str = "#000000";

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-f]{6}$").expect("Failed to compile color regex"));

/// Factory for [`ColorField`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorFieldType;

impl FieldFactory for ColorFieldType {
    fn type_id(&self) -> &'static str {
        "Color"
    }

    fn display_name(&self) -> &'static str {
        "Color"
    }

    fn create(&self, def: &FieldDef) -> Result<Box<dyn Field>> {
        Ok(Box::new(ColorField::from_def(def)?))
    }
}

/// A hex color picker stored as `#rrggbb`.
#[derive(Debug, Clone)]
pub struct ColorField {
    def: FieldDef,
    default_color: String,
}

impl ColorField {
    pub fn from_def(def: &FieldDef) -> Result<Self> {
        let default_color = match Settings::new(def).str("defaultColor")? {
            None => DEFAULT_COLOR.to_string(),
            Some(raw) => {
                let color = normalize_hex(raw);
                if !HEX_COLOR.is_match(&color) {
                    return Err(FieldsError::configuration(
                        &def.handle,
                        format!("defaultColor '{raw}' is not a #RRGGBB color"),
                    ));
                }
                color
            }
        };
        Ok(Self {
            def: def.clone(),
            default_color,
        })
    }
}

fn normalize_hex(raw: &str) -> String {
    let trimmed = raw.trim().to_ascii_lowercase();
    if trimmed.starts_with('#') {
        trimmed
    } else {
        format!("#{trimmed}")
    }
}

impl Field for ColorField {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn display_name(&self) -> &'static str {
        "Color"
    }

    fn content_column_type(&self) -> ColumnType {
        ColumnType::String { length: 7 }
    }

    fn default_value(&self) -> Value {
        Value::String(self.default_color.clone())
    }

    fn normalize_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(normalize_hex(s)),
            other => other.clone(),
        }
    }

    fn input_template(&self) -> &'static str {
        "_includes/forms/color"
    }

    fn static_html(&self, value: &Value, _element: Option<&craft_elements::Element>) -> Option<String> {
        if is_empty_value(value) {
            return None;
        }
        let raw = value_text(value);
        if raw.trim().is_empty() {
            return None;
        }
        let hex = normalize_hex(&raw);
        let hex = html_escape::encode_double_quoted_attribute(&hex);
        Some(format!(
            r#"<div class="color" style="cursor: default;"><div class="colorpreview" style="background-color: {hex};"></div></div><div class="colorhex code">{hex}</div>"#
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(def: FieldDef) -> ColorField {
        ColorField::from_def(&def).unwrap()
    }

    #[test]
    fn test_column_is_varchar_7() {
        let f = field(FieldDef::new("Accent", "accent", "Color"));
        assert_eq!(f.content_column_type().sql(), "VARCHAR(7)");
    }

    #[test]
    fn test_default_color_setting() {
        let f = field(FieldDef::new("Accent", "accent", "Color"));
        assert_eq!(f.default_value(), json!("#000000"));

        let f = field(FieldDef::new("Accent", "accent", "Color").with_setting("defaultColor", "33AAff"));
        assert_eq!(f.default_value(), json!("#33aaff"));
    }

    #[test]
    fn test_invalid_default_color_fails_at_creation() {
        for bad in [json!("#12345"), json!("red"), json!(12)] {
            let def = FieldDef::new("Accent", "accent", "Color").with_setting("defaultColor", bad);
            assert!(matches!(
                ColorField::from_def(&def),
                Err(FieldsError::Configuration { .. })
            ));
        }
    }

    #[test]
    fn test_normalize_value() {
        let f = field(FieldDef::new("Accent", "accent", "Color"));
        assert_eq!(f.normalize_value(&json!("FF0000")), json!("#ff0000"));
        assert_eq!(f.normalize_value(&json!(" #AbCdEf ")), json!("#abcdef"));
    }

    #[test]
    fn test_static_html() {
        let f = field(FieldDef::new("Accent", "accent", "Color"));
        assert_eq!(f.static_html(&json!(null), None), None);
        assert_eq!(f.static_html(&json!(""), None), None);
        let html = f.static_html(&json!("#FF0000"), None).unwrap();
        assert!(html.contains("background-color: #ff0000;"));
        assert!(html.contains(r#"<div class="colorhex code">#ff0000</div>"#));
    }

    #[test]
    fn test_static_html_renders_non_string_values() {
        let f = field(FieldDef::new("Accent", "accent", "Color"));
        let html = f.static_html(&json!(123), None).unwrap();
        assert!(html.contains(r#"<div class="colorhex code">#123</div>"#));
        assert_eq!(f.static_html(&json!(false), None), None);
    }
}
