//! Single or multi-line text field.

use serde_json::Value;

use crate::error::{FieldsError, Result};
use crate::field::{Field, FieldFactory, Settings};
use crate::types::{ColumnType, FieldDef};

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextFieldType;

impl FieldFactory for PlainTextFieldType {
    fn type_id(&self) -> &'static str {
        "PlainText"
    }

    fn display_name(&self) -> &'static str {
        "Plain Text"
    }

    fn create(&self, def: &FieldDef) -> Result<Box<dyn Field>> {
        Ok(Box::new(PlainTextField::from_def(def)?))
    }
}

/// Single-line text, optionally length-limited.
#[derive(Debug, Clone)]
pub struct PlainTextField {
    def: FieldDef,
    max_length: Option<u32>,
    placeholder: Option<String>,
}

impl PlainTextField {
    pub fn from_def(def: &FieldDef) -> Result<Self> {
        let settings = Settings::new(def);
        let max_length = settings.u32("maxLength")?;
        if max_length == Some(0) {
            return Err(FieldsError::configuration(
                &def.handle,
                "maxLength must be greater than zero",
            ));
        }
        let placeholder = settings.str("placeholder")?.map(str::to_string);
        Ok(Self {
            def: def.clone(),
            max_length,
            placeholder,
        })
    }

    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }
}

impl Field for PlainTextField {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn display_name(&self) -> &'static str {
        "Plain Text"
    }

    fn content_column_type(&self) -> ColumnType {
        match self.max_length {
            Some(length) => ColumnType::String { length },
            None => ColumnType::Text,
        }
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn input_template(&self) -> &'static str {
        "_includes/forms/text"
    }

    fn input_params(&self, _value: &Value) -> liquid::Object {
        let mut params = liquid::Object::new();
        if let Some(max) = self.max_length {
            params.insert("maxlength".into(), liquid::model::Value::scalar(i64::from(max)));
        }
        if let Some(placeholder) = &self.placeholder {
            params.insert("placeholder".into(), liquid::model::Value::scalar(placeholder.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_type_follows_max_length() {
        let def = FieldDef::new("Summary", "summary", "PlainText");
        assert_eq!(
            PlainTextField::from_def(&def).unwrap().content_column_type(),
            ColumnType::Text
        );
        let def = def.with_setting("maxLength", 255);
        assert_eq!(
            PlainTextField::from_def(&def).unwrap().content_column_type(),
            ColumnType::String { length: 255 }
        );
    }

    #[test]
    fn test_zero_max_length_rejected() {
        let def = FieldDef::new("Summary", "summary", "PlainText").with_setting("maxLength", 0);
        assert!(matches!(
            PlainTextField::from_def(&def),
            Err(FieldsError::Configuration { .. })
        ));
    }

    #[test]
    fn test_static_html_escapes() {
        let def = FieldDef::new("Summary", "summary", "PlainText");
        let field = PlainTextField::from_def(&def).unwrap();
        assert_eq!(
            field.static_html(&json!("<b>bold</b> & co"), None).as_deref(),
            Some("&lt;b&gt;bold&lt;/b&gt; &amp; co")
        );
        assert_eq!(field.static_html(&json!(""), None), None);
    }
}
