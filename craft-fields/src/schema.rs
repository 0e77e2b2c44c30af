//! Content schema: the ordered set of fields attached to an element layout.

use craft_elements::Element;
use craft_templating::Templates;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{FieldsError, Result};
use crate::field::Field;
use crate::types::ColumnType;

/// Ordered fields with unique handles.
#[derive(Debug, Default)]
pub struct ContentSchema {
    fields: IndexMap<String, Box<dyn Field>>,
}

impl ContentSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; its handle must not be taken.
    pub fn add(&mut self, field: Box<dyn Field>) -> Result<()> {
        let handle = field.handle().to_string();
        if self.fields.contains_key(&handle) {
            return Err(FieldsError::DuplicateFieldHandle { handle });
        }
        self.fields.insert(handle, field);
        Ok(())
    }

    pub fn field(&self, handle: &str) -> Option<&dyn Field> {
        self.fields.get(handle).map(|f| f.as_ref())
    }

    pub fn fields(&self) -> impl Iterator<Item = &dyn Field> {
        self.fields.values().map(|f| f.as_ref())
    }

    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `(column name, column type)` for every field, in schema order.
    pub fn columns(&self) -> Vec<(String, ColumnType)> {
        self.fields
            .values()
            .map(|f| (f.def().column_name(), f.content_column_type()))
            .collect()
    }

    /// Read-only markup for each field with a non-empty value on `element`.
    pub fn static_html(&self, element: &Element) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter_map(|(handle, field)| {
                let value = element.field_value(handle)?;
                let html = field.static_html(value, Some(element))?;
                Some((handle.clone(), html))
            })
            .collect()
    }

    /// Input markup for every field, filled from `element` when given.
    pub fn input_html(
        &self,
        element: Option<&Element>,
        templates: &dyn Templates,
    ) -> Result<Vec<(String, String)>> {
        let mut inputs = Vec::with_capacity(self.fields.len());
        for (handle, field) in &self.fields {
            let value = element
                .and_then(|e| e.field_value(handle))
                .cloned()
                .unwrap_or(Value::Null);
            inputs.push((handle.clone(), field.input_html(&value, element, templates)?));
        }
        Ok(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldRegistry;
    use crate::types::FieldDef;
    use craft_elements::ElementKind;
    use craft_templating::TemplateEngine;

    fn schema() -> ContentSchema {
        let registry = FieldRegistry::with_core_types();
        let mut schema = ContentSchema::new();
        for def in [
            FieldDef::new("Accent Color", "accentColor", "Color"),
            FieldDef::new("Summary", "summary", "PlainText").with_setting("maxLength", 140),
            FieldDef::new("Price", "price", "Number").with_setting("decimals", 2),
            FieldDef::new("Featured", "featured", "Lightswitch"),
        ] {
            schema.add(registry.create(&def).unwrap()).unwrap();
        }
        schema
    }

    #[test]
    fn test_duplicate_handle_rejected() {
        let registry = FieldRegistry::with_core_types();
        let mut schema = schema();
        let dup = registry
            .create(&FieldDef::new("Other", "summary", "Number"))
            .unwrap();
        let err = schema.add(dup).unwrap_err();
        assert!(matches!(err, FieldsError::DuplicateFieldHandle { handle } if handle == "summary"));
        assert_eq!(schema.len(), 4);
    }

    #[test]
    fn test_columns() {
        assert_eq!(
            schema().columns(),
            vec![
                ("field_accentColor".to_string(), ColumnType::String { length: 7 }),
                ("field_summary".to_string(), ColumnType::String { length: 140 }),
                ("field_price".to_string(), ColumnType::Decimal { precision: 12, scale: 2 }),
                ("field_featured".to_string(), ColumnType::Boolean),
            ]
        );
    }

    #[test]
    fn test_static_html_skips_empty_values() {
        let element = Element::new(ElementKind::Entry, 1)
            .with_field("accentColor", "#ff0000")
            .with_field("summary", "");
        let html = schema().static_html(&element);
        assert_eq!(html.len(), 1);
        assert_eq!(html[0].0, "accentColor");
    }

    #[test]
    fn test_input_html_for_new_element_uses_defaults() {
        let engine = TemplateEngine::new().unwrap();
        let inputs = schema().input_html(None, &engine).unwrap();
        let handles: Vec<&str> = inputs.iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(handles, vec!["accentColor", "summary", "price", "featured"]);
        assert!(inputs[0].1.contains(r##"value="#000000""##));
        assert!(inputs[1].1.contains(r#"maxlength="140""#));
        assert!(inputs[2].1.contains(r#"step="0.01""#));
        assert!(!inputs[3].1.contains("lightswitch on"));
    }
}
