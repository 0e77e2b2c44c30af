//! Element records returned by queries.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::kind::ElementKind;

/// A typed content record.
///
/// Native attributes (title, slug, section...) live in `attributes`; custom
/// field values live in `content`, keyed by field handle. Both are flattened
/// when serialized, so templates read `entry.title` and `entry.accentColor`
/// alike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub id: u64,
    pub kind: ElementKind,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

impl Element {
    pub fn new(kind: ElementKind, id: u64) -> Self {
        Self {
            id,
            kind,
            attributes: Map::new(),
            content: Map::new(),
        }
    }

    /// Set a native attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set a custom field value.
    pub fn with_field(mut self, handle: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(handle.into(), value.into());
        self
    }

    /// Value of an attribute or custom field; `id` is always available.
    pub fn get(&self, name: &str) -> Option<Value> {
        if name == "id" {
            return Some(Value::from(self.id));
        }
        self.attributes
            .get(name)
            .or_else(|| self.content.get(name))
            .cloned()
    }

    /// Custom field value by handle.
    pub fn field_value(&self, handle: &str) -> Option<&Value> {
        self.content.get(handle)
    }

    pub fn title(&self) -> Option<&str> {
        self.attributes.get("title").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_prefers_attributes_then_content() {
        let entry = Element::new(ElementKind::Entry, 7)
            .with_attribute("title", "Hello")
            .with_field("accentColor", "#ff0000");

        assert_eq!(entry.get("id"), Some(json!(7)));
        assert_eq!(entry.get("title"), Some(json!("Hello")));
        assert_eq!(entry.get("accentColor"), Some(json!("#ff0000")));
        assert_eq!(entry.get("missing"), None);
        assert_eq!(entry.title(), Some("Hello"));
    }

    #[test]
    fn serializes_flat() {
        let entry = Element::new(ElementKind::Entry, 1)
            .with_attribute("title", "Hi")
            .with_field("body", "text");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "kind": "entry", "title": "Hi", "body": "text"})
        );
    }
}
