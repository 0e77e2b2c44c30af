//! Field definitions and content column types.
//!
//! A [`FieldDef`] is the persisted description of one custom field. It
//! serializes to YAML; the type-specific `settings` stay a free-form map until
//! the field type interprets them.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ulid::Ulid;

use crate::error::{FieldsError, Result};

static HANDLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("Failed to compile handle regex"));

/// Element attribute names a field handle may not shadow.
pub const RESERVED_HANDLES: &[&str] = &[
    "id",
    "uid",
    "title",
    "slug",
    "status",
    "dateCreated",
    "dateUpdated",
    "locale",
    "relatedTo",
    "limit",
    "offset",
    "orderBy",
];

/// A field definition: the complete schema for one custom field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDef {
    pub id: Ulid,
    /// Display label
    pub name: String,
    /// Template-facing identifier
    pub handle: String,
    /// Field type identifier, e.g. `Color`
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, handle: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            handle: handle.into(),
            type_: type_.into(),
            instructions: None,
            settings: Map::new(),
        }
    }

    pub fn with_id(mut self, id: Ulid) -> Self {
        self.id = id;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key).filter(|v| !v.is_null())
    }

    /// Content column holding this field's values.
    pub fn column_name(&self) -> String {
        format!("field_{}", self.handle)
    }
}

/// Check a handle's shape and that it does not shadow an element attribute.
pub fn validate_handle(handle: &str) -> Result<()> {
    if !HANDLE_PATTERN.is_match(handle) {
        return Err(FieldsError::configuration(
            handle,
            "handles must start with a letter and contain only letters, digits and underscores",
        ));
    }
    if RESERVED_HANDLES.contains(&handle) {
        return Err(FieldsError::configuration(
            handle,
            format!("'{handle}' is a reserved word"),
        ));
    }
    Ok(())
}

/// Storage type of a field's content column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ColumnType {
    String { length: u32 },
    Text,
    Integer,
    Decimal { precision: u8, scale: u8 },
    Boolean,
}

impl ColumnType {
    /// SQL type name.
    pub fn sql(&self) -> String {
        match self {
            ColumnType::String { length } => format!("VARCHAR({length})"),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            ColumnType::Boolean => "BOOLEAN".to_string(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_def_yaml_round_trip_keeps_settings() {
        let def = FieldDef::new("Accent Color", "accentColor", "Color")
            .with_instructions("Used for headings")
            .with_setting("defaultColor", "#336699");
        let yaml = serde_yaml::to_string(&def).unwrap();
        assert!(yaml.contains("type: Color"));
        assert!(yaml.contains("defaultColor"));
        let back: FieldDef = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_empty_settings_omitted() {
        let def = FieldDef::new("Summary", "summary", "PlainText");
        let yaml = serde_yaml::to_string(&def).unwrap();
        assert!(!yaml.contains("settings"));
        assert!(!yaml.contains("instructions"));
    }

    #[test]
    fn test_null_setting_reads_as_absent() {
        let def = FieldDef::new("Price", "price", "Number").with_setting("min", json!(null));
        assert!(def.setting("min").is_none());
    }

    #[test]
    fn test_validate_handle() {
        assert!(validate_handle("accentColor").is_ok());
        assert!(validate_handle("body_2").is_ok());
        assert!(validate_handle("2fast").is_err());
        assert!(validate_handle("has-dash").is_err());
        assert!(validate_handle("").is_err());
        assert!(matches!(
            validate_handle("title"),
            Err(FieldsError::Configuration { .. })
        ));
    }

    #[test]
    fn test_column_sql() {
        assert_eq!(ColumnType::String { length: 7 }.sql(), "VARCHAR(7)");
        assert_eq!(ColumnType::Decimal { precision: 12, scale: 2 }.to_string(), "DECIMAL(12,2)");
        assert_eq!(ColumnType::Boolean.sql(), "BOOLEAN");
    }
}
