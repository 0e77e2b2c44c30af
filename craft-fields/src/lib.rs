//! Typed custom fields
//!
//! `craft-fields` defines the [`Field`] abstraction and the built-in field
//! types (Color, Plain Text, Number, Lightswitch), a [`FieldRegistry`] that
//! maps type identifiers to factories, a [`ContentSchema`] of instantiated
//! fields, and a YAML-backed [`FieldStore`] for the definitions.
//!
//! # Architecture
//!
//! - **Definitions on disk**: one `.yaml` file per field, named by handle
//! - **Validate early**: bad settings fail when a field is instantiated, never at render time
//! - **Rendering through a trait**: inputs render via [`craft_templating::Templates`]

pub mod error;
pub mod field;
pub mod fieldtypes;
pub mod registry;
pub mod schema;
pub mod store;
pub mod types;

pub use error::{FieldsError, Result};
pub use field::{is_empty_value, Field, FieldFactory, Settings};
pub use fieldtypes::{
    ColorField, ColorFieldType, LightswitchField, LightswitchFieldType, NumberField,
    NumberFieldType, PlainTextField, PlainTextFieldType, DEFAULT_COLOR,
};
pub use registry::FieldRegistry;
pub use schema::ContentSchema;
pub use store::{FieldDefaults, FieldStore, FieldStoreBuilder};
pub use types::{validate_handle, ColumnType, FieldDef, RESERVED_HANDLES};
