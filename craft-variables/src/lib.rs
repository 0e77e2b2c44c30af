//! The `craft` template variable
//!
//! [`CraftVariable`] is the object templates see as `craft`. It exposes named
//! services (`craft.config`, `craft.sections`, ...), the set of which depends
//! on the licensed [`Edition`](craft_common::Edition) and on loaded plugins,
//! plus shortcuts that start element queries (`craft.entries`).
//!
//! ```
//! use std::sync::Arc;
//! use craft_common::Edition;
//! use craft_elements::MemoryStore;
//! use craft_variables::CraftVariable;
//!
//! let craft = CraftVariable::builder(Arc::new(MemoryStore::new()))
//!     .edition(Edition::Pro)
//!     .build();
//! assert!(craft.has("userGroups"));
//! assert!(craft.entries(None).is_ok());
//! ```

pub mod components;
pub mod craft;
pub mod deprecator;
pub mod error;
pub mod plugin;
pub mod service;
pub mod variable;

pub use components::{component_definitions, component_names, tier_components, CORE_COMPONENTS};
pub use craft::{CraftVariable, CraftVariableBuilder, ServiceSource, LEGACY_CALL_KEY};
pub use deprecator::{DeprecationNotice, Deprecator};
pub use error::{Result, VariableError};
pub use plugin::Plugin;
pub use service::{ServiceContext, ServiceDefinition};
pub use variable::{ConfigVariable, CoreVariable, DeprecatorVariable, ElementsVariable, Variable};
