//! Elements and element queries.
//!
//! An element is a typed content record (asset, category, entry, tag, user).
//! Callers describe what they want with loosely-typed criteria, which the
//! [`CriteriaResolver`] validates against the element kind and turns into an
//! immutable [`Criteria`]. An [`ElementQuery`] holds those criteria and runs
//! them lazily against an [`ElementStore`], memoizing the result.
//!
//! ```
//! use std::sync::Arc;
//! use craft_elements::{Element, ElementKind, ElementQuery, MemoryStore};
//! use serde_json::json;
//!
//! let store = Arc::new(MemoryStore::with_elements([
//!     Element::new(ElementKind::Entry, 1).with_attribute("section", "news"),
//!     Element::new(ElementKind::Entry, 2).with_attribute("section", "blog"),
//! ]));
//! let mut query = ElementQuery::new(ElementKind::Entry, store);
//! query.configure(craft_elements::CriteriaSpec::from_json(json!({"section": "news"}))?)?;
//! assert_eq!(query.ids()?, vec![1]);
//! # Ok::<(), craft_elements::ElementsError>(())
//! ```

pub mod criteria;
pub mod element;
pub mod error;
pub mod kind;
pub mod pagination;
pub mod query;
pub mod resolver;
pub mod sql;
pub mod store;

pub use criteria::{Comparison, Constraint, Criteria, CriteriaSpec, Direction, OrderBy};
pub use element::Element;
pub use error::{ElementsError, Result};
pub use kind::{ElementKind, COMMON_ATTRIBUTES, RESERVED_CRITERIA_KEYS};
pub use pagination::{PageWindow, PaginateInfo, PaginatedElements, DEFAULT_PAGE_TRIGGER};
pub use query::{ElementQuery, QueryState};
pub use resolver::{resolve, CriteriaResolver};
pub use sql::{column_for, quote_ident, SqlQuery};
pub use store::{ElementStore, MemoryStore};
