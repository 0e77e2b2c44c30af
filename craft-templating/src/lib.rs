//! Template rendering for Craft
//!
//! Wraps liquid with a template loader that knows the built-in form includes
//! (`_includes/forms/color` and friends), a [`RenderContext`] of bound
//! variables, and a scoped [`paginate`] block for element queries.

pub mod context;
pub mod engine;
pub mod error;
pub mod loader;
pub mod paginate;

pub use context::{to_liquid, RenderContext};
pub use engine::{format_input_id, TemplateEngine, Templates};
pub use error::{Result, TemplatingError};
pub use loader::{builtin_templates, TemplateLoader, FORM_INCLUDES};
pub use paginate::{paginate, PaginateBlock, PAGINATE_VARIABLE};

// Re-exported so callers can build template parameters without naming liquid.
pub use liquid::{object, Object};
