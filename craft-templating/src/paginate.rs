//! Scoped pagination for templates.
//!
//! A paginate block fetches one page of an [`ElementQuery`], binds the page
//! info as `paginate` and the elements under a caller-chosen name, runs the
//! body, then puts the context back the way it was. The bindings are released
//! by a scope guard, so an error or a panic in the body cannot leak them.

use craft_elements::{ElementQuery, PaginateInfo, DEFAULT_PAGE_TRIGGER};
use liquid::model::Value;
use serde_json::json;
use tracing::debug;

use crate::context::{to_liquid, RenderContext};
use crate::error::{Result, TemplatingError};

/// Name the page info is bound under.
pub const PAGINATE_VARIABLE: &str = "paginate";

/// Settings for one paginate block.
#[derive(Debug, Clone)]
pub struct PaginateBlock {
    page: u32,
    target: String,
    base_path: String,
    page_trigger: String,
}

impl PaginateBlock {
    /// Block binding the page's elements as `target`, on page 1.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            page: 1,
            target: target.into(),
            base_path: String::new(),
            page_trigger: DEFAULT_PAGE_TRIGGER.to_string(),
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Path page URLs are built from (`/news` → `/news/p2`).
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn page_trigger(mut self, page_trigger: impl Into<String>) -> Self {
        self.page_trigger = page_trigger.into();
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Fetch the page, bind it, and run `body` with the bindings in place.
    pub fn run<T, F>(&self, ctx: &mut RenderContext, query: &mut ElementQuery, body: F) -> Result<T>
    where
        F: FnOnce(&mut RenderContext) -> Result<T>,
    {
        let page = query.paginate(self.page)?;
        let info = page.info.with_urls(&self.base_path, &self.page_trigger);
        let info_value = info_value(&info)?;
        let elements_value = to_liquid(&page.elements)?;

        debug!(
            target_var = %self.target,
            page = info.current_page,
            total_pages = info.total_pages,
            "entering paginate block"
        );

        let previous_info = ctx.insert(PAGINATE_VARIABLE, info_value);
        let previous_target = ctx.insert(&self.target, elements_value);
        let target = self.target.as_str();
        let mut guard = scopeguard::guard(ctx, move |ctx| {
            ctx.restore(target, previous_target);
            ctx.restore(PAGINATE_VARIABLE, previous_info);
        });
        body(&mut **guard)
    }
}

/// Run `body` inside a paginate block for `page`, binding elements as `target`.
pub fn paginate<T, F>(
    ctx: &mut RenderContext,
    query: &mut ElementQuery,
    page: u32,
    target: &str,
    body: F,
) -> Result<T>
where
    F: FnOnce(&mut RenderContext) -> Result<T>,
{
    PaginateBlock::new(target).page(page).run(ctx, query, body)
}

/// Page info plus the URLs templates cannot compute themselves.
fn info_value(info: &PaginateInfo) -> Result<Value> {
    let mut value =
        serde_json::to_value(info).map_err(|e| TemplatingError::Render(e.to_string()))?;
    if let Some(map) = value.as_object_mut() {
        map.insert("firstUrl".into(), json!(info.first_url()));
        map.insert("lastUrl".into(), json!(info.last_url()));
        map.insert("prevUrl".into(), json!(info.prev_url()));
        map.insert("nextUrl".into(), json!(info.next_url()));
    }
    to_liquid(&value)
}
