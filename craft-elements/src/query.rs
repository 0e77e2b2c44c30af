//! Lazy, chainable element queries.

use craft_common::Pretty;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::criteria::{Criteria, CriteriaSpec, Direction, OrderBy};
use crate::element::Element;
use crate::error::Result;
use crate::kind::ElementKind;
use crate::pagination::{PaginateInfo, PaginatedElements};
use crate::resolver::CriteriaResolver;
use crate::store::ElementStore;

/// Lifecycle of an [`ElementQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    /// No criteria yet.
    Unconfigured,
    /// Criteria set, nothing fetched since.
    Configured,
    /// Results fetched and memoized for the current criteria.
    Executed,
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryState::Unconfigured => "unconfigured",
            QueryState::Configured => "configured",
            QueryState::Executed => "executed",
        };
        f.write_str(name)
    }
}

/// A query over one element kind.
///
/// Nothing touches the store until results are asked for. The first
/// [`execute`](Self::execute) runs one `find` and keeps the result; later
/// calls return the kept result until the criteria change.
#[derive(Debug, Clone)]
pub struct ElementQuery {
    kind: ElementKind,
    store: Arc<dyn ElementStore>,
    resolver: Arc<CriteriaResolver>,
    criteria: Option<Criteria>,
    cached: Option<Vec<Element>>,
}

impl ElementQuery {
    /// Unconfigured query using the default resolver.
    pub fn new(kind: ElementKind, store: Arc<dyn ElementStore>) -> Self {
        Self::with_resolver(kind, store, Arc::new(CriteriaResolver::default()))
    }

    pub fn with_resolver(
        kind: ElementKind,
        store: Arc<dyn ElementStore>,
        resolver: Arc<CriteriaResolver>,
    ) -> Self {
        Self {
            kind,
            store,
            resolver,
            criteria: None,
            cached: None,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn state(&self) -> QueryState {
        match (&self.criteria, &self.cached) {
            (None, _) => QueryState::Unconfigured,
            (Some(_), None) => QueryState::Configured,
            (Some(_), Some(_)) => QueryState::Executed,
        }
    }

    /// Current criteria, if configured.
    pub fn criteria(&self) -> Option<&Criteria> {
        self.criteria.as_ref()
    }

    /// Resolve `spec` and replace the criteria, dropping any memoized result.
    pub fn configure(&mut self, spec: impl Into<CriteriaSpec>) -> Result<&mut Self> {
        let criteria = self.resolver.resolve(spec, self.kind)?;
        debug!(kind = %self.kind, key = %criteria.cache_key(), "configured element query");
        trace!("resolved criteria: {}", Pretty(&criteria));
        self.replace_criteria(criteria);
        Ok(self)
    }

    /// Owned form of [`configure`](Self::configure).
    pub fn configured(mut self, spec: impl Into<CriteriaSpec>) -> Result<Self> {
        self.configure(spec)?;
        Ok(self)
    }

    /// Add or replace one attribute constraint.
    pub fn filter(&mut self, attribute: &str, operand: impl Into<Value>) -> Result<&mut Self> {
        let constraint = self
            .resolver
            .resolve_constraint(self.kind, attribute, &operand.into())?;
        let criteria = self.current_criteria().with_constraint(constraint);
        self.replace_criteria(criteria);
        Ok(self)
    }

    pub fn limit(&mut self, limit: u32) -> &mut Self {
        let criteria = self.current_criteria().with_limit(Some(limit));
        self.replace_criteria(criteria);
        self
    }

    pub fn offset(&mut self, offset: u32) -> &mut Self {
        let criteria = self.current_criteria().with_offset(Some(offset));
        self.replace_criteria(criteria);
        self
    }

    /// Replace the ordering with a single attribute.
    pub fn order_by(&mut self, attribute: &str, direction: Direction) -> Result<&mut Self> {
        let order = self
            .resolver
            .parse_order_by(self.kind, &Value::from(attribute))?
            .into_iter()
            .map(|o| OrderBy::new(o.attribute, direction))
            .collect();
        let criteria = self.current_criteria().with_order_by(order);
        self.replace_criteria(criteria);
        Ok(self)
    }

    /// Run the query, or return the memoized result.
    pub fn execute(&mut self) -> Result<&[Element]> {
        if self.cached.is_none() {
            let criteria = self.criteria.get_or_insert_with(Criteria::new);
            let elements = self.store.find(self.kind, criteria)?;
            debug!(kind = %self.kind, found = elements.len(), "executed element query");
            self.cached = Some(elements);
        } else {
            trace!(kind = %self.kind, "element query served from memo");
        }
        Ok(self.cached.as_deref().unwrap_or_default())
    }

    /// Alias of [`execute`](Self::execute).
    pub fn all(&mut self) -> Result<&[Element]> {
        self.execute()
    }

    /// First matching element. Uses the memo when present, otherwise fetches
    /// a single row without memoizing it.
    pub fn one(&mut self) -> Result<Option<Element>> {
        if let Some(cached) = &self.cached {
            return Ok(cached.first().cloned());
        }
        let criteria = self.current_criteria().with_limit(Some(1));
        Ok(self.store.find(self.kind, &criteria)?.into_iter().next())
    }

    /// Ids of the matching elements.
    pub fn ids(&mut self) -> Result<Vec<u64>> {
        Ok(self.execute()?.iter().map(|element| element.id).collect())
    }

    /// Total number of matches, ignoring limit and offset.
    pub fn count(&mut self) -> Result<u64> {
        let criteria = self.current_criteria().without_window();
        self.store.count(self.kind, &criteria)
    }

    /// Fetch page `page` (1-based), using the criteria's limit as page size.
    ///
    /// Issues one unbounded count and, when the result is non-empty, one find
    /// for the page window. The query's own memo is left alone.
    pub fn paginate(&mut self, page: u32) -> Result<PaginatedElements> {
        let criteria = self.current_criteria();
        let page_size = criteria.require_page_size()?;
        let count = self.store.count(self.kind, &criteria.without_window())?;
        let base_offset = criteria.offset().unwrap_or(0);

        let (info, window) = PaginateInfo::compute(count, base_offset, page_size, page);
        let elements = match window {
            Some(window) => {
                let windowed = criteria
                    .with_offset(Some(window.offset))
                    .with_limit(Some(window.limit));
                self.store.find(self.kind, &windowed)?
            }
            None => Vec::new(),
        };
        debug!(
            kind = %self.kind,
            page = info.current_page,
            total_pages = info.total_pages,
            "paginated element query"
        );
        Ok(PaginatedElements {
            info,
            window,
            elements,
        })
    }

    /// Criteria in effect, configuring with empty criteria when unset.
    fn current_criteria(&mut self) -> Criteria {
        self.criteria.get_or_insert_with(Criteria::new).clone()
    }

    fn replace_criteria(&mut self, criteria: Criteria) {
        self.criteria = Some(criteria);
        self.cached = None;
    }
}
