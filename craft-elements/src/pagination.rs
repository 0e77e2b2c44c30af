//! Page arithmetic for paginated element queries.

use serde::Serialize;

use crate::element::Element;

/// Default URL segment prefix for page numbers (`/news/p2`).
pub const DEFAULT_PAGE_TRIGGER: &str = "p";

/// The limit/offset window for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub offset: u32,
    pub limit: u32,
}

/// Derived description of one page of results.
///
/// `first` and `last` are 1-based positions of the page's elements within the
/// whole result set; both are 0 when there is nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginateInfo {
    pub first: u64,
    pub last: u64,
    pub total: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub has_prev: bool,
    pub has_next: bool,
    pub base_path: String,
    pub page_trigger: String,
}

impl PaginateInfo {
    /// Compute page info and the window to fetch.
    ///
    /// `count` is the unbounded match count, `base_offset` the criteria's own
    /// offset. The requested page is clamped into `1..=total_pages`. When there
    /// are no pages the window is `None` and nothing needs fetching.
    pub fn compute(
        count: u64,
        base_offset: u32,
        page_size: u32,
        requested_page: u32,
    ) -> (Self, Option<PageWindow>) {
        let size = u64::from(page_size.max(1));
        let total = count.saturating_sub(u64::from(base_offset));
        let total_pages = u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX);

        if total_pages == 0 {
            return (Self::empty(total), None);
        }

        let current_page = requested_page.clamp(1, total_pages);
        let skipped = size * u64::from(current_page - 1);
        let first = skipped + 1;
        let last = (skipped + size).min(total);
        let offset = u32::try_from(u64::from(base_offset) + skipped).unwrap_or(u32::MAX);

        let prev_page = (current_page > 1).then(|| current_page - 1);
        let next_page = (current_page < total_pages).then(|| current_page + 1);
        let info = Self {
            first,
            last,
            total,
            current_page,
            total_pages,
            prev_page,
            next_page,
            has_prev: prev_page.is_some(),
            has_next: next_page.is_some(),
            base_path: String::new(),
            page_trigger: DEFAULT_PAGE_TRIGGER.to_string(),
        };
        let window = PageWindow {
            offset,
            limit: page_size,
        };
        (info, Some(window))
    }

    fn empty(total: u64) -> Self {
        Self {
            first: 0,
            last: 0,
            total,
            current_page: 1,
            total_pages: 0,
            prev_page: None,
            next_page: None,
            has_prev: false,
            has_next: false,
            base_path: String::new(),
            page_trigger: DEFAULT_PAGE_TRIGGER.to_string(),
        }
    }

    /// Attach the base path and page trigger used for URL generation.
    pub fn with_urls(mut self, base_path: impl Into<String>, page_trigger: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_string();
        self.page_trigger = page_trigger.into();
        self
    }

    /// URL for `page`, or `None` outside `1..=total_pages`.
    pub fn page_url(&self, page: u32) -> Option<String> {
        if page == 0 || page > self.total_pages {
            return None;
        }
        if page == 1 {
            let base = if self.base_path.is_empty() { "/" } else { &self.base_path };
            return Some(base.to_string());
        }
        Some(format!("{}/{}{}", self.base_path, self.page_trigger, page))
    }

    pub fn prev_url(&self) -> Option<String> {
        self.prev_page.and_then(|page| self.page_url(page))
    }

    pub fn next_url(&self) -> Option<String> {
        self.next_page.and_then(|page| self.page_url(page))
    }

    pub fn first_url(&self) -> Option<String> {
        self.page_url(1)
    }

    pub fn last_url(&self) -> Option<String> {
        self.page_url(self.total_pages)
    }

    /// Page numbers in `start..=end`, clamped to existing pages.
    pub fn range_pages(&self, start: u32, end: u32) -> Vec<u32> {
        let start = start.max(1);
        let end = end.min(self.total_pages);
        (start..=end).collect()
    }
}

/// One page of elements with its info.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedElements {
    pub info: PaginateInfo,
    pub window: Option<PageWindow>,
    pub elements: Vec<Element>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page() {
        let (info, window) = PaginateInfo::compute(25, 0, 10, 2);
        assert_eq!(window, Some(PageWindow { offset: 10, limit: 10 }));
        assert_eq!(info.total_pages, 3);
        assert_eq!((info.first, info.last), (11, 20));
        assert_eq!(info.prev_page, Some(1));
        assert_eq!(info.next_page, Some(3));
        assert!(info.has_prev && info.has_next);
    }

    #[test]
    fn last_page_is_short() {
        let (info, window) = PaginateInfo::compute(25, 0, 10, 3);
        assert_eq!(window, Some(PageWindow { offset: 20, limit: 10 }));
        assert_eq!((info.first, info.last), (21, 25));
        assert_eq!(info.next_page, None);
        assert!(!info.has_next);
    }

    #[test]
    fn requested_page_is_clamped() {
        let (info, _) = PaginateInfo::compute(25, 0, 10, 9);
        assert_eq!(info.current_page, 3);
        let (info, window) = PaginateInfo::compute(25, 0, 10, 0);
        assert_eq!(info.current_page, 1);
        assert_eq!(window.map(|w| w.offset), Some(0));
    }

    #[test]
    fn base_offset_shrinks_total_and_shifts_window() {
        let (info, window) = PaginateInfo::compute(25, 5, 10, 2);
        assert_eq!(info.total, 20);
        assert_eq!(info.total_pages, 2);
        assert_eq!(window, Some(PageWindow { offset: 15, limit: 10 }));
        assert_eq!((info.first, info.last), (11, 20));
    }

    #[test]
    fn empty_result_has_no_window() {
        let (info, window) = PaginateInfo::compute(0, 0, 10, 4);
        assert_eq!(window, None);
        assert_eq!(info.current_page, 1);
        assert_eq!(info.total_pages, 0);
        assert_eq!((info.first, info.last), (0, 0));
        assert!(!info.has_prev && !info.has_next);
    }

    #[test]
    fn urls_use_trigger_after_first_page() {
        let (info, _) = PaginateInfo::compute(25, 0, 10, 2);
        let info = info.with_urls("/news/", "page");
        assert_eq!(info.prev_url().as_deref(), Some("/news"));
        assert_eq!(info.next_url().as_deref(), Some("/news/page3"));
        assert_eq!(info.page_url(4), None);
        assert_eq!(info.range_pages(0, 10), vec![1, 2, 3]);
    }

    #[test]
    fn serializes_camel_case() {
        let (info, _) = PaginateInfo::compute(5, 0, 10, 1);
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["hasNext"], false);
    }
}
