//! Page-number pagination.
//!
//! Pages are 1-based. A request for a page past the end is not an error: it
//! yields an empty [`Page`] whose `current_page` echoes the request, and the
//! caller decides what to show.

use serde::Serialize;

use crate::error::CoreError;

/// Page shown when the client does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;

/// Fallback page size when configuration does not override it.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Fallback upper bound on `page_size`.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated `(page, page_size)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    /// Validate raw query values.
    ///
    /// `page` must be at least 1 and `page_size` must lie in
    /// `1..=max_page_size`. Out-of-range values are rejected rather than
    /// clamped so that `total_pages` always reflects the size the client
    /// asked for.
    pub fn new(page: i64, page_size: i64, max_page_size: i64) -> Result<Self, CoreError> {
        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if page_size < 1 {
            return Err(CoreError::Validation(format!(
                "page_size must be at least 1, got {page_size}"
            )));
        }
        if page_size > max_page_size {
            return Err(CoreError::Validation(format!(
                "page_size must be at most {max_page_size}, got {page_size}"
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Number of rows to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Number of rows to take.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `ceil(total_items / page_size)`, or 0 for a non-positive page size.
pub fn total_pages(total_items: i64, page_size: i64) -> i64 {
    if page_size <= 0 || total_items <= 0 {
        return 0;
    }
    total_items / page_size + i64::from(total_items % page_size != 0)
}

/// One window of an ordered result set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
    pub total_items: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: i64, request: PageRequest) -> Self {
        Self {
            items,
            total_pages: total_pages(total_items, request.page_size()),
            current_page: request.page(),
            page_size: request.page_size(),
            total_items,
        }
    }

    /// True when the requested page lies past the last populated page.
    pub fn is_past_end(&self) -> bool {
        self.current_page > self.total_pages
    }
}
