//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page-number pagination parameters (`?page=&page_size=`).
///
/// Missing values fall back to page 1 and the configured default page size.
/// Range checks happen in [`catalog_core::pagination::PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
