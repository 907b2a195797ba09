//! Page-number pagination for listing endpoints.
//!
//! Pages are 1-based. A request is only valid when the page lies inside
//! `[1, total_pages]`, so an empty result set has no valid page at all.

use serde::Serialize;

use crate::error::CoreError;

/// A validated `(page, limit)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

/// Pagination block returned alongside listed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Total number of matching rows across all pages.
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
    pub page: i64,
    pub total_pages: i64,
    pub previous_page: Option<i64>,
    pub next_page: Option<i64>,
}

impl PageRequest {
    /// Validate raw query values. Both must be present and positive.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, CoreError> {
        let (Some(page), Some(limit)) = (page, limit) else {
            return Err(CoreError::Validation(
                "Both page and limit query parameters are required".into(),
            ));
        };
        if page <= 0 {
            return Err(CoreError::Validation(format!(
                "page must be a positive integer (got {page})"
            )));
        }
        if limit <= 0 {
            return Err(CoreError::Validation(format!(
                "limit must be a positive integer (got {limit})"
            )));
        }
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        self.limit * (self.page - 1)
    }

    /// Check the page against the row count and build the metadata block.
    pub fn resolve(&self, count: i64) -> Result<PageMetadata, CoreError> {
        let total_pages = total_pages(count, self.limit);
        if self.page > total_pages {
            return Err(CoreError::Validation(format!(
                "page must be between 1 and {total_pages} (got {})",
                self.page
            )));
        }

        Ok(PageMetadata {
            count,
            limit: self.limit,
            offset: self.offset(),
            page: self.page,
            total_pages,
            previous_page: (self.page > 1).then(|| self.page - 1),
            next_page: (self.page < total_pages).then(|| self.page + 1),
        })
    }
}

/// `ceil(count / limit)` for a non-negative `count` and positive `limit`,
/// without overflowing on very large limits.
pub fn total_pages(count: i64, limit: i64) -> i64 {
    if count <= 0 {
        0
    } else {
        (count - 1) / limit + 1
    }
}
