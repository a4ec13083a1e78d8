use serde::{Deserialize, Serialize};

use super::post::Post;
use crate::error::DomainError;

/// A 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Validate a page request. Pages start at 1 and hold at least one row.
    pub fn new(page: u32, per_page: u32) -> Result<Self, DomainError> {
        if page == 0 {
            return Err(DomainError::Validation(
                "Page numbers start at 1".to_string(),
            ));
        }
        if per_page == 0 {
            return Err(DomainError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { page, per_page })
    }

    /// Zero-based inclusive row range covered by this page.
    pub fn range(&self) -> RowRange {
        let per_page = u64::from(self.per_page);
        let start = (u64::from(self.page) - 1) * per_page;
        RowRange {
            start,
            end: start + per_page - 1,
        }
    }
}

/// Zero-based, inclusive row range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: u64,
    pub end: u64,
}

impl RowRange {
    /// Number of rows covered.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// One page of posts as returned by a ranged select.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Exact row count across the whole table, when the backend reported one.
    pub total: Option<u64>,
}

/// Number of pages needed to show `total` rows, `ceil(total / per_page)`.
pub fn total_pages(total: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(u64::from(per_page))
}
