//! Pagination
//!
//! Page requests for the pipeline and page navigation summaries for display.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::error::{Error, Result};

/// A 1-based page request with a validated, non-zero page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: NonZeroUsize,
}

impl PageRequest {
    /// Page 0 is clamped to 1; a zero page size is rejected.
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        let page_size = NonZeroUsize::new(page_size).ok_or_else(|| Error::Invalid {
            message: "page size must be greater than zero".to_string(),
        })?;
        Ok(Self {
            page: page.max(1),
            page_size,
        })
    }

    pub fn first(page_size: NonZeroUsize) -> Self {
        Self { page: 1, page_size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn with_page(self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    /// Index range of this page within `total` rows; empty past the last page
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size.get());
        if start >= total {
            return total..total;
        }
        let end = start.saturating_add(self.page_size.get()).min(total);
        start..end
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Number of pages needed for `total` rows
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Page navigation summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    total_pages: usize,
    total_items: usize,
}

impl Pagination {
    /// Create a new pagination summary
    pub fn new(current_page: usize, total_pages: usize, total_items: usize) -> Self {
        Self {
            current_page,
            total_pages,
            total_items,
        }
    }

    pub fn can_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Navigation is only worth showing with more than one page
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    /// Render as `Page p of n (t total items)`
    pub fn render(&self) -> String {
        format!(
            "Page {} of {} ({} total items)",
            self.current_page, self.total_pages, self.total_items
        )
    }
}
