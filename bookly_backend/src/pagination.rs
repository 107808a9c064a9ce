//! Page requests and the paginated envelope shared by every profile-scoped
//! query.

use crate::config::{DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page must be at least 1 (got {0})")]
    InvalidPage(i64),
    #[error("page {0} is beyond the last addressable page")]
    PageOutOfRange(i64),
    #[error("page_size must be at least 1 (got {0})")]
    InvalidPageSize(i64),
    #[error("page_size {requested} exceeds the maximum of {max}")]
    PageSizeTooLarge { requested: i64, max: u32 },
}

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64, max_page_size: u32) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::InvalidPage(page));
        }
        if page_size < 1 {
            return Err(PaginationError::InvalidPageSize(page_size));
        }
        if page_size > i64::from(max_page_size) {
            return Err(PaginationError::PageSizeTooLarge {
                requested: page_size,
                max: max_page_size,
            });
        }
        let page = u32::try_from(page).map_err(|_| PaginationError::PageOutOfRange(page))?;
        Ok(Self {
            page,
            page_size: page_size as u32,
        })
    }

    /// Shorthand for callers that do not carry a configured maximum.
    pub fn of(page: i64, page_size: i64) -> Result<Self, PaginationError> {
        Self::new(page, page_size, DEFAULT_MAX_PAGE_SIZE)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Inclusive `[from, to]` row range for this page. `offset` and `limit`
    /// are the same window in SQL terms.
    pub fn range(&self) -> (u64, u64) {
        let from = u64::from(self.page - 1) * u64::from(self.page_size);
        (from, from + u64::from(self.page_size) - 1)
    }

    pub fn offset(&self) -> u64 {
        self.range().0
    }

    pub fn limit(&self) -> u64 {
        let (from, to) = self.range();
        to - from + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
        }
    }
}

/// Slices an already merged and sorted list. `total` is the length of the
/// whole list, a page past the end yields no items.
pub fn paginate_in_memory<T>(list: Vec<T>, request: PageRequest) -> PaginatedResult<T> {
    let total = list.len() as u64;
    let (from, to) = request.range();
    let items = list
        .into_iter()
        .enumerate()
        .skip_while(|(index, _)| (*index as u64) < from)
        .take_while(|(index, _)| (*index as u64) <= to)
        .map(|(_, item)| item)
        .collect();
    PaginatedResult::new(items, total, request)
}
