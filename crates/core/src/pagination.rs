//! Page-number pagination used by the directory listing.

use serde::Serialize;

/// Default page size when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound for a caller-supplied page size.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Clamp a requested page number to `>= 1`.
pub fn clamp_page_number(page_number: Option<i64>) -> i64 {
    page_number.unwrap_or(1).max(1)
}

/// Clamp a requested page size to `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Number of rows to skip for a (clamped) page request.
pub fn page_offset(page_number: i64, page_size: i64) -> i64 {
    (page_number - 1).saturating_mul(page_size)
}

/// `ceil(total_count / page_size)`; zero when there are no items.
pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 || page_size <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}

/// One page of results plus the metadata needed to render a pager.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, current_page: i64, page_size: i64, total_count: i64) -> Self {
        Self {
            items,
            current_page,
            page_size,
            total_count,
            total_pages: total_pages(total_count, page_size),
        }
    }

    /// Pagination metadata, without the items.
    pub fn header(&self) -> PaginationHeader {
        PaginationHeader {
            current_page: self.current_page,
            items_per_page: self.page_size,
            total_items: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

/// Serialized into the `Pagination` response header so the body stays a
/// plain list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationHeader {
    pub current_page: i64,
    pub items_per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}
