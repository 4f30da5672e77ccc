//! Client-side pagination for list pages.

#[cfg(test)]
#[path = "paging_test.rs"]
mod paging_test;

/// Rows per page on the list pages.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// One page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// 1-based page number actually shown (after clamping).
    pub page: usize,
    /// `ceil(total_items / page_size)`; zero for an empty list.
    pub total_pages: usize,
    pub total_items: usize,
    pub items: &'a [T],
}

impl<T> Page<'_, T> {
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice out page `page` (1-based) of `items`.
///
/// Out-of-range pages clamp to the first or last page; a zero page size is
/// treated as one row per page.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let total_pages = items.len().div_ceil(size);
    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * size).min(items.len());
    let end = (start + size).min(items.len());
    Page { page, total_pages, total_items: items.len(), items: &items[start..end] }
}
