//! Paging state of a list screen

use freight_lib::api::Filters;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [5, 10, 25];

/// Zero-based page over a server-side total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pagination {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Index of the first row of the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    /// Number of pages, at least one.
    pub fn page_count(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = self.total.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Moves to `page`, clamped to the known pages.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Changes the page size and goes back to the first page.
    pub fn set_page_size(&mut self, size: u32) {
        self.page_size = size.max(1);
        self.page = 0;
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// Records the server total. The page is pulled back if it fell off
    /// the end.
    pub fn set_total(&mut self, total: u64) {
        self.total = total;
        if self.page >= self.page_count() {
            self.page = self.page_count() - 1;
        }
    }

    /// Adds the server's one-based `page` and `page_size` parameters.
    pub fn apply(&self, filters: &Filters) -> Filters {
        filters
            .clone()
            .page(self.page + 1)
            .page_size(self.page_size)
    }
}
