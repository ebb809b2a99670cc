use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Zero-based page position over a result of `len` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// A page size of 0 is accepted and yields empty pages.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages, never less than one.
    pub fn page_count(&self, len: usize) -> usize {
        if self.page_size == 0 {
            return 1;
        }
        len.div_ceil(self.page_size).max(1)
    }

    pub fn last_page(&self, len: usize) -> usize {
        self.page_count(len) - 1
    }

    /// Moves to `page`, clamped into `[0, last_page]`.
    pub fn request(&mut self, page: i64, len: usize) {
        let last = self.last_page(len) as i64;
        self.page_index = page.clamp(0, last) as usize;
    }

    pub fn reset(&mut self) {
        self.page_index = 0;
    }

    /// Pulls the index back into range after `len` changed.
    pub fn clamp(&mut self, len: usize) {
        self.page_index = self.page_index.min(self.last_page(len));
    }

    pub fn set_page_size(&mut self, page_size: usize, len: usize) {
        self.page_size = page_size;
        self.clamp(len);
    }

    /// Positions of the visible rows within the ordered result.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    pub fn can_prev(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, len: usize) -> bool {
        self.page_index < self.last_page(len)
    }

    /// "Showing X–Y of Z", one-based and inclusive.
    pub fn summary(&self, len: usize) -> String {
        let range = self.range(len);
        if range.is_empty() {
            format!("Showing 0–0 of {len}")
        } else {
            format!("Showing {}–{} of {}", range.start + 1, range.end, len)
        }
    }
}
