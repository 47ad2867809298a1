//! In-memory pagination over an already fetched list.

/// 1-based page cursor over a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    per_page: usize,
    current: usize,
}

impl Pager {
    /// A pager on page 1. A zero page size is treated as 1.
    #[must_use]
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            current: 1,
        }
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.per_page)
    }

    /// Move to `page`, clamped to at least 1.
    pub fn set_page(&mut self, page: usize) {
        self.current = page.max(1);
    }

    pub fn first(&mut self) {
        self.current = 1;
    }

    pub fn last(&mut self, total_items: usize) {
        self.current = self.total_pages(total_items).max(1);
    }

    /// Fall back to page 1 when the list shrank below the current page.
    pub fn clamp(&mut self, total_items: usize) {
        let total = self.total_pages(total_items);
        if total > 0 && self.current > total {
            self.current = 1;
        }
    }

    #[must_use]
    pub fn has_next(&self, total_items: usize) -> bool {
        self.current < self.total_pages(total_items)
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    /// Items of the current page; empty when past the end.
    #[must_use]
    pub fn page_items<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.current - 1).saturating_mul(self.per_page);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.per_page).min(items.len());
        &items[start..end]
    }
}
