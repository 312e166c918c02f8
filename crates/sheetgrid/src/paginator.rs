//! Pagination state for table views.
//!
//! Pages are numbered from 1. The page count is always at least one, even for
//! an empty result, and every requested page is clamped into range, so asking
//! for page 4 of a three-page result yields page 3.
//!
//! # Example
//!
//! ```rust
//! use sheetgrid::paginator::Paginator;
//!
//! let mut paginator = Paginator::new(20);
//! paginator.set_total_items(45);
//! assert_eq!(paginator.page_count(), 3);
//!
//! paginator.set_page(3);
//! assert_eq!(paginator.slice_bounds(), (40, 45));
//!
//! paginator.set_page(4); // clamped
//! assert_eq!(paginator.page(), 3);
//! ```

/// Default page size of the full-table preview surface.
pub const PREVIEW_PAGE_SIZE: usize = 20;

/// Default page size of the tabular editor surface.
pub const EDITOR_PAGE_SIZE: usize = 50;

/// Pagination model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    /// Current page (1-indexed).
    page: usize,
    /// Items per page.
    per_page: usize,
    /// Number of items being paginated.
    total_items: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PREVIEW_PAGE_SIZE)
    }
}

impl Paginator {
    /// Creates a paginator on page 1. A zero page size is treated as 1.
    #[must_use]
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            total_items: 0,
        }
    }

    /// Returns the current page (1-indexed).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the items per page.
    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Returns the number of items being paginated.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Returns the page count: `max(1, ceil(total_items / per_page))`.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    /// Sets the current page, clamped to `1..=page_count`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    /// Changes the page size and re-clamps the current page.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.set_page(self.page);
    }

    /// Updates the item count and re-clamps the current page.
    pub fn set_total_items(&mut self, items: usize) {
        self.total_items = items;
        self.set_page(self.page);
    }

    /// Returns `(start, end)` bounds of the current page.
    #[must_use]
    pub fn slice_bounds(&self) -> (usize, usize) {
        let start = ((self.page - 1) * self.per_page).min(self.total_items);
        let end = (start + self.per_page).min(self.total_items);
        (start, end)
    }

    /// Returns the number of items on the current page.
    #[must_use]
    pub fn items_on_page(&self) -> usize {
        let (start, end) = self.slice_bounds();
        end - start
    }

    /// Navigates to the previous page.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Navigates to the next page.
    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.page += 1;
        }
    }

    /// Returns whether we're on the last page.
    #[must_use]
    pub fn on_last_page(&self) -> bool {
        self.page >= self.page_count()
    }

    /// Returns whether we're on the first page.
    #[must_use]
    pub fn on_first_page(&self) -> bool {
        self.page == 1
    }

    /// Renders the position as `"page/count"`.
    #[must_use]
    pub fn view(&self) -> String {
        format!("{}/{}", self.page, self.page_count())
    }
}
