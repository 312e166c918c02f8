//! View Engine: the sorted, filtered, paginated slice of rows to render.
//!
//! [`ViewState`] holds what the user asked for (sort, filters, visible columns,
//! duplicates-only, page). Deriving a [`ViewPage`] from a store never mutates
//! the store or the state, and identical inputs always yield the same page.
//!
//! Derivation order:
//!
//! 1. keep rows passing every column filter and the global filter
//!    (and, when requested, only rows in the duplicate set)
//! 2. stable-sort by the active sort, if any
//! 3. clamp the requested page and slice it out
//!
//! # Example
//!
//! ```rust
//! use sheetgrid::store::{Columns, RowStore};
//! use sheetgrid::view::ViewState;
//! use sheetgrid::Value;
//!
//! let store = RowStore::from_rows(
//!     Columns::new(["name"]),
//!     (0..45).map(|i| vec![Value::text(format!("row {i}"))]).collect(),
//! );
//! let mut state = ViewState::new(20);
//! state.set_page(3);
//!
//! let page = state.derive(&store, None);
//! assert_eq!(page.page_count, 3);
//! assert_eq!(page.rows.len(), 5);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::duplicates::DuplicateSet;
use crate::filter::Filters;
use crate::paginator::Paginator;
use crate::sort::{self, SortSpec};
use crate::store::{Columns, Row, RowStore};
use crate::value::Value;

/// User-selected view criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    sort: Option<SortSpec>,
    filters: Filters,
    hidden: BTreeSet<String>,
    duplicates_only: bool,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(crate::paginator::PREVIEW_PAGE_SIZE)
    }
}

impl ViewState {
    /// Creates a state showing every row and column, on page 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: None,
            filters: Filters::new(),
            hidden: BTreeSet::new(),
            duplicates_only: false,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    // ---------------------------------------------------------------------
    // Sorting
    // ---------------------------------------------------------------------

    /// Returns the active sort.
    #[must_use]
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Replaces the active sort and returns to page 1.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.page = 1;
    }

    /// Applies a header activation on `column` (see [`sort::cycle`]).
    pub fn toggle_sort(&mut self, column: &str) {
        let next = sort::cycle(self.sort.as_ref(), column);
        self.set_sort(next);
    }

    // ---------------------------------------------------------------------
    // Filtering
    // ---------------------------------------------------------------------

    /// Returns the active filters.
    #[must_use]
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Sets a column filter (empty removes it) and returns to page 1.
    pub fn set_column_filter(&mut self, column: impl Into<String>, term: impl Into<String>) {
        self.filters.set_column(column, term);
        self.page = 1;
    }

    /// Sets the global filter and returns to page 1.
    pub fn set_global_filter(&mut self, term: impl Into<String>) {
        self.filters.set_global(term);
        self.page = 1;
    }

    /// Removes all filters and returns to page 1.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.page = 1;
    }

    /// Returns whether only duplicate rows are shown.
    #[must_use]
    pub fn duplicates_only(&self) -> bool {
        self.duplicates_only
    }

    /// Restricts the view to duplicate rows and returns to page 1.
    pub fn set_duplicates_only(&mut self, on: bool) {
        self.duplicates_only = on;
        self.page = 1;
    }

    // ---------------------------------------------------------------------
    // Column visibility
    // ---------------------------------------------------------------------

    /// Returns whether a column is visible.
    #[must_use]
    pub fn is_column_visible(&self, column: &str) -> bool {
        !self.hidden.contains(column)
    }

    /// Hides a column.
    pub fn hide_column(&mut self, column: impl Into<String>) {
        self.hidden.insert(column.into());
    }

    /// Shows a column.
    pub fn show_column(&mut self, column: &str) {
        self.hidden.remove(column);
    }

    /// Flips the visibility of a column.
    pub fn toggle_column(&mut self, column: &str) {
        if !self.hidden.remove(column) {
            self.hidden.insert(column.to_string());
        }
    }

    /// Shows exactly the given columns.
    pub fn set_visible_columns<'a>(
        &mut self,
        columns: &Columns,
        visible: impl IntoIterator<Item = &'a str>,
    ) {
        let visible: BTreeSet<&str> = visible.into_iter().collect();
        self.hidden = columns
            .iter()
            .filter(|c| !visible.contains(c))
            .map(str::to_string)
            .collect();
    }

    /// Shows every column.
    pub fn show_all_columns(&mut self) {
        self.hidden.clear();
    }

    /// Returns the visible columns of `columns`, in declaration order.
    #[must_use]
    pub fn visible_columns(&self, columns: &Columns) -> Vec<String> {
        columns
            .iter()
            .filter(|c| self.is_column_visible(c))
            .map(str::to_string)
            .collect()
    }

    /// Returns the store positions of the visible columns.
    #[must_use]
    pub fn visible_positions(&self, columns: &Columns) -> Vec<usize> {
        columns
            .iter()
            .enumerate()
            .filter(|(_, c)| self.is_column_visible(c))
            .map(|(i, _)| i)
            .collect()
    }

    // ---------------------------------------------------------------------
    // Pagination
    // ---------------------------------------------------------------------

    /// Returns the requested page (1-indexed, clamped on derivation).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Requests a page. Values below 1 become 1.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Clamps the requested page against the rows currently matching.
    pub fn clamp_page(&mut self, store: &RowStore, duplicates: Option<&DuplicateSet>) {
        let paginator = self.paginator(self.matching_indices(store, duplicates).len());
        self.page = paginator.page();
    }

    // ---------------------------------------------------------------------
    // Derivation
    // ---------------------------------------------------------------------

    /// Returns the store positions of every matching row, in display order.
    ///
    /// `duplicates` is `None` while duplicate detection is disabled, in which
    /// case the duplicates-only restriction is ignored.
    #[must_use]
    pub fn matching_indices(
        &self,
        store: &RowStore,
        duplicates: Option<&DuplicateSet>,
    ) -> Vec<usize> {
        let matcher = self.filters.matcher(store.columns());
        let only = duplicates.filter(|_| self.duplicates_only);

        let mut indices: Vec<usize> = store
            .rows()
            .iter()
            .enumerate()
            .filter(|(i, row)| only.is_none_or(|d| d.contains(i)) && matcher.matches(row))
            .map(|(i, _)| i)
            .collect();

        if let Some(spec) = &self.sort {
            sort::sort_indices(store, &mut indices, spec);
        }
        indices
    }

    /// Derives the page to render.
    #[must_use]
    pub fn derive<'a>(
        &self,
        store: &'a RowStore,
        duplicates: Option<&DuplicateSet>,
    ) -> ViewPage<'a> {
        let indices = self.matching_indices(store, duplicates);
        let paginator = self.paginator(indices.len());
        let (start, end) = paginator.slice_bounds();

        let rows = indices[start..end]
            .iter()
            .filter_map(|&index| {
                store.row(index).map(|row| ViewRow {
                    index,
                    row,
                    duplicate: duplicates.is_some_and(|d| d.contains(&index)),
                })
            })
            .collect();

        ViewPage {
            columns: self.visible_columns(store.columns()),
            positions: self.visible_positions(store.columns()),
            rows,
            page: paginator.page(),
            page_count: paginator.page_count(),
            page_size: paginator.per_page(),
            total_rows: indices.len(),
        }
    }

    fn paginator(&self, total_items: usize) -> Paginator {
        let mut paginator = Paginator::new(self.page_size);
        paginator.set_total_items(total_items);
        paginator.set_page(self.page);
        paginator
    }
}

/// One rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRow<'a> {
    /// Position in the full, unfiltered store. Use this to address edits.
    pub index: usize,
    /// The row data.
    pub row: &'a Row,
    /// Whether the row is in the duplicate set.
    pub duplicate: bool,
}

/// The slice of rows to render plus pagination facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPage<'a> {
    /// Visible column names in display order.
    pub columns: Vec<String>,
    /// Store positions of the visible columns.
    pub positions: Vec<usize>,
    /// Rows on this page.
    pub rows: Vec<ViewRow<'a>>,
    /// Current page after clamping (1-indexed).
    pub page: usize,
    /// Number of pages, at least 1.
    pub page_count: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Rows matching the filters, across all pages.
    pub total_rows: usize,
}

impl<'a> ViewPage<'a> {
    /// Returns the visible cells of a row in display order.
    pub fn cells(&self, row: ViewRow<'a>) -> impl Iterator<Item = &'a Value> + '_ {
        self.positions.iter().map(move |&p| row.row.get(p))
    }

    /// Returns whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
