//! Sheet component: an editable, sortable, filterable table surface.
//!
//! [`Sheet`] owns the processed data and composes the view state, the cell
//! editor, duplicate detection and the undo history. It follows the component
//! pattern: feed it [`SheetMsg`]s through [`Sheet::update`], render
//! [`Sheet::view`], and react to the [`SheetEvent`]s it emits for the embedding
//! application (save and close).
//!
//! # History
//!
//! Bulk replacements always create a history snapshot. Single-cell commits do
//! so only when [`SheetConfig::record_cell_edits`] is set (the editor surface);
//! on the preview surface an undo returns to the previous bulk state.
//!
//! # Example
//!
//! ```rust
//! use sheetgrid::{ProcessedResult, Sheet, SheetConfig, SheetMsg, Value};
//!
//! let data = ProcessedResult::from_json(
//!     r#"{"columns": ["name", "Status"], "rows": [{"name": "A", "Status": "Open"}]}"#,
//! ).unwrap();
//! let mut sheet = Sheet::with_data(SheetConfig::editor(), data);
//!
//! sheet.update(SheetMsg::BeginEdit { row: 0, column: "Status".into() });
//! sheet.update(SheetMsg::UpdateDraft("Closed".into()));
//! sheet.update(SheetMsg::CommitEdit);
//! assert_eq!(sheet.store().get(0, "Status"), Some(&Value::text("Closed")));
//!
//! sheet.update(SheetMsg::Undo);
//! assert_eq!(sheet.store().get(0, "Status"), Some(&Value::text("Open")));
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::config::SheetConfig;
use crate::duplicates::{self, DuplicateSet};
use crate::editor::{CellEditor, CommittedEdit};
use crate::export::{self, ExportError};
use crate::history::History;
use crate::ingest::{Metadata, ProcessedResult};
use crate::sort::SortSpec;
use crate::store::{Record, RowStore};
use crate::view::{ViewPage, ViewState};

/// Input messages for [`Sheet::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum SheetMsg {
    /// Header activation: cycles the sort of a column.
    ToggleSort(String),
    /// Replaces the sort outright.
    SetSort(Option<SortSpec>),
    /// Sets (or, with an empty term, removes) a column filter.
    SetColumnFilter {
        /// Column to filter.
        column: String,
        /// Substring to match.
        term: String,
    },
    /// Removes the filter of one column.
    ClearColumnFilter(String),
    /// Sets the global filter.
    SetGlobalFilter(String),
    /// Removes every filter.
    ClearFilters,
    /// Flips the visibility of a column.
    ToggleColumn(String),
    /// Shows a column.
    ShowColumn(String),
    /// Hides a column.
    HideColumn(String),
    /// Shows every column.
    ShowAllColumns,
    /// Shows exactly the named columns; unknown names are ignored.
    SetVisibleColumns(Vec<String>),
    /// Requests a page (1-indexed, clamped).
    SetPage(usize),
    /// Goes to the next page.
    NextPage,
    /// Goes to the previous page.
    PrevPage,
    /// Enables or disables duplicate detection.
    SetDuplicateDetection(bool),
    /// Restricts the view to duplicate rows.
    SetDuplicatesOnly(bool),
    /// Starts editing a cell (row is a store position).
    BeginEdit {
        /// Store position of the row.
        row: usize,
        /// Column name.
        column: String,
    },
    /// Replaces the draft of the active edit.
    UpdateDraft(String),
    /// Commits the active edit.
    CommitEdit,
    /// Discards the active edit.
    CancelEdit,
    /// Steps back one history snapshot.
    Undo,
    /// Replaces all data with a new processed result.
    ReplaceData(ProcessedResult),
    /// Asks the embedding application to persist the rows.
    Save,
    /// Asks the embedding application to dismiss the sheet.
    Close,
}

/// Output events for the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetEvent {
    /// The user saved; carries the edited rows.
    Save(Vec<Record>),
    /// The user dismissed the sheet.
    Close,
}

/// Editable table surface.
#[derive(Debug, Clone)]
pub struct Sheet {
    config: SheetConfig,
    data: ProcessedResult,
    view: ViewState,
    editor: CellEditor,
    history: History<ProcessedResult>,
    detect_duplicates: bool,
    duplicates: DuplicateSet,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new(SheetConfig::default())
    }
}

impl Sheet {
    /// Creates an empty sheet.
    #[must_use]
    pub fn new(config: SheetConfig) -> Self {
        Self {
            view: ViewState::new(config.page_size),
            history: History::new(config.history_capacity),
            detect_duplicates: config.detect_duplicates,
            config,
            data: ProcessedResult::default(),
            editor: CellEditor::new(),
            duplicates: DuplicateSet::new(),
        }
    }

    /// Creates a sheet holding `data`, recorded as the first history snapshot.
    #[must_use]
    pub fn with_data(config: SheetConfig, data: ProcessedResult) -> Self {
        let mut sheet = Self::new(config);
        sheet.replace_data(data);
        sheet
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Returns the processed data (rows plus metadata).
    #[must_use]
    pub fn data(&self) -> &ProcessedResult {
        &self.data
    }

    /// Returns the row store.
    #[must_use]
    pub fn store(&self) -> &RowStore {
        &self.data.store
    }

    /// Returns the metadata that travels with the rows.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.data.metadata
    }

    /// Returns the view criteria.
    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Returns the cell editor.
    #[must_use]
    pub fn editor(&self) -> &CellEditor {
        &self.editor
    }

    /// Returns the undo history.
    #[must_use]
    pub fn history(&self) -> &History<ProcessedResult> {
        &self.history
    }

    /// Returns whether duplicate detection is enabled.
    #[must_use]
    pub fn duplicate_detection(&self) -> bool {
        self.detect_duplicates
    }

    /// Returns the duplicate set (empty while detection is disabled).
    #[must_use]
    pub fn duplicates(&self) -> &DuplicateSet {
        &self.duplicates
    }

    /// Returns the rows as name-keyed records.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.data.store.to_records()
    }

    // ---------------------------------------------------------------------
    // Update
    // ---------------------------------------------------------------------

    /// Applies a message. Returns an event for the embedding application when
    /// the user saves or closes.
    pub fn update(&mut self, msg: SheetMsg) -> Option<SheetEvent> {
        match msg {
            SheetMsg::ToggleSort(column) => self.view.toggle_sort(&column),
            SheetMsg::SetSort(sort) => self.view.set_sort(sort),
            SheetMsg::SetColumnFilter { column, term } => self.view.set_column_filter(column, term),
            SheetMsg::ClearColumnFilter(column) => self.view.set_column_filter(column, ""),
            SheetMsg::SetGlobalFilter(term) => self.view.set_global_filter(term),
            SheetMsg::ClearFilters => self.view.clear_filters(),
            SheetMsg::ToggleColumn(column) => self.view.toggle_column(&column),
            SheetMsg::ShowColumn(column) => self.view.show_column(&column),
            SheetMsg::HideColumn(column) => self.view.hide_column(column),
            SheetMsg::ShowAllColumns => self.view.show_all_columns(),
            SheetMsg::SetVisibleColumns(columns) => self
                .view
                .set_visible_columns(self.data.store.columns(), columns.iter().map(String::as_str)),
            SheetMsg::SetPage(page) => self.set_page(page),
            SheetMsg::NextPage => self.set_page(self.view.page() + 1),
            SheetMsg::PrevPage => self.set_page(self.view.page().saturating_sub(1)),
            SheetMsg::SetDuplicateDetection(enabled) => self.set_duplicate_detection(enabled),
            SheetMsg::SetDuplicatesOnly(on) => self.view.set_duplicates_only(on),
            SheetMsg::BeginEdit { row, column } => self.begin_edit(row, &column),
            SheetMsg::UpdateDraft(text) => self.editor.set_draft(text),
            SheetMsg::CommitEdit => self.commit_edit(),
            SheetMsg::CancelEdit => self.editor.cancel(),
            SheetMsg::Undo => {
                self.undo();
            }
            SheetMsg::ReplaceData(data) => self.replace_data(data),
            SheetMsg::Save => {
                self.commit_edit();
                info!(rows = self.data.store.len(), "saving sheet");
                return Some(SheetEvent::Save(self.records()));
            }
            SheetMsg::Close => {
                self.editor.cancel();
                return Some(SheetEvent::Close);
            }
        }
        None
    }

    /// Requests a page, clamped to the current page count.
    pub fn set_page(&mut self, page: usize) {
        self.view.set_page(page);
        self.clamp_page();
    }

    /// Enables or disables duplicate detection.
    pub fn set_duplicate_detection(&mut self, enabled: bool) {
        self.detect_duplicates = enabled;
        self.refresh_duplicates();
        self.clamp_page();
    }

    /// Starts editing a cell, committing any edit in progress.
    pub fn begin_edit(&mut self, row: usize, column: &str) {
        let previous = self.editor.begin(&mut self.data.store, row, column);
        self.after_commit(previous);
    }

    /// Replaces the draft of the active edit.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.editor.set_draft(text);
    }

    /// Commits the active edit, if any.
    pub fn commit_edit(&mut self) {
        let commit = self.editor.commit(&mut self.data.store);
        self.after_commit(commit);
    }

    /// Discards the active edit.
    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    /// Replaces all data atomically and records it in history.
    ///
    /// Any active edit is discarded and the view returns to page 1; sort,
    /// filters and hidden columns are kept.
    pub fn replace_data(&mut self, data: ProcessedResult) {
        self.editor.cancel();
        self.data = data;
        self.refresh_duplicates();
        self.view.set_page(1);
        let recorded = self.history.record(&self.data);
        info!(
            rows = self.data.store.len(),
            columns = self.data.store.columns().len(),
            recorded,
            "replaced sheet data"
        );
    }

    /// Steps back one history snapshot. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        self.editor.cancel();
        let Some(previous) = self.history.undo() else {
            debug!("nothing to undo");
            return false;
        };
        self.data = previous;
        self.refresh_duplicates();
        self.clamp_page();
        debug!(cursor = self.history.cursor(), "restored history snapshot");
        true
    }

    // ---------------------------------------------------------------------
    // View and export
    // ---------------------------------------------------------------------

    /// Derives the current page.
    #[must_use]
    pub fn view(&self) -> ViewPage<'_> {
        self.view.derive(&self.data.store, self.active_duplicates())
    }

    /// Exports the filtered, sorted rows (all pages) and visible columns.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the CSV writer fails.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        let store = &self.data.store;
        let indices = self.view.matching_indices(store, self.active_duplicates());
        export::to_delimited(
            &self.view.visible_columns(store.columns()),
            &self.view.visible_positions(store.columns()),
            indices.iter().filter_map(|&i| store.row(i)),
            self.config.delimiter,
        )
    }

    /// Writes [`export_csv`](Self::export_csv) to a timestamped file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if serialization or the write fails.
    pub fn export_to_dir(&self, dir: &Path, now: NaiveDateTime) -> Result<PathBuf, ExportError> {
        let body = self.export_csv()?;
        export::write_export(
            dir,
            &self.config.export_prefix,
            now,
            self.config.delimiter,
            &body,
        )
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn active_duplicates(&self) -> Option<&DuplicateSet> {
        self.detect_duplicates.then_some(&self.duplicates)
    }

    fn clamp_page(&mut self) {
        let duplicates = self.detect_duplicates.then_some(&self.duplicates);
        self.view.clamp_page(&self.data.store, duplicates);
    }

    fn refresh_duplicates(&mut self) {
        self.duplicates = duplicates::detect(&self.data.store, self.detect_duplicates);
    }

    fn after_commit(&mut self, commit: Option<CommittedEdit>) {
        let Some(commit) = commit else {
            return;
        };
        self.refresh_duplicates();
        self.clamp_page();
        if commit.previous.display() == commit.value.display() {
            debug!(row = commit.row, column = %commit.column, "cell text unchanged");
            return;
        }
        if self.config.record_cell_edits {
            self.history.record(&self.data);
        }
        debug!(
            row = commit.row,
            column = %commit.column,
            previous = %commit.previous,
            value = %commit.value,
            "applied cell edit"
        );
    }
}
