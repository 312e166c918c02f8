//! Cell Editor: transient edit state for exactly one cell.
//!
//! The editor is either [`EditState::Idle`] or editing a single cell with a
//! draft string. Editing follows the usual focus/blur rules of text inputs:
//!
//! - [`CellEditor::begin`] focuses a cell, seeding the draft with its display
//!   string. Focusing another cell while editing blurs the previous one, which
//!   commits it.
//! - [`CellEditor::commit`] writes the draft into the store as text.
//! - [`CellEditor::cancel`] discards the draft.
//!
//! Committed values are always [`Value::Text`]; the original type of the cell is
//! not preserved, although its display string is when the draft is unchanged.
//!
//! # Example
//!
//! ```rust
//! use sheetgrid::editor::CellEditor;
//! use sheetgrid::store::{Columns, RowStore};
//! use sheetgrid::Value;
//!
//! let mut store = RowStore::from_rows(Columns::new(["Status"]), vec![vec![Value::text("Open")]]);
//! let mut editor = CellEditor::new();
//!
//! editor.begin(&mut store, 0, "Status");
//! editor.set_draft("Closed");
//! let commit = editor.commit(&mut store).unwrap();
//!
//! assert_eq!(commit.previous, Value::text("Open"));
//! assert_eq!(store.get(0, "Status"), Some(&Value::text("Closed")));
//! assert!(!editor.is_editing());
//! ```

use tracing::{debug, warn};

use crate::store::RowStore;
use crate::value::Value;

/// The cell being edited and its draft text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    /// Row position in the store.
    pub row: usize,
    /// Column name.
    pub column: String,
    /// Current draft text.
    pub draft: String,
}

/// Editor state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    /// No cell is being edited.
    #[default]
    Idle,
    /// One cell is being edited.
    Editing(CellEdit),
}

/// A cell write performed by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedEdit {
    /// Row position in the store.
    pub row: usize,
    /// Column name.
    pub column: String,
    /// Value before the commit.
    pub previous: Value,
    /// Value written by the commit.
    pub value: Value,
}

/// Single-cell edit state machine.
#[derive(Debug, Clone, Default)]
pub struct CellEditor {
    state: EditState,
}

impl CellEditor {
    /// Creates an idle editor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Returns the active edit, if any.
    #[must_use]
    pub fn editing(&self) -> Option<&CellEdit> {
        match &self.state {
            EditState::Editing(edit) => Some(edit),
            EditState::Idle => None,
        }
    }

    /// Returns whether a cell is being edited.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing().is_some()
    }

    /// Returns whether the given cell is the one being edited.
    #[must_use]
    pub fn is_editing_cell(&self, row: usize, column: &str) -> bool {
        self.editing()
            .is_some_and(|edit| edit.row == row && edit.column == column)
    }

    /// Starts editing a cell.
    ///
    /// An edit already in progress is committed first and its write returned.
    /// Targeting a cell that does not exist leaves the editor idle.
    pub fn begin(&mut self, store: &mut RowStore, row: usize, column: &str) -> Option<CommittedEdit> {
        if self.is_editing_cell(row, column) {
            return None;
        }

        let previous = self.commit(store);

        match store.get(row, column) {
            Some(value) => {
                debug!(row, column, "begin cell edit");
                self.state = EditState::Editing(CellEdit {
                    row,
                    column: column.to_string(),
                    draft: value.display().into_owned(),
                });
            }
            None => debug!(row, column, "ignoring edit of missing cell"),
        }

        previous
    }

    /// Replaces the draft text. Ignored while idle.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let EditState::Editing(edit) = &mut self.state {
            edit.draft = text.into();
        }
    }

    /// Writes the draft into the store and returns to idle.
    ///
    /// Returns `None` when idle, or when the edited cell no longer exists (the
    /// draft is then discarded).
    pub fn commit(&mut self, store: &mut RowStore) -> Option<CommittedEdit> {
        let EditState::Editing(edit) = std::mem::take(&mut self.state) else {
            return None;
        };

        let Some(previous) = store.get(edit.row, &edit.column).cloned() else {
            warn!(row = edit.row, column = %edit.column, "edited cell vanished before commit");
            return None;
        };
        let value = Value::Text(edit.draft);
        store.set(edit.row, &edit.column, value.clone());

        debug!(row = edit.row, column = %edit.column, "committed cell edit");
        Some(CommittedEdit {
            row: edit.row,
            column: edit.column,
            previous,
            value,
        })
    }

    /// Discards the draft and returns to idle.
    pub fn cancel(&mut self) {
        if let EditState::Editing(edit) = std::mem::take(&mut self.state) {
            debug!(row = edit.row, column = %edit.column, "cancelled cell edit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Columns;

    fn store() -> RowStore {
        RowStore::from_rows(
            Columns::new(["name", "amount"]),
            vec![
                vec![Value::text("Alice"), Value::from(100)],
                vec![Value::text("Bob"), Value::from(200)],
            ],
        )
    }

    #[test]
    fn test_begin_seeds_draft() {
        let mut s = store();
        let mut editor = CellEditor::new();
        assert!(editor.begin(&mut s, 1, "amount").is_none());
        assert_eq!(
            editor.state(),
            &EditState::Editing(CellEdit {
                row: 1,
                column: "amount".into(),
                draft: "200".into(),
            })
        );
    }

    #[test]
    fn test_commit_unchanged_number_becomes_text() {
        let mut s = store();
        let mut editor = CellEditor::new();
        editor.begin(&mut s, 0, "amount");
        let commit = editor.commit(&mut s).unwrap();
        assert_eq!(commit.previous, Value::from(100));
        assert_eq!(s.get(0, "amount"), Some(&Value::text("100")));
        assert_eq!(s.get(0, "amount").unwrap().display(), "100");
    }

    #[test]
    fn test_commit_empty_string() {
        let mut s = store();
        let mut editor = CellEditor::new();
        editor.begin(&mut s, 0, "name");
        editor.set_draft("");
        editor.commit(&mut s);
        assert_eq!(s.get(0, "name"), Some(&Value::text("")));
    }

    #[test]
    fn test_cancel_leaves_store() {
        let mut s = store();
        let mut editor = CellEditor::new();
        editor.begin(&mut s, 0, "name");
        editor.set_draft("Zed");
        editor.cancel();
        assert!(!editor.is_editing());
        assert_eq!(s, store());
        assert!(editor.commit(&mut s).is_none());
    }

    #[test]
    fn test_switching_cells_commits_previous() {
        let mut s = store();
        let mut editor = CellEditor::new();
        editor.begin(&mut s, 0, "name");
        editor.set_draft("Alicia");

        let previous = editor.begin(&mut s, 1, "name").unwrap();
        assert_eq!(previous.row, 0);
        assert_eq!(previous.value, Value::text("Alicia"));
        assert_eq!(s.get(0, "name"), Some(&Value::text("Alicia")));
        assert!(editor.is_editing_cell(1, "name"));
    }

    #[test]
    fn test_begin_same_cell_keeps_draft() {
        let mut s = store();
        let mut editor = CellEditor::new();
        editor.begin(&mut s, 0, "name");
        editor.set_draft("A.");
        assert!(editor.begin(&mut s, 0, "name").is_none());
        assert_eq!(editor.editing().unwrap().draft, "A.");
    }

    #[test]
    fn test_begin_missing_cell_stays_idle() {
        let mut s = store();
        let mut editor = CellEditor::new();
        editor.begin(&mut s, 9, "name");
        assert!(!editor.is_editing());
        editor.begin(&mut s, 0, "ghost");
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_commit_after_rows_vanish() {
        let mut s = store();
        let mut editor = CellEditor::new();
        editor.begin(&mut s, 1, "name");
        s.replace(RowStore::new(Columns::new(["name"])));
        assert!(editor.commit(&mut s).is_none());
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_set_draft_idle_ignored() {
        let mut editor = CellEditor::new();
        editor.set_draft("x");
        assert_eq!(editor.state(), &EditState::Idle);
    }
}
