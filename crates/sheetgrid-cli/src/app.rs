//! One `sheetgrid` run: load, mutate, view, export.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use sheetgrid::{ProcessedResult, Sheet, SheetMsg};
use tracing::{debug, info, warn};

use crate::config::{CellAssignment, Config, ExportTarget};
use crate::render;

/// Result of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    /// Text for stdout: the rendered page, or the export with `--export -`.
    pub stdout: String,
    /// Export files written.
    pub written: Vec<PathBuf>,
}

/// Errors produced by a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Input path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An export file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The sheet core rejected the input or failed to export.
    #[error(transparent)]
    Sheet(#[from] sheetgrid::Error),

    /// A `--set` row is outside the table.
    #[error("row {row} is out of range: the table has {rows} rows")]
    RowOutOfRange {
        /// Requested row (1-indexed).
        row: usize,
        /// Number of rows.
        rows: usize,
    },

    /// A `--set` column does not exist.
    #[error("unknown column {0:?}")]
    UnknownColumn(String),
}

/// Runs one invocation described by `config`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or ingested, an edit targets
/// a missing cell, or an export cannot be written.
pub fn run(config: &Config) -> Result<Output, Error> {
    let text = fs::read_to_string(&config.input).map_err(|source| Error::Read {
        path: config.input.clone(),
        source,
    })?;
    let data = ProcessedResult::from_json(&text).map_err(sheetgrid::Error::from)?;
    info!(
        path = %config.input.display(),
        rows = data.store.len(),
        columns = data.store.columns().len(),
        "loaded processed result"
    );

    let mut sheet = Sheet::with_data(config.sheet.clone(), data);
    for edit in &config.edits {
        apply_edit(&mut sheet, edit)?;
    }
    for step in 0..config.undo {
        if !sheet.undo() {
            warn!(requested = config.undo, applied = step, "history exhausted");
            break;
        }
    }
    apply_view(&mut sheet, config);

    let mut output = Output::default();
    if let Some(ExportTarget::File(path)) = &config.export {
        let body = sheet.export_csv().map_err(sheetgrid::Error::from)?;
        fs::write(path, body).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        output.written.push(path.clone());
    }
    if let Some(dir) = &config.export_dir {
        let path = sheet
            .export_to_dir(dir, Local::now().naive_local())
            .map_err(sheetgrid::Error::from)?;
        output.written.push(path);
    }

    output.stdout = match config.export {
        Some(ExportTarget::Stdout) => sheet.export_csv().map_err(sheetgrid::Error::from)?,
        _ => render::render_page(&sheet.view(), sheet.view_state().sort()),
    };
    Ok(output)
}

fn apply_edit(sheet: &mut Sheet, edit: &CellAssignment) -> Result<(), Error> {
    let rows = sheet.store().len();
    if edit.row > rows {
        return Err(Error::RowOutOfRange {
            row: edit.row,
            rows,
        });
    }
    if !sheet.store().columns().contains(&edit.column) {
        return Err(Error::UnknownColumn(edit.column.clone()));
    }

    sheet.update(SheetMsg::BeginEdit {
        row: edit.row - 1,
        column: edit.column.clone(),
    });
    sheet.update(SheetMsg::UpdateDraft(edit.value.clone()));
    sheet.update(SheetMsg::CommitEdit);
    debug!(row = edit.row, column = %edit.column, "applied --set");
    Ok(())
}

fn apply_view(sheet: &mut Sheet, config: &Config) {
    let columns = sheet.store().columns().clone();

    if let Some(visible) = &config.columns {
        for name in visible.iter().filter(|n| !columns.contains(n)) {
            warn!(column = %name, "ignoring unknown column in --columns");
        }
        sheet.update(SheetMsg::SetVisibleColumns(visible.clone()));
    }
    if let Some(sort) = &config.sort {
        if !columns.contains(&sort.column) {
            warn!(column = %sort.column, "sort column not found; rows stay unsorted");
        }
        sheet.update(SheetMsg::SetSort(Some(sort.clone())));
    }
    for (column, term) in &config.filters {
        if !columns.contains(column) {
            warn!(column = %column, "ignoring filter on unknown column");
        }
        sheet.update(SheetMsg::SetColumnFilter {
            column: column.clone(),
            term: term.clone(),
        });
    }
    if let Some(search) = &config.search {
        sheet.update(SheetMsg::SetGlobalFilter(search.clone()));
    }
    if config.duplicates_only {
        sheet.update(SheetMsg::SetDuplicatesOnly(true));
    }
    sheet.update(SheetMsg::SetPage(config.page));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    const DATA: &str = r#"{
        "columns": ["name", "amount", "Status"],
        "rows": [
            {"name": "Alice", "amount": 100, "Status": "Open"},
            {"name": "Bob", "amount": 200, "Status": "Open"},
            {"name": "Alice", "amount": 100, "Status": "Open"}
        ]
    }"#;

    fn run_with(args: &[&str]) -> Result<Output, Error> {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        fs::write(&input, DATA).unwrap();
        let mut all = vec!["sheetgrid", input.to_str().unwrap()];
        all.extend_from_slice(args);
        let config = Config::from_cli(&Cli::try_parse_from(all).unwrap()).unwrap();
        run(&config)
    }

    #[test]
    fn test_renders_page() {
        let out = run_with(&[]).unwrap();
        assert!(out.stdout.starts_with("  #  name   amount  Status\n"));
        assert!(out.stdout.contains("* 1  Alice  100     Open\n"));
        assert!(out.stdout.ends_with("page 1/1 · 3 rows\n"));
        assert!(out.written.is_empty());
    }

    #[test]
    fn test_edit_then_export() {
        let out = run_with(&["--set", "2:Status=Closed", "--export", "-"]).unwrap();
        assert_eq!(
            out.stdout,
            "name,amount,Status\nAlice,100,Open\nBob,200,Closed\nAlice,100,Open\n"
        );
    }

    #[test]
    fn test_undo_reverts_edits() {
        let out = run_with(&[
            "--set",
            "2:Status=Closed",
            "--set",
            "2:name=Robert",
            "--undo",
            "1",
            "--export",
            "-",
        ])
        .unwrap();
        assert!(out.stdout.contains("Bob,200,Closed\n"));
    }

    #[test]
    fn test_view_options_shape_export() {
        let out = run_with(&[
            "--sort",
            "name:desc",
            "--columns",
            "name,Status",
            "--duplicates-only",
            "--export",
            "-",
        ])
        .unwrap();
        assert_eq!(out.stdout, "name,Status\nAlice,Open\nAlice,Open\n");
    }

    #[test]
    fn test_edit_out_of_range() {
        let err = run_with(&["--set", "9:name=x"]).unwrap_err();
        assert!(matches!(err, Error::RowOutOfRange { row: 9, rows: 3 }));
        let err = run_with(&["--set", "1:nope=x"]).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(_)));
    }

    #[test]
    fn test_export_to_file_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.csv");
        let out = run_with(&[
            "--export",
            file.to_str().unwrap(),
            "--export-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(out.written.len(), 2);
        assert_eq!(out.written[0], file);
        assert!(fs::read_to_string(&file).unwrap().starts_with("name,amount,Status\n"));
        let stamped = out.written[1].file_name().unwrap().to_string_lossy().into_owned();
        assert!(stamped.starts_with("processed_data_"));
        assert!(out.stdout.contains("page 1/1"));
    }

    #[test]
    fn test_missing_input() {
        let cli = Cli::try_parse_from(["sheetgrid", "/nonexistent/data.json"]).unwrap();
        let err = run(&Config::from_cli(&cli).unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("cannot read /nonexistent/data.json"));
    }
}
