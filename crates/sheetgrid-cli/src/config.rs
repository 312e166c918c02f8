//! Runtime configuration for `sheetgrid`.
//!
//! [`Config`] is the canonical, fully parsed form of one invocation,
//! independent of how each setting was specified. Surface settings resolve
//! with this precedence (lowest first):
//!
//! 1. the `--surface` preset
//! 2. the JSON file from `--config` / `SHEETGRID_CONFIG`
//! 3. `SHEETGRID_PAGE_SIZE` / `SHEETGRID_DELIMITER`
//! 4. the matching command-line flags
//!
//! # Examples
//!
//! ```rust
//! use sheetgrid_cli::{Cli, Config};
//!
//! let cli = Cli::try_parse_from(["sheetgrid", "data.json", "--sort", "amount:desc"]).unwrap();
//! let config = Config::from_cli(&cli).unwrap();
//! assert_eq!(config.sort.unwrap().column, "amount");
//! ```

use std::path::PathBuf;

use sheetgrid::SheetConfig;
use sheetgrid::config::parse_delimiter;
use sheetgrid::sort::{SortDirection, SortSpec};

use crate::cli::{Cli, Surface};

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // ========================================================================
    // Input
    // ========================================================================
    /// Processed result JSON file.
    pub input: PathBuf,

    /// Surface settings for the sheet.
    pub sheet: SheetConfig,

    // ========================================================================
    // Mutations (applied before any view criteria)
    // ========================================================================
    /// Cell edits, in command-line order.
    pub edits: Vec<CellAssignment>,

    /// Undo steps applied after the edits.
    pub undo: usize,

    // ========================================================================
    // View
    // ========================================================================
    /// Requested page (1-indexed).
    pub page: usize,

    /// Sort, if any.
    pub sort: Option<SortSpec>,

    /// Column filters as (column, term) pairs.
    pub filters: Vec<(String, String)>,

    /// Global filter.
    pub search: Option<String>,

    /// Columns to show; all when `None`.
    pub columns: Option<Vec<String>>,

    /// Restrict the view to duplicate rows.
    pub duplicates_only: bool,

    // ========================================================================
    // Output
    // ========================================================================
    /// Where to export the view, if anywhere.
    pub export: Option<ExportTarget>,

    /// Directory for a timestamped export file.
    pub export_dir: Option<PathBuf>,
}

/// One `--set ROW:COL=VALUE` edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAssignment {
    /// Row number as given (1-indexed store position).
    pub row: usize,
    /// Column name.
    pub column: String,
    /// New cell text.
    pub value: String,
}

/// Export destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Print the export instead of the rendered page.
    Stdout,
    /// Write the export to a file.
    File(PathBuf),
}

impl Config {
    /// Create config from CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded, a surface
    /// setting is invalid, or a `--sort`, `--filter` or `--set` value is
    /// malformed.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut sheet = match cli.surface {
            Surface::Editor => SheetConfig::editor(),
            Surface::Preview => SheetConfig::preview(),
        };
        if let Some(path) = &cli.config {
            sheet = sheet.overlay_file(path)?;
        }
        if let Some(n) = cli.page_size {
            sheet = sheet.page_size(n);
        }
        if let Some(text) = &cli.delimiter {
            sheet = sheet.delimiter(parse_delimiter(text)?);
        }
        if cli.no_duplicates {
            sheet = sheet.detect_duplicates(false);
        }
        sheet.validate()?;

        let export = cli.export.as_deref().map(|target| match target {
            "-" => ExportTarget::Stdout,
            path => ExportTarget::File(PathBuf::from(path)),
        });

        Ok(Self {
            input: cli.input.clone(),
            sheet,
            edits: cli
                .edits
                .iter()
                .map(|e| parse_assignment(e))
                .collect::<Result<_, _>>()?,
            undo: cli.undo,
            page: cli.page,
            sort: cli.sort.as_deref().map(parse_sort).transpose()?,
            filters: cli
                .filters
                .iter()
                .map(|f| parse_filter(f))
                .collect::<Result<_, _>>()?,
            search: cli.search.clone(),
            columns: cli.columns.clone(),
            duplicates_only: cli.duplicates_only,
            export,
            export_dir: cli.export_dir.clone(),
        })
    }
}

/// Parses `COL`, `COL:asc` or `COL:desc`.
///
/// A suffix that is not a direction is part of the column name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSort`] for an empty column.
pub fn parse_sort(text: &str) -> Result<SortSpec, ConfigError> {
    let (column, direction) = match text.rsplit_once(':') {
        Some((column, suffix)) => match suffix.parse::<SortDirection>() {
            Ok(direction) => (column, direction),
            Err(_) => (text, SortDirection::Ascending),
        },
        None => (text, SortDirection::Ascending),
    };
    if column.is_empty() {
        return Err(ConfigError::InvalidSort(text.to_string()));
    }
    Ok(SortSpec {
        column: column.to_string(),
        direction,
    })
}

/// Parses `COL=TEXT`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidFilter`] without `=` or with an empty column.
pub fn parse_filter(text: &str) -> Result<(String, String), ConfigError> {
    match text.split_once('=') {
        Some((column, term)) if !column.is_empty() => Ok((column.to_string(), term.to_string())),
        _ => Err(ConfigError::InvalidFilter(text.to_string())),
    }
}

/// Parses `ROW:COL=VALUE`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEdit`] unless ROW is a positive integer and
/// COL is non-empty.
pub fn parse_assignment(text: &str) -> Result<CellAssignment, ConfigError> {
    let invalid = || ConfigError::InvalidEdit(text.to_string());
    let (row, rest) = text.split_once(':').ok_or_else(invalid)?;
    let (column, value) = rest.split_once('=').ok_or_else(invalid)?;
    let row: usize = row.trim().parse().map_err(|_| invalid())?;
    if row == 0 || column.is_empty() {
        return Err(invalid());
    }
    Ok(CellAssignment {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Surface settings are invalid.
    #[error(transparent)]
    Sheet(#[from] sheetgrid::config::ConfigError),

    /// `--sort` value is malformed.
    #[error("invalid sort {0:?}: expected COL, COL:asc or COL:desc")]
    InvalidSort(String),

    /// `--filter` value is malformed.
    #[error("invalid filter {0:?}: expected COL=TEXT")]
    InvalidFilter(String),

    /// `--set` value is malformed.
    #[error("invalid edit {0:?}: expected ROW:COL=VALUE with ROW starting at 1")]
    InvalidEdit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut all = vec!["sheetgrid", "data.json"];
        all.extend_from_slice(args);
        Cli::try_parse_from(all).unwrap()
    }

    #[test]
    fn test_surface_presets() {
        let editor = Config::from_cli(&cli(&[])).unwrap();
        assert_eq!(editor.sheet, SheetConfig::editor());

        let preview = Config::from_cli(&cli(&["--surface", "preview"])).unwrap();
        assert_eq!(preview.sheet.page_size, 20);
        assert!(!preview.sheet.record_cell_edits);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"page_size": 7, "delimiter": ";"}"#).unwrap();
        let path = path.to_str().unwrap();

        let from_file = Config::from_cli(&cli(&["--config", path])).unwrap();
        assert_eq!(from_file.sheet.page_size, 7);
        assert_eq!(from_file.sheet.delimiter, b';');

        let flagged = Config::from_cli(&cli(&["--config", path, "--page-size", "3"])).unwrap();
        assert_eq!(flagged.sheet.page_size, 3);
        assert_eq!(flagged.sheet.delimiter, b';');
    }

    #[test]
    fn test_invalid_surface_settings() {
        assert!(Config::from_cli(&cli(&["--page-size", "0"])).is_err());
        assert!(Config::from_cli(&cli(&["--delimiter", "ab"])).is_err());
    }

    #[test]
    fn test_export_target() {
        let stdout = Config::from_cli(&cli(&["--export", "-"])).unwrap();
        assert_eq!(stdout.export, Some(ExportTarget::Stdout));
        let file = Config::from_cli(&cli(&["--export", "out.csv"])).unwrap();
        assert_eq!(file.export, Some(ExportTarget::File(PathBuf::from("out.csv"))));
    }

    #[test]
    fn test_no_duplicates_disables_detection() {
        let config = Config::from_cli(&cli(&["--no-duplicates"])).unwrap();
        assert!(!config.sheet.detect_duplicates);
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("amount").unwrap(), SortSpec::ascending("amount"));
        assert_eq!(parse_sort("amount:desc").unwrap(), SortSpec::descending("amount"));
        assert_eq!(parse_sort("a:b").unwrap(), SortSpec::ascending("a:b"));
        assert!(parse_sort(":desc").is_err());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("Status=open").unwrap(),
            ("Status".to_string(), "open".to_string())
        );
        assert_eq!(
            parse_filter("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_filter("Status").is_err());
        assert!(parse_filter("=open").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("2:Status=Closed").unwrap(),
            CellAssignment {
                row: 2,
                column: "Status".to_string(),
                value: "Closed".to_string(),
            }
        );
        assert_eq!(parse_assignment("1:note=").unwrap().value, "");
        assert!(parse_assignment("0:Status=x").is_err());
        assert!(parse_assignment("x:Status=x").is_err());
        assert!(parse_assignment("1:Status").is_err());
        assert!(parse_assignment("1:=x").is_err());
    }
}
