//! Command-line interface for `sheetgrid`.
//!
//! Defines the CLI contract using clap derive macros. Every option maps onto
//! one sheet operation; they are applied in a fixed order (edits, undo,
//! view criteria, page, export) regardless of their order on the command line.
//!
//! # Examples
//!
//! ```bash
//! # Render the first page of a processed result
//! sheetgrid result.json
//!
//! # Sort by amount (descending), keep open rows, show page 2
//! sheetgrid result.json --sort amount:desc --filter Status=open --page 2
//!
//! # Edit a cell and export the view as CSV to stdout
//! sheetgrid result.json --set 2:Status=Closed --export -
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// View, edit and export processed spreadsheet data.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sheetgrid",
    author,
    version,
    about = "View, edit and export processed spreadsheet data",
    long_about = "Loads a processed result ({\"columns\": [...], \"rows\": [...]}), applies \
                  edits, undo, sorting, filtering and pagination, then prints the page or \
                  exports the view as delimited text."
)]
pub struct Cli {
    /// Processed result JSON file
    pub input: PathBuf,

    /// Editing surface whose defaults to start from
    #[arg(long, value_enum, default_value_t = Surface::Editor)]
    pub surface: Surface,

    /// Path to a JSON configuration file
    #[arg(long, env = "SHEETGRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Page to show (1-indexed, clamped to the last page)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long, env = "SHEETGRID_PAGE_SIZE")]
    pub page_size: Option<usize>,

    /// Export delimiter (a single character, or "tab")
    #[arg(long, short = 'd', env = "SHEETGRID_DELIMITER")]
    pub delimiter: Option<String>,

    /// Sort column, optionally with a direction: COL, COL:asc or COL:desc
    #[arg(long, short = 's')]
    pub sort: Option<String>,

    /// Column filter COL=TEXT (case-insensitive substring); repeatable
    #[arg(long = "filter", short = 'f')]
    pub filters: Vec<String>,

    /// Global filter matched against every column
    #[arg(long)]
    pub search: Option<String>,

    /// Comma-separated list of columns to show
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Show only rows that duplicate another row
    #[arg(long, conflicts_with = "no_duplicates")]
    pub duplicates_only: bool,

    /// Disable duplicate detection
    #[arg(long)]
    pub no_duplicates: bool,

    /// Cell edit ROW:COL=VALUE (ROW is 1-indexed); repeatable
    #[arg(long = "set")]
    pub edits: Vec<String>,

    /// Number of undo steps to apply after the edits
    #[arg(long, default_value_t = 0)]
    pub undo: usize,

    /// Export the filtered, sorted view to PATH ("-" for stdout)
    #[arg(long, short = 'o')]
    pub export: Option<String>,

    /// Export the view to a timestamped file in DIR
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Editing surface presets.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Surface {
    /// Tabular editor: 50 rows per page, every cell edit undoable
    #[default]
    Editor,
    /// Full-table preview: 20 rows per page, only bulk changes undoable
    Preview,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Get the log filter directive based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
