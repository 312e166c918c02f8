#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Sheetgrid
//!
//! The core of a tabular data editor: rows come in as a processed result,
//! are viewed through sort, filter and pagination, edited cell by cell with
//! undo, and exported as delimited text.
//!
//! Sheetgrid is organized as small components composed by [`Sheet`]:
//! - **store** - Row Store: column schema plus positional rows
//! - **ingest** - Processed-result JSON to a row store, keeping metadata
//! - **view** - View Engine: sort, filters, column visibility, pagination
//! - **duplicates** - Exact-duplicate row detection
//! - **editor** - Cell editing state machine (commit on focus change)
//! - **history** - Bounded undo history of snapshots
//! - **export** - CSV serialization of the current view
//! - **session** - Typed state handed between views
//!
//! ## Example
//!
//! ```rust
//! use sheetgrid::prelude::*;
//!
//! let data = ProcessedResult::from_json(
//!     r#"{"columns": ["name", "amount"],
//!         "rows": [{"name": "Alice", "amount": 100}, {"name": "Bob", "amount": 200}]}"#,
//! ).unwrap();
//!
//! let mut sheet = Sheet::with_data(SheetConfig::preview(), data);
//! sheet.update(SheetMsg::ToggleSort("amount".into()));
//! sheet.update(SheetMsg::ToggleSort("amount".into()));
//!
//! let page = sheet.view();
//! assert_eq!(page.rows[0].row.get(0), &Value::text("Bob"));
//! assert_eq!(sheet.export_csv().unwrap(), "name,amount\nBob,200\nAlice,100\n");
//! ```

pub mod config;
pub mod duplicates;
pub mod editor;
pub mod error;
pub mod export;
pub mod filter;
pub mod history;
pub mod ingest;
pub mod paginator;
pub mod session;
pub mod sheet;
pub mod sort;
pub mod store;
pub mod value;
pub mod view;

pub use config::SheetConfig;
pub use error::{Error, Result};
pub use ingest::ProcessedResult;
pub use sheet::{Sheet, SheetEvent, SheetMsg};
pub use value::Value;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::SheetConfig;
    pub use crate::duplicates::DuplicateSet;
    pub use crate::editor::{CellEdit, CellEditor, EditState};
    pub use crate::error::{Error, Result};
    pub use crate::filter::Filters;
    pub use crate::history::History;
    pub use crate::ingest::{Metadata, ProcessedResult};
    pub use crate::paginator::Paginator;
    pub use crate::session::Session;
    pub use crate::sheet::{Sheet, SheetEvent, SheetMsg};
    pub use crate::sort::{SortDirection, SortSpec};
    pub use crate::store::{Columns, Record, Row, RowStore};
    pub use crate::value::Value;
    pub use crate::view::{ViewPage, ViewRow, ViewState};
}
