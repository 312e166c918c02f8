#![forbid(unsafe_code)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Sheetgrid CLI
//!
//! Command-line embedding of the [`sheetgrid`] core. One invocation loads a
//! processed result, applies cell edits and undo steps, applies view
//! criteria, then prints the requested page or exports the view.
//!
//! - **cli** - Argument definitions
//! - **config** - Resolved runtime configuration and value parsers
//! - **render** - Plain-text table rendering of a view page
//! - **app** - The run itself

pub mod app;
pub mod cli;
pub mod config;
pub mod render;

pub use app::{Error, Output, run};
pub use cli::{Cli, Surface};
pub use config::{Config, ConfigError};
