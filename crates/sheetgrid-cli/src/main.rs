#![forbid(unsafe_code)]

//! # Sheetgrid
//!
//! View, edit and export processed spreadsheet data.
//!
//! ## Usage
//!
//! ```bash
//! sheetgrid result.json                          # Render page 1
//! sheetgrid result.json --sort amount:desc -p 2  # Sorted, page 2
//! sheetgrid result.json --export -               # CSV to stdout
//! ```

use anyhow::Context;
use sheetgrid_cli::{Cli, Config};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    let config = Config::from_cli(&cli).context("invalid configuration")?;
    let output = sheetgrid_cli::run(&config)
        .with_context(|| format!("failed to process {}", config.input.display()))?;

    print!("{}", output.stdout);
    for path in &output.written {
        eprintln!("exported {}", path.display());
    }
    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the `-v` level.
fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
