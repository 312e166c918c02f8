//! Crate-level error type.
//!
//! Editing operations never fail: out-of-range positions and unknown columns
//! are no-ops. Errors only arise at the boundaries, when data comes in,
//! configuration is loaded, an export is written or a session is persisted.
//!
//! | Variant | Boundary |
//! |---------|----------|
//! | [`Ingest`](Error::Ingest) | Processed-result JSON |
//! | [`Config`](Error::Config) | Surface configuration |
//! | [`Export`](Error::Export) | CSV serialization or file write |
//! | [`Session`](Error::Session) | Session persistence |

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::ingest::IngestError;
use crate::session::SessionError;

/// Any error produced by this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Processed data could not be ingested.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Configuration is invalid or unreadable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Export failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Session (de)serialization failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
