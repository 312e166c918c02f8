//! Typed application state shared between views.
//!
//! A [`Session`] is the single source of truth for what the upload, chat and
//! editor views hand to each other: the uploaded file name, the prompt, the
//! latest processed result and whether the editor is open. Views read and
//! write it through typed accessors; embedding applications that must survive
//! reloads persist it with [`Session::to_json`] / [`Session::from_json`].
//!
//! # Example
//!
//! ```rust
//! use sheetgrid::session::Session;
//! use sheetgrid::ProcessedResult;
//!
//! let mut session = Session::new();
//! session.set_upload("sales.xlsx", "remove empty rows");
//! assert!(!session.open_editor()); // nothing processed yet
//!
//! session.set_processed(ProcessedResult::default());
//! assert!(session.open_editor());
//!
//! let restored = Session::from_json(&session.to_json().unwrap()).unwrap();
//! assert_eq!(restored, session);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ingest::ProcessedResult;

/// Errors produced while persisting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session could not be (de)serialized.
    #[error("session serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Typed cross-view application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    source_file: Option<String>,
    prompt: Option<String>,
    processed: Option<ProcessedResult>,
    editor_open: bool,
    updated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new upload and its prompt. Any previous result is dropped.
    pub fn set_upload(&mut self, source_file: impl Into<String>, prompt: impl Into<String>) {
        self.source_file = Some(source_file.into());
        self.prompt = Some(prompt.into());
        self.processed = None;
        self.editor_open = false;
        self.touch();
    }

    /// Returns the uploaded file name.
    #[must_use]
    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    /// Returns the prompt sent with the upload.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Stores the latest processed result.
    pub fn set_processed(&mut self, result: ProcessedResult) {
        debug!(rows = result.store.len(), "session received processed result");
        self.processed = Some(result);
        self.touch();
    }

    /// Returns the latest processed result.
    #[must_use]
    pub fn processed(&self) -> Option<&ProcessedResult> {
        self.processed.as_ref()
    }

    /// Removes and returns the latest processed result, closing the editor.
    pub fn take_processed(&mut self) -> Option<ProcessedResult> {
        let taken = self.processed.take();
        if taken.is_some() {
            self.editor_open = false;
            self.touch();
        }
        taken
    }

    /// Opens the editor. Returns false (and stays closed) without a result.
    pub fn open_editor(&mut self) -> bool {
        if self.processed.is_none() {
            return false;
        }
        self.editor_open = true;
        self.touch();
        true
    }

    /// Closes the editor.
    pub fn close_editor(&mut self) {
        self.editor_open = false;
        self.touch();
    }

    /// Returns whether the editor is open.
    #[must_use]
    pub fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    /// Returns when the session last changed.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Resets the session to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Serializes the session to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a session from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Json`] on malformed input.
    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(text)?)
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
