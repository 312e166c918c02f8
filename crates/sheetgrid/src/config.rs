//! Runtime configuration of a sheet surface.
//!
//! Two editing surfaces exist with different defaults:
//!
//! | Surface | Page size | Cell edits recorded in history |
//! |---------|-----------|--------------------------------|
//! | [`SheetConfig::editor`] | 50 | yes |
//! | [`SheetConfig::preview`] | 20 | no (bulk replacements only) |
//!
//! Both are plain data and can be loaded from JSON; every field has a default
//! so partial files work.
//!
//! # Example
//!
//! ```rust
//! use sheetgrid::SheetConfig;
//!
//! let config = SheetConfig::preview().page_size(25).delimiter(b';');
//! assert!(config.validate().is_ok());
//! assert_eq!(config.page_size, 25);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_CAPACITY;
use crate::paginator::{EDITOR_PAGE_SIZE, PREVIEW_PAGE_SIZE};

/// Default prefix of export file names.
pub const DEFAULT_EXPORT_PREFIX: &str = "processed_data";

/// Configuration of one sheet surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Rows per page.
    pub page_size: usize,

    /// Maximum number of history snapshots.
    pub history_capacity: usize,

    /// Whether duplicate detection starts enabled.
    pub detect_duplicates: bool,

    /// Export field delimiter (a single ASCII byte).
    #[serde(with = "delimiter_char")]
    pub delimiter: u8,

    /// Whether single-cell commits create history snapshots.
    ///
    /// Bulk replacements always do.
    pub record_cell_edits: bool,

    /// Prefix of generated export file names.
    pub export_prefix: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::editor()
    }
}

impl SheetConfig {
    /// Defaults of the tabular editor surface.
    #[must_use]
    pub fn editor() -> Self {
        Self {
            page_size: EDITOR_PAGE_SIZE,
            history_capacity: DEFAULT_CAPACITY,
            detect_duplicates: true,
            delimiter: b',',
            record_cell_edits: true,
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }

    /// Defaults of the full-table preview surface.
    #[must_use]
    pub fn preview() -> Self {
        Self {
            page_size: PREVIEW_PAGE_SIZE,
            record_cell_edits: false,
            ..Self::editor()
        }
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] when the file
    /// cannot be read or parsed, and any [`validate`](Self::validate) error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON, and any
    /// [`validate`](Self::validate) error.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlays the fields present in a JSON file onto this configuration.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file).
    pub fn overlay_file(&self, path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.overlay_json(&text)
    }

    /// Overlays the fields present in JSON text onto this configuration.
    ///
    /// Fields missing from `text` keep their current values, so a partial
    /// file applied to [`preview`](Self::preview) stays a preview surface.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnObject`] unless `text` is a JSON object,
    /// [`ConfigError::Parse`] on malformed JSON, and any
    /// [`validate`](Self::validate) error.
    pub fn overlay_json(&self, text: &str) -> Result<Self, ConfigError> {
        let mut merged = serde_json::to_value(self)?;
        let serde_json::Value::Object(patch) = serde_json::from_str::<serde_json::Value>(text)? else {
            return Err(ConfigError::NotAnObject);
        };
        if let Some(fields) = merged.as_object_mut() {
            fields.extend(patch);
        }
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the page size.
    #[must_use]
    pub fn page_size(mut self, n: usize) -> Self {
        self.page_size = n;
        self
    }

    /// Sets the history capacity.
    #[must_use]
    pub fn history_capacity(mut self, n: usize) -> Self {
        self.history_capacity = n;
        self
    }

    /// Enables or disables duplicate detection.
    #[must_use]
    pub fn detect_duplicates(mut self, enabled: bool) -> Self {
        self.detect_duplicates = enabled;
        self
    }

    /// Sets the export delimiter.
    #[must_use]
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether cell commits are recorded in history.
    #[must_use]
    pub fn record_cell_edits(mut self, enabled: bool) -> Self {
        self.record_cell_edits = enabled;
        self
    }

    /// Sets the export file name prefix.
    #[must_use]
    pub fn export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero page size or history capacity, or a
    /// delimiter that cannot separate CSV fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(ConfigError::InvalidDelimiter(char::from(self.delimiter)));
        }
        Ok(())
    }
}

/// Parses a delimiter given as text (`","`, `";"`, `"\t"` or `"tab"`).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDelimiter`] unless the text is a single
/// ASCII character.
pub fn parse_delimiter(text: &str) -> Result<u8, ConfigError> {
    match text {
        "tab" | "\\t" => Ok(b'\t'),
        _ => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                (Some(c), _) => Err(ConfigError::InvalidDelimiter(c)),
                (None, _) => Err(ConfigError::EmptyDelimiter),
            }
        }
    }
}

mod delimiter_char {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(delimiter: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&char::from(*delimiter).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_delimiter(&text).map_err(de::Error::custom)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Page size must be positive.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// History capacity must be positive.
    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,

    /// Delimiter is not usable.
    #[error("invalid delimiter: {0:?}")]
    InvalidDelimiter(char),

    /// Delimiter text is empty.
    #[error("delimiter must not be empty")]
    EmptyDelimiter,

    /// Config file could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config text is valid JSON but not an object.
    #[error("config must be a JSON object")]
    NotAnObject,

    /// Config file is not valid JSON for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let editor = SheetConfig::editor();
        assert_eq!(editor.page_size, 50);
        assert!(editor.record_cell_edits);
        assert_eq!(editor.history_capacity, 50);

        let preview = SheetConfig::preview();
        assert_eq!(preview.page_size, 20);
        assert!(!preview.record_cell_edits);
        assert_eq!(SheetConfig::default(), editor);
    }

    #[test]
    fn test_builder() {
        let config = SheetConfig::editor()
            .page_size(10)
            .history_capacity(5)
            .detect_duplicates(false)
            .delimiter(b'\t')
            .record_cell_edits(false)
            .export_prefix("out");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.history_capacity, 5);
        assert!(!config.detect_duplicates);
        assert_eq!(config.delimiter, b'\t');
        assert!(!config.record_cell_edits);
        assert_eq!(config.export_prefix, "out");
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            SheetConfig::editor().page_size(0).validate(),
            Err(ConfigError::ZeroPageSize)
        ));
        assert!(matches!(
            SheetConfig::editor().history_capacity(0).validate(),
            Err(ConfigError::ZeroHistoryCapacity)
        ));
        assert!(matches!(
            SheetConfig::editor().delimiter(b'"').validate(),
            Err(ConfigError::InvalidDelimiter('"'))
        ));
    }

    #[test]
    fn test_from_json_partial() {
        let config = SheetConfig::from_json(r#"{"page_size": 10, "delimiter": ";"}"#).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.history_capacity, 50);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            SheetConfig::from_json(r#"{"page_size": 0}"#),
            Err(ConfigError::ZeroPageSize)
        ));
        assert!(matches!(
            SheetConfig::from_json(r#"{"delimiter": "ab"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overlay_keeps_preset_fields() {
        let config = SheetConfig::preview()
            .overlay_json(r#"{"page_size": 30, "export_prefix": "clean"}"#)
            .unwrap();
        assert_eq!(config.page_size, 30);
        assert_eq!(config.export_prefix, "clean");
        assert!(!config.record_cell_edits);
        assert_eq!(config.delimiter, b',');
    }

    #[test]
    fn test_overlay_rejects_non_object() {
        assert!(matches!(
            SheetConfig::editor().overlay_json("[1]"),
            Err(ConfigError::NotAnObject)
        ));
        assert!(matches!(
            SheetConfig::editor().overlay_json(r#"{"history_capacity": 0}"#),
            Err(ConfigError::ZeroHistoryCapacity)
        ));
    }

    #[test]
    fn test_overlay_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheetgrid.json");
        std::fs::write(&path, r#"{"delimiter": "tab"}"#).unwrap();
        let config = SheetConfig::editor().overlay_file(&path).unwrap();
        assert_eq!(config.delimiter, b'\t');
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_json_roundtrip_delimiter() {
        let json = serde_json::to_string(&SheetConfig::editor().delimiter(b'\t')).unwrap();
        assert!(json.contains(r#""delimiter":"\t""#));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = SheetConfig::from_file(Path::new("/nonexistent/sheetgrid.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read config file"));
    }
}
