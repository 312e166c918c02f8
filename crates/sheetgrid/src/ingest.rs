//! Ingestion of processed results from the transformation backend.
//!
//! The backend answers with a JSON object shaped as
//! `{ "rows": [ {column: value, ...}, ... ], "columns": [name, ...], ... }`.
//! Everything besides `rows` and `columns` (chart descriptors, summaries, ...)
//! is opaque to this crate and kept verbatim as [`Metadata`].
//!
//! Ingestion validates the payload against its declared schema instead of
//! trusting arbitrary object shapes downstream:
//!
//! - rows missing a declared column read that cell as null
//! - keys that are not declared columns are dropped
//! - without a (non-empty) `columns` list, columns are inferred from row keys in
//!   order of first appearance

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::{Columns, Record, RowStore};
use crate::value::Value;

/// Opaque data that travels with a table (charts, summaries, ...).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Errors produced while ingesting a backend payload.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The payload is not valid JSON.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload root is not a JSON object.
    #[error("payload must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// The `rows` field is present but not an array.
    #[error("`rows` must be an array, found {0}")]
    RowsNotArray(&'static str),

    /// A row is not a JSON object.
    #[error("row {index} must be an object, found {found}")]
    RowNotAnObject {
        /// Position of the offending row.
        index: usize,
        /// JSON type that was found instead.
        found: &'static str,
    },
}

/// A processed table plus its opaque metadata.
///
/// This is the unit the backend delivers, the unit the session store keeps and
/// the unit the history tracker snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedResult {
    /// The tabular data.
    pub store: RowStore,
    /// Everything else the backend returned.
    #[serde(default)]
    pub metadata: Metadata,
}

impl ProcessedResult {
    /// Creates a result without metadata.
    #[must_use]
    pub fn new(store: RowStore) -> Self {
        Self {
            store,
            metadata: Metadata::new(),
        }
    }

    /// Parses a backend payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] when the text is not JSON or the payload shape is
    /// not an object with an array of object rows.
    pub fn from_json(text: &str) -> Result<Self, IngestError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Builds a result from an already-parsed backend payload.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] when the payload shape is invalid.
    pub fn from_value(value: serde_json::Value) -> Result<Self, IngestError> {
        let mut root = match value {
            serde_json::Value::Object(root) => root,
            other => return Err(IngestError::NotAnObject(json_type(&other))),
        };

        let rows = match root.remove("rows") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(rows)) => rows,
            Some(other) => return Err(IngestError::RowsNotArray(json_type(&other))),
        };

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| match row {
                serde_json::Value::Object(record) => Ok(record),
                other => Err(IngestError::RowNotAnObject {
                    index,
                    found: json_type(&other),
                }),
            })
            .collect::<Result<Vec<Record>, _>>()?;

        let declared: Vec<String> = match root.remove("columns") {
            Some(serde_json::Value::Array(names)) => names
                .into_iter()
                .filter_map(|name| match name {
                    serde_json::Value::String(s) => Some(s),
                    serde_json::Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
            Some(other) if !other.is_null() => {
                warn!(found = json_type(&other), "ignoring non-array `columns`");
                Vec::new()
            }
            _ => Vec::new(),
        };

        let columns = if declared.is_empty() {
            infer_columns(&records)
        } else {
            Columns::new(declared)
        };

        let store = records_to_store(columns, records);
        debug!(
            rows = store.len(),
            columns = store.columns().len(),
            metadata_keys = root.len(),
            "ingested processed result"
        );

        Ok(Self {
            store,
            metadata: root,
        })
    }
}

/// Builds a store from name-keyed records, validated against `columns`.
#[must_use]
pub fn records_to_store(columns: Columns, records: Vec<Record>) -> RowStore {
    let mut store = RowStore::new(columns);
    let mut dropped = 0usize;
    for mut record in records {
        let values = store
            .columns()
            .iter()
            .map(|name| record.remove(name).map_or(Value::Null, Value::from_json))
            .collect();
        dropped += record.len();
        store.push(values);
    }
    if dropped > 0 {
        debug!(dropped, "dropped cells for undeclared columns");
    }
    store
}

fn infer_columns(records: &[Record]) -> Columns {
    let mut names: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key);
            }
        }
    }
    Columns::new(names)
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
