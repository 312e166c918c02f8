//! Row Store: the authoritative in-memory table being edited.
//!
//! The store carries its schema alongside the data: a [`Columns`] list of unique
//! names and one [`Row`] per record holding exactly one [`Value`] per declared
//! column. Rows are addressed by their current position in the store.
//!
//! # Example
//!
//! ```rust
//! use sheetgrid::store::{Columns, RowStore};
//! use sheetgrid::Value;
//!
//! let mut store = RowStore::new(Columns::new(["name", "amount"]));
//! store.push(vec![Value::text("Alice"), Value::from(100)]);
//! store.push(vec![Value::text("Bob")]); // missing cells become null
//!
//! assert_eq!(store.get(1, "amount"), Some(&Value::Null));
//! assert!(store.set(1, "amount", Value::text("200")));
//! assert_eq!(store.get(1, "amount").unwrap().display(), "200");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::value::Value;

/// A record as exchanged with the embedding application: column name to JSON.
pub type Record = serde_json::Map<String, serde_json::Value>;

static NULL: Value = Value::Null;

/// Ordered list of unique column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Columns {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Columns {
    /// Creates a column list. Repeated names keep their first occurrence.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = Self::default();
        for name in names {
            let name = name.into();
            if columns.positions.contains_key(&name) {
                warn!(column = %name, "duplicate column name ignored");
                continue;
            }
            columns.positions.insert(name.clone(), columns.names.len());
            columns.names.push(name);
        }
        columns
    }

    /// Returns the column names in declaration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the position of a column.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Returns whether the column is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether no columns are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the column names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for Columns {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<Columns> for Vec<String> {
    fn from(columns: Columns) -> Self {
        columns.names
    }
}

/// One record, holding a value per declared column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from values in column order.
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Returns the value at a column position. Missing cells read as null.
    #[must_use]
    pub fn get(&self, position: usize) -> &Value {
        self.values.get(position).unwrap_or(&NULL)
    }

    /// Returns the values in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the display strings of all cells in column order.
    #[must_use]
    pub fn display_tuple(&self) -> Vec<String> {
        self.values.iter().map(|v| v.display().into_owned()).collect()
    }

    fn fit(mut self, width: usize) -> Self {
        self.values.resize(width, Value::Null);
        self
    }
}

/// The authoritative table: a schema plus its rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowStore {
    columns: Columns,
    rows: Vec<Row>,
}

impl RowStore {
    /// Creates an empty store with the given columns.
    #[must_use]
    pub fn new(columns: Columns) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a store from rows given in column order.
    ///
    /// Short rows are padded with null, long rows are truncated, so every row
    /// agrees with the column set.
    #[must_use]
    pub fn from_rows(columns: Columns, rows: Vec<Vec<Value>>) -> Self {
        let mut store = Self::new(columns);
        for values in rows {
            store.push(values);
        }
        store
    }

    /// Appends a row given in column order.
    pub fn push(&mut self, values: Vec<Value>) {
        let width = self.columns.len();
        self.rows.push(Row::new(values).fit(width));
    }

    /// Returns the column set.
    #[must_use]
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Returns all rows.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the row at a position.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the value at (row, column).
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let position = self.columns.position(column)?;
        self.rows.get(row).map(|r| r.get(position))
    }

    /// Overwrites a single cell. Returns false when the cell does not exist.
    pub fn set(&mut self, row: usize, column: &str, value: Value) -> bool {
        let Some(position) = self.columns.position(column) else {
            return false;
        };
        match self.rows.get_mut(row).and_then(|r| r.values.get_mut(position)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Replaces the whole table atomically.
    pub fn replace(&mut self, other: Self) {
        *self = other;
    }

    /// Converts the rows back to name-keyed records.
    #[must_use]
    pub fn to_records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.to_string(), row.get(i).to_json()))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> RowStore {
        RowStore::from_rows(
            Columns::new(["name", "amount", "Status"]),
            vec![
                vec![Value::text("Alice"), Value::from(100), Value::text("Open")],
                vec![Value::text("Bob"), Value::from(200), Value::text("Open")],
                vec![Value::text("Cara"), Value::from(300), Value::text("Open")],
            ],
        )
    }

    #[test]
    fn test_columns_dedupe() {
        let columns = Columns::new(["a", "b", "a"]);
        assert_eq!(columns.names(), ["a", "b"]);
        assert_eq!(columns.position("b"), Some(1));
        assert!(!columns.contains("c"));
    }

    #[test]
    fn test_rows_fit_columns() {
        let store = RowStore::from_rows(
            Columns::new(["a", "b"]),
            vec![
                vec![Value::from(1)],
                vec![Value::from(1), Value::from(2), Value::from(3)],
            ],
        );
        assert_eq!(store.row(0).unwrap().values().len(), 2);
        assert_eq!(store.row(1).unwrap().values().len(), 2);
        assert_eq!(store.get(0, "b"), Some(&Value::Null));
    }

    #[test]
    fn test_get_unknown() {
        let store = sample();
        assert_eq!(store.get(0, "missing"), None);
        assert_eq!(store.get(10, "name"), None);
    }

    #[test]
    fn test_set_single_cell() {
        let mut store = sample();
        let before = store.clone();
        assert!(store.set(2, "Status", Value::text("Closed")));

        for (i, row) in store.rows().iter().enumerate() {
            for (j, value) in row.values().iter().enumerate() {
                if (i, j) == (2, 2) {
                    assert_eq!(value, &Value::text("Closed"));
                } else {
                    assert_eq!(value, before.row(i).unwrap().get(j));
                }
            }
        }
    }

    #[test]
    fn test_set_out_of_range() {
        let mut store = sample();
        assert!(!store.set(5, "name", Value::text("x")));
        assert!(!store.set(0, "nope", Value::text("x")));
        assert_eq!(store, sample());
    }

    #[test]
    fn test_to_records() {
        let records = sample().to_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["name"], json!("Alice"));
        assert_eq!(records[0]["amount"], json!(100));
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, ["name", "amount", "Status"]);
    }

    #[test]
    fn test_serde_shape() {
        let store = RowStore::from_rows(Columns::new(["a"]), vec![vec![Value::from(1)]]);
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json, json!({"columns": ["a"], "rows": [[1]]}));
        let back: RowStore = serde_json::from_value(json).unwrap();
        assert_eq!(back, store);
    }
}
