//! Text filtering for table views.
//!
//! Two kinds of filters combine with AND semantics:
//!
//! - **Column filters**: one term per column; a row must match every one.
//! - **Global filter**: a single term; a row matches when *any* of its cells does.
//!
//! Matching is a case-insensitive substring test on the display string of a
//! cell. An empty term matches everything; a null cell never matches a
//! non-empty term.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::{Columns, Row};
use crate::value::Value;

fn contains_lower(value: &Value, term_lower: &str) -> bool {
    !value.is_null() && value.display().to_lowercase().contains(term_lower)
}

/// The active column filters and global filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    columns: BTreeMap<String, String>,
    global: String,
}

impl Filters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter term of a column. An empty term removes the filter.
    pub fn set_column(&mut self, column: impl Into<String>, term: impl Into<String>) {
        let (column, term) = (column.into(), term.into());
        if term.is_empty() {
            self.columns.remove(&column);
        } else {
            self.columns.insert(column, term);
        }
    }

    /// Removes the filter of a column.
    pub fn clear_column(&mut self, column: &str) {
        self.columns.remove(column);
    }

    /// Returns the filter term of a column.
    #[must_use]
    pub fn column(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// Iterates over `(column, term)` pairs.
    pub fn column_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(c, t)| (c.as_str(), t.as_str()))
    }

    /// Sets the global filter term.
    pub fn set_global(&mut self, term: impl Into<String>) {
        self.global = term.into();
    }

    /// Returns the global filter term.
    #[must_use]
    pub fn global(&self) -> &str {
        &self.global
    }

    /// Removes every filter.
    pub fn clear(&mut self) {
        self.columns.clear();
        self.global.clear();
    }

    /// Returns whether any filter restricts the view.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.columns.is_empty() || !self.global.is_empty()
    }

    /// Prepares a matcher for rows of a table with the given columns.
    ///
    /// Filters on columns the table does not declare are ignored.
    #[must_use]
    pub fn matcher(&self, columns: &Columns) -> RowMatcher {
        let column_terms = self
            .columns
            .iter()
            .filter_map(|(name, term)| columns.position(name).map(|p| (p, term.to_lowercase())))
            .collect();
        RowMatcher {
            column_terms,
            global: (!self.global.is_empty()).then(|| self.global.to_lowercase()),
        }
    }
}

/// Filters resolved against a column set, ready to test rows.
#[derive(Debug, Clone)]
pub struct RowMatcher {
    column_terms: Vec<(usize, String)>,
    global: Option<String>,
}

impl RowMatcher {
    /// Returns whether the row passes every column filter and the global filter.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        let columns_ok = self
            .column_terms
            .iter()
            .all(|(position, term)| contains_lower(row.get(*position), term));
        if !columns_ok {
            return false;
        }
        match &self.global {
            None => true,
            Some(term) => row.values().iter().any(|v| contains_lower(v, term)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[Value]) -> Row {
        Row::new(values.to_vec())
    }

    fn matches(value: &Value, term: &str) -> bool {
        let mut filters = Filters::new();
        filters.set_column("a", term);
        filters
            .matcher(&Columns::new(["a"]))
            .matches(&row(&[value.clone()]))
    }

    #[test]
    fn test_matches_case_insensitive() {
        assert!(matches(&Value::text("Alice"), "ali"));
        assert!(matches(&Value::text("alice"), "ALI"));
        assert!(matches(&Value::from(1200), "20"));
        assert!(!matches(&Value::text("Bob"), "ali"));
    }

    #[test]
    fn test_null_and_empty_terms() {
        assert!(matches(&Value::Null, ""));
        assert!(!matches(&Value::Null, "a"));
        assert!(matches(&Value::text("x"), ""));
    }

    #[test]
    fn test_set_column_empty_removes() {
        let mut filters = Filters::new();
        filters.set_column("name", "al");
        assert_eq!(filters.column("name"), Some("al"));
        filters.set_column("name", "");
        assert_eq!(filters.column("name"), None);
        assert!(!filters.is_active());
    }

    #[test]
    fn test_column_filters_and() {
        let columns = Columns::new(["name", "city"]);
        let mut filters = Filters::new();
        filters.set_column("name", "a");
        filters.set_column("city", "par");
        let m = filters.matcher(&columns);

        assert!(m.matches(&row(&[Value::text("Anna"), Value::text("Paris")])));
        assert!(!m.matches(&row(&[Value::text("Anna"), Value::text("Rome")])));
        assert!(!m.matches(&row(&[Value::text("Bob"), Value::text("Paris")])));
    }

    #[test]
    fn test_global_filter_or_across_columns() {
        let columns = Columns::new(["name", "city"]);
        let mut filters = Filters::new();
        filters.set_global("rom");
        let m = filters.matcher(&columns);

        assert!(m.matches(&row(&[Value::text("Romeo"), Value::text("Oslo")])));
        assert!(m.matches(&row(&[Value::text("Anna"), Value::text("Rome")])));
        assert!(!m.matches(&row(&[Value::text("Anna"), Value::Null])));
    }

    #[test]
    fn test_unknown_column_filter_ignored() {
        let columns = Columns::new(["name"]);
        let mut filters = Filters::new();
        filters.set_column("ghost", "x");
        assert!(filters.matcher(&columns).matches(&row(&[Value::text("a")])));
    }

    #[test]
    fn test_null_cell_fails_column_filter() {
        let columns = Columns::new(["name"]);
        let mut filters = Filters::new();
        filters.set_column("name", "a");
        assert!(!filters.matcher(&columns).matches(&row(&[Value::Null])));
    }
}
