//! Single-column sorting.
//!
//! Repeated activation of the same column header cycles
//! none → ascending → descending → none. Activating a different column starts
//! over at ascending on that column and drops the previous one.
//!
//! Sorting is stable in both directions: rows with equal keys keep their
//! relative order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::store::RowStore;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(format!("invalid sort direction: {s:?}")),
        }
    }
}

/// The active sort: a column plus a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column being sorted.
    pub column: String,
    /// Direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates an ascending sort on a column.
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending sort on a column.
    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Applies one header activation to the current sort and returns the next one.
#[must_use]
pub fn cycle(current: Option<&SortSpec>, column: &str) -> Option<SortSpec> {
    match current {
        Some(spec) if spec.column == column => match spec.direction {
            SortDirection::Ascending => Some(SortSpec::descending(column)),
            SortDirection::Descending => None,
        },
        _ => Some(SortSpec::ascending(column)),
    }
}

/// Orders two cell values.
///
/// Values fall into three bands that never interleave: nulls, then anything
/// that reads as a number (compared numerically), then everything else
/// (compared by display string, case-insensitively first and then exactly).
/// Keeping the bands separate makes this a total order even for columns that
/// mix numbers and text.
#[must_use]
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (SortKey::of(a), SortKey::of(b)) {
        (SortKey::Null, SortKey::Null) => Ordering::Equal,
        (SortKey::Null, _) => Ordering::Less,
        (_, SortKey::Null) => Ordering::Greater,
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(&y),
        (SortKey::Number(_), SortKey::Text) => Ordering::Less,
        (SortKey::Text, SortKey::Number(_)) => Ordering::Greater,
        (SortKey::Text, SortKey::Text) => {
            let (x, y) = (a.display(), b.display());
            x.to_lowercase()
                .cmp(&y.to_lowercase())
                .then_with(|| x.cmp(&y))
        }
    }
}

enum SortKey {
    Null,
    Number(f64),
    Text,
}

impl SortKey {
    fn of(value: &Value) -> Self {
        if value.is_null() {
            Self::Null
        } else if let Some(n) = value.as_f64() {
            Self::Number(n)
        } else {
            Self::Text
        }
    }
}

/// Stably sorts row positions of `store` by `spec`.
///
/// An unknown sort column leaves the order untouched.
pub fn sort_indices(store: &RowStore, indices: &mut [usize], spec: &SortSpec) {
    let Some(position) = store.columns().position(&spec.column) else {
        return;
    };
    let key = |i: usize| store.row(i).map(|r| r.get(position));

    indices.sort_by(|&a, &b| {
        let ordering = match (key(a), key(b)) {
            (Some(x), Some(y)) => compare_values(x, y),
            _ => Ordering::Equal,
        };
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
