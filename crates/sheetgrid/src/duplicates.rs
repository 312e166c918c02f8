//! Duplicate row detection.
//!
//! Two rows are duplicates when their display strings agree in every declared
//! column (case-sensitive; null and empty text are the same). Detection always
//! runs over the full table, never over a filtered or paginated view, and every
//! member of a group of identical rows is reported.

use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::store::RowStore;

/// Positions (into the full, unfiltered store) of rows that have a duplicate.
pub type DuplicateSet = BTreeSet<usize>;

/// Computes the duplicate set of `store`.
///
/// Returns an empty set when `enabled` is false.
#[must_use]
pub fn detect(store: &RowStore, enabled: bool) -> DuplicateSet {
    if !enabled {
        return DuplicateSet::new();
    }

    let mut groups: HashMap<Vec<String>, Vec<usize>> = HashMap::with_capacity(store.len());
    for (index, row) in store.rows().iter().enumerate() {
        groups.entry(row.display_tuple()).or_default().push(index);
    }

    let duplicates: DuplicateSet = groups
        .into_values()
        .filter(|members| members.len() > 1)
        .flatten()
        .collect();
    trace!(rows = store.len(), duplicates = duplicates.len(), "detected duplicates");
    duplicates
}
