//! History Tracker: single-path backward undo over recorded states.
//!
//! The tracker keeps an ordered list of owned snapshots plus a cursor pointing
//! at the snapshot that matches what is currently displayed.
//!
//! - [`History::record`] ignores a state equal to the one at the cursor;
//!   otherwise it drops everything after the cursor, appends a copy of the
//!   state and moves the cursor onto it, evicting the oldest snapshot once
//!   the capacity is exceeded.
//! - [`History::undo`] moves the cursor back one step and returns a copy of
//!   that snapshot; at the first snapshot it does nothing.
//!
//! There is no redo: the only way forward after an undo is a new `record`,
//! which discards the undone future.
//!
//! # Example
//!
//! ```rust
//! use sheetgrid::history::History;
//!
//! let mut history = History::new(50);
//! history.record(&"s0".to_string());
//! history.record(&"s1".to_string());
//! history.record(&"s2".to_string());
//!
//! assert_eq!(history.undo().as_deref(), Some("s1"));
//! assert_eq!(history.undo().as_deref(), Some("s0"));
//! assert_eq!(history.undo(), None);
//! ```

use std::collections::VecDeque;

use tracing::trace;

/// Default maximum number of snapshots kept.
pub const DEFAULT_CAPACITY: usize = 50;

/// Bounded undo history.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<T> History<T> {
    /// Creates an empty history holding at most `capacity` snapshots (min 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            cursor: 0,
            capacity,
        }
    }

    /// Returns the number of snapshots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of snapshots held.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.cursor)
    }

    /// Iterates over all held snapshots, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Returns whether [`undo`](Self::undo) would move the cursor.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Drops every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

impl<T: Clone + PartialEq> History<T> {
    /// Records a copy of `state`. Returns false when it equals the snapshot at
    /// the cursor and nothing was recorded.
    pub fn record(&mut self, state: &T) -> bool {
        if self.current() == Some(state) {
            return false;
        }

        if !self.entries.is_empty() {
            let dropped = self.entries.len() - (self.cursor + 1);
            if dropped > 0 {
                trace!(dropped, "discarding undone history");
            }
            self.entries.truncate(self.cursor + 1);
        }

        self.entries.push_back(state.clone());
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            trace!(capacity = self.capacity, "evicted oldest history entry");
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Steps back one snapshot and returns a copy of it.
    ///
    /// Returns `None`, leaving the cursor in place, when already at the first
    /// snapshot.
    pub fn undo(&mut self) -> Option<T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        trace!(cursor = self.cursor, "undo");
        self.entries.get(self.cursor).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded(states: &[&str]) -> History<String> {
        let mut h = History::new(DEFAULT_CAPACITY);
        for s in states {
            h.record(&(*s).to_string());
        }
        h
    }

    #[test]
    fn test_undo_steps_back() {
        let mut h = recorded(&["s0", "s1", "s2"]);
        assert_eq!(h.undo().as_deref(), Some("s1"));
        assert_eq!(h.current().map(String::as_str), Some("s1"));
        assert_eq!(h.undo().as_deref(), Some("s0"));
        assert_eq!(h.undo(), None);
        assert_eq!(h.current().map(String::as_str), Some("s0"));
    }

    #[test]
    fn test_record_truncates_future() {
        let mut h = recorded(&["s0", "s1", "s2"]);
        h.undo();
        assert!(h.record(&"s3".to_string()));
        let all: Vec<&str> = h.entries().map(String::as_str).collect();
        assert_eq!(all, ["s0", "s1", "s3"]);
        assert_eq!(h.undo().as_deref(), Some("s1"));
    }

    #[test]
    fn test_record_equal_state_is_ignored() {
        let mut h = recorded(&["s0"]);
        assert!(!h.record(&"s0".to_string()));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_record_equal_to_current_after_undo_keeps_future() {
        let mut h = recorded(&["s0", "s1"]);
        h.undo();
        assert!(!h.record(&"s0".to_string()));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut h = History::new(3);
        for i in 0..5 {
            h.record(&i);
        }
        let all: Vec<i32> = h.entries().copied().collect();
        assert_eq!(all, [2, 3, 4]);
        assert_eq!(h.cursor(), 2);
        assert_eq!(h.current(), Some(&4));
    }

    #[test]
    fn test_empty_history() {
        let mut h: History<i32> = History::default();
        assert!(h.is_empty());
        assert_eq!(h.capacity(), DEFAULT_CAPACITY);
        assert_eq!(h.undo(), None);
        assert_eq!(h.current(), None);
    }

    #[test]
    fn test_undo_returns_owned_copy() {
        let mut h = History::new(10);
        h.record(&vec![1]);
        h.record(&vec![1, 2]);
        let mut restored = h.undo().unwrap();
        restored.push(99);
        assert_eq!(h.current(), Some(&vec![1]));
    }

    #[test]
    fn test_clear() {
        let mut h = recorded(&["a", "b"]);
        h.clear();
        assert!(h.is_empty());
        assert!(!h.can_undo());
    }
}
