//! Snapshot history for the stylesheet text
//!
//! A single list of full-text snapshots with a cursor pointing at the entry
//! that matches the current text. Undo and redo only move the cursor; a new
//! snapshot pushed while the cursor is not at the tail discards the redo tail.

use log::debug;

/// Default number of snapshots kept before the oldest is evicted.
pub const DEFAULT_CAPACITY: usize = 200;

/// Ordered stylesheet snapshots with a cursor.
///
/// Invariants:
/// - no two consecutive entries are equal
/// - `cursor < entries.len()` whenever entries is non-empty
/// - navigation never appends
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<String>,
    cursor: usize,
    /// Set while a snapshot is being written back; pushes are ignored.
    replaying: bool,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStack {
    /// Create an empty history. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            replaying: false,
            capacity: capacity.max(1),
        }
    }

    /// Record a snapshot.
    ///
    /// Ignored while replaying or when `text` equals the entry at the cursor.
    /// Returns `true` if a snapshot was appended.
    pub fn push(&mut self, text: &str) -> bool {
        if self.replaying {
            return false;
        }
        if self.current() == Some(text) {
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(text.to_string());

        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;

        debug!(
            "History snapshot pushed ({} entries, cursor {})",
            self.entries.len(),
            self.cursor
        );
        true
    }

    /// Step back one snapshot. `None` at the first entry.
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step forward one snapshot. `None` at the tail.
    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Mark the start of a restore; pushes are ignored until [`end_replay`](Self::end_replay).
    pub fn begin_replay(&mut self) {
        self.replaying = true;
    }

    pub fn end_replay(&mut self) {
        self.replaying = false;
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Drop every snapshot (used when a different project is opened).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.replaying = false;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_then_undo_redo() {
        let mut history = HistoryStack::default();
        history.push("A");
        history.push("B");
        history.push("C");

        assert_eq!(history.undo(), Some("B"));
        assert_eq!(history.undo(), Some("A"));
        assert_eq!(history.undo(), None);
        assert_eq!(history.cursor(), 0);

        assert_eq!(history.redo(), Some("B"));
        assert_eq!(history.redo(), Some("C"));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_push_off_tail_truncates_redo() {
        let mut history = HistoryStack::default();
        history.push("A");
        history.push("B");
        history.push("C");
        history.undo();

        assert!(history.push("D"));
        assert_eq!(history.len(), 3);
        assert_eq!(history.current(), Some("D"));
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some("B"));
    }

    #[test]
    fn test_push_equal_to_current_is_ignored() {
        let mut history = HistoryStack::default();
        assert!(history.push("A"));
        assert!(!history.push("A"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_push_equal_to_current_after_undo_keeps_redo() {
        let mut history = HistoryStack::default();
        history.push("A");
        history.push("B");
        history.undo();

        assert!(!history.push("A"));
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some("B"));
    }

    #[test]
    fn test_push_ignored_while_replaying() {
        let mut history = HistoryStack::default();
        history.push("A");
        history.push("B");
        let _ = history.undo();

        history.begin_replay();
        assert!(!history.push("A restored"));
        history.end_replay();

        assert_eq!(history.len(), 2);
        assert!(history.can_redo());
    }

    #[test]
    fn test_undo_redo_on_empty() {
        let mut history = HistoryStack::default();
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), None);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = HistoryStack::new(3);
        for text in ["A", "B", "C", "D"] {
            history.push(text);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.undo(), Some("C"));
        assert_eq!(history.undo(), Some("B"));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_no_consecutive_duplicates() {
        let mut history = HistoryStack::default();
        for text in ["A", "A", "B", "B", "A"] {
            history.push(text);
        }
        assert_eq!(history.len(), 3);
    }
}
