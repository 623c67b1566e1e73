//! Command history ledger.
//!
//! Holds submitted lines newest-first with a browse cursor. The cursor is
//! `None` when nothing is selected (the "fresh input" position).

use crate::config::MAX_COMMAND_HISTORY;
use crate::utils::RingBuffer;

/// Browse direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Older,
    Newer,
}

#[derive(Clone, Debug)]
pub struct History {
    entries: RingBuffer<String>,
    cursor: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_COMMAND_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::new(capacity),
            cursor: None,
        }
    }

    /// Rebuild a ledger from persisted entries, newest first.
    ///
    /// Entries beyond `capacity` (the oldest) are dropped.
    pub fn from_entries(newest_first: Vec<String>, capacity: usize) -> Self {
        let mut history = Self::with_capacity(capacity);
        for line in newest_first.into_iter().take(history.entries.capacity()).rev() {
            history.entries.push(line);
        }
        history
    }

    /// Record a submitted line and reset the cursor.
    ///
    /// A line equal to the newest entry is not recorded again.
    pub fn record(&mut self, line: &str) {
        self.cursor = None;
        if self.entries.latest().is_some_and(|newest| newest == line) {
            return;
        }
        self.entries.push(line.to_string());
    }

    /// Move the cursor and return the selected line.
    ///
    /// Returns an empty string once the cursor walks back past the newest
    /// entry. The cursor stops at the oldest entry.
    pub fn browse(&mut self, direction: Direction) -> String {
        self.cursor = match (direction, self.cursor) {
            (Direction::Older, None) if !self.entries.is_empty() => Some(0),
            (Direction::Older, Some(i)) if i + 1 < self.entries.len() => Some(i + 1),
            (Direction::Newer, Some(0)) => None,
            (Direction::Newer, Some(i)) => Some(i - 1),
            (_, unchanged) => unchanged,
        };
        self.selected().unwrap_or_default().to_string()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected(&self) -> Option<&str> {
        self.cursor
            .and_then(|i| self.entries.recent(i))
            .map(String::as_str)
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn newest(&self) -> Option<&str> {
        self.entries.latest().map(String::as_str)
    }

    /// All entries, newest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_adjacent_duplicates_collapse() {
        let mut history = History::new();
        history.record("ls");
        history.record("ls");
        history.record("cd x");
        assert_eq!(history.entries(), vec!["cd x", "ls"]);

        // Only adjacent duplicates collapse.
        history.record("ls");
        assert_eq!(history.entries(), vec!["ls", "cd x", "ls"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new();
        for i in 0..=MAX_COMMAND_HISTORY {
            history.record(&format!("cmd {}", i));
        }
        assert_eq!(history.len(), MAX_COMMAND_HISTORY);
        assert_eq!(history.newest(), Some("cmd 1000"));
        assert_eq!(history.entries().last().map(String::as_str), Some("cmd 1"));
    }

    #[test]
    fn test_browse_walks_and_clamps() {
        let mut history = History::new();
        history.record("a");
        history.record("b");

        assert_eq!(history.browse(Direction::Older), "b");
        assert_eq!(history.browse(Direction::Older), "a");
        assert_eq!(history.browse(Direction::Older), "a");
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.browse(Direction::Newer), "b");
        assert_eq!(history.browse(Direction::Newer), "");
        assert_eq!(history.cursor(), None);
        assert_eq!(history.browse(Direction::Newer), "");
    }

    #[test]
    fn test_browse_empty() {
        let mut history = History::new();
        assert_eq!(history.browse(Direction::Older), "");
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn test_record_resets_cursor() {
        let mut history = History::new();
        history.record("a");
        history.browse(Direction::Older);
        history.record("a");
        assert_eq!(history.cursor(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_from_entries_keeps_newest() {
        let saved = vec!["c".to_string(), "b".to_string(), "a".to_string()];
        let history = History::from_entries(saved, 2);
        assert_eq!(history.entries(), vec!["c", "b"]);
        assert_eq!(history.newest(), Some("c"));
    }
}
