use std::collections::VecDeque;

use super::snapshot::Snapshot;

/// Default number of snapshots kept
pub const DEFAULT_MAX_ENTRIES: usize = 150;

/// Bounded linear undo/redo history of whole-document snapshots.
///
/// Entry 0 is the oldest retained state and can never be undone past.
/// The cursor is `None` exactly when the history is empty.
#[derive(Debug)]
pub struct HistoryStore {
    entries: VecDeque<Snapshot>,
    cursor: Option<usize>,
    max_entries: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        debug_assert!(max_entries > 0, "history needs room for the initial state");
        Self {
            entries: VecDeque::new(),
            cursor: None,
            max_entries: max_entries.max(1),
        }
    }

    /// Record a new state. Anything after the cursor (the redo branch) is
    /// discarded first; on overflow the oldest entry is evicted and the
    /// cursor stays where it is.
    pub fn push(&mut self, snapshot: Snapshot) {
        if let Some(cursor) = self.cursor {
            if cursor + 1 < self.entries.len() {
                self.entries.truncate(cursor + 1);
            }
        }

        self.entries.push_back(snapshot);

        if self.entries.len() > self.max_entries {
            self.entries.pop_front();
        } else {
            self.cursor = Some(self.cursor.map_or(0, |c| c + 1));
        }
    }

    /// Step back one entry and return the state to restore
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        self.entries.get(cursor - 1)
    }

    /// Step forward one entry and return the state to restore
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        self.entries.get(cursor + 1)
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// The entry the cursor points at
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Number of undo steps currently available
    pub fn undo_levels(&self) -> usize {
        self.cursor.unwrap_or(0)
    }

    /// Number of redo steps currently available
    pub fn redo_levels(&self) -> usize {
        match self.cursor {
            Some(c) => self.entries.len() - c - 1,
            None => 0,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
