use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace};

/// Undo depth used when no explicit length is configured
pub const DEFAULT_HISTORY_LENGTH: usize = 10_000;

type ChangeHandler<T> = Box<dyn FnMut(&T)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// A history must keep at least one undo step
    InvalidLength(usize),
}

impl std::error::Error for HistoryError {}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::InvalidLength(n) => {
                write!(f, "invalid history length {}: must be at least 1", n)
            }
        }
    }
}

/// Linear undo/redo history over snapshots of `T`.
///
/// Snapshots are kept oldest at the front, newest at the back. The cursor
/// points at the current snapshot; undo moves it towards the front and redo
/// towards the back. At most `history_length` snapshots are kept before the
/// current one, older ones are dropped for good.
///
/// Every move of the cursor is reported to the change handler with the new
/// current value. Moves that go nowhere (undo at the oldest snapshot, redo at
/// the newest) are silent.
pub struct History<T> {
    /// **Invariant**: never empty
    entries: VecDeque<T>,
    /// **Invariant**: `cursor < entries.len()`
    cursor: usize,
    history_length: usize,
    on_change: Option<ChangeHandler<T>>,
}

impl<T> History<T> {
    /// Create a history with the default length
    pub fn new(initial: T, on_change: impl FnMut(&T) + 'static) -> Self {
        Self::with_parts(initial, DEFAULT_HISTORY_LENGTH, Some(Box::new(on_change)))
    }

    pub fn builder(initial: T) -> HistoryBuilder<T> {
        HistoryBuilder::new(initial)
    }

    fn with_parts(initial: T, history_length: usize, on_change: Option<ChangeHandler<T>>) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            history_length,
            on_change,
        }
    }

    /// Record a new snapshot, discarding anything that could have been redone
    pub fn push(&mut self, value: T) -> &mut Self {
        let discarded = self.redo_depth();
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(value);

        let mut evicted = 0;
        while self.entries.len() > self.capacity() {
            self.entries.pop_front();
            evicted += 1;
        }
        self.cursor = self.entries.len() - 1;

        trace!(discarded, evicted, len = self.entries.len(), "history push");
        self.notify();
        self
    }

    /// Step back one snapshot, if there is one
    pub fn undo(&mut self) -> &mut Self {
        if !self.can_undo() {
            trace!("undo at oldest snapshot ignored");
            return self;
        }
        self.cursor -= 1;
        debug!(cursor = self.cursor, "history undo");
        self.notify();
        self
    }

    /// Step forward one snapshot, if there is one
    pub fn redo(&mut self) -> &mut Self {
        if !self.can_redo() {
            trace!("redo at newest snapshot ignored");
            return self;
        }
        self.cursor += 1;
        debug!(cursor = self.cursor, "history redo");
        self.notify();
        self
    }

    /// Drop every snapshot and start over from `value`
    pub fn reset(&mut self, value: T) -> &mut Self {
        self.entries.clear();
        self.entries.push_back(value);
        self.cursor = 0;
        debug!("history reset");
        self.notify();
        self
    }

    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of snapshots before the current one
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots after the current one
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - self.cursor - 1
    }

    /// Number of retained snapshots, the current one included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn history_length(&self) -> usize {
        self.history_length
    }

    // current snapshot plus `history_length` undo steps
    fn capacity(&self) -> usize {
        self.history_length.saturating_add(1)
    }

    fn notify(&mut self) {
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.entries[self.cursor]);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("entries", &self.entries)
            .field("cursor", &self.cursor)
            .field("history_length", &self.history_length)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`History`] with a non-default length
pub struct HistoryBuilder<T> {
    initial: T,
    history_length: usize,
    on_change: Option<ChangeHandler<T>>,
}

impl<T> HistoryBuilder<T> {
    pub fn new(initial: T) -> Self {
        Self {
            initial,
            history_length: DEFAULT_HISTORY_LENGTH,
            on_change: None,
        }
    }

    pub fn history_length(mut self, history_length: usize) -> Self {
        self.history_length = history_length;
        self
    }

    pub fn on_change(mut self, on_change: impl FnMut(&T) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn build(self) -> Result<History<T>, HistoryError> {
        if self.history_length == 0 {
            return Err(HistoryError::InvalidLength(self.history_length));
        }
        Ok(History::with_parts(self.initial, self.history_length, self.on_change))
    }
}

#[cfg(test)]
mod test;
