//! Snapshot-based undo history of a single document.

use std::collections::VecDeque;

use serde_json::Value;

/// The undo history of one document, stored as a sequence of snapshots.
///
/// Moving back through the history is as simple as reading a different snapshot; every edit
/// drops the snapshots ahead of the current one (the redo stack) and pushes a new one.
#[derive(Debug, Clone)]
pub struct History {
    /// Every snapshot of the document, oldest at the 'front' and newest at the 'back'.
    ///
    /// **Invariant**: This must always be non-empty.
    snapshots: VecDeque<Value>,
    /// The index (within `self.snapshots`) of the current snapshot.  Undo decrements this
    /// counter, whilst redo increments it.
    ///
    /// **Invariant**: `index < snapshots.len()`
    index: usize,
    /// The maximum number of undo steps which can be recorded.  Once this limit is exceeded,
    /// the oldest snapshots are dropped.
    max_undo_depth: usize,
}

impl History {
    /// Creates a new `History` containing only one snapshot
    pub fn new(value: Value, max_undo_depth: usize) -> Self {
        let mut snapshots = VecDeque::new();
        snapshots.push_back(value);
        History {
            snapshots,
            index: 0,
            max_undo_depth,
        }
    }

    /// The currently visible snapshot
    pub fn current(&self) -> &Value {
        // `index` is always a valid index into the non-empty `snapshots`
        &self.snapshots[self.index]
    }

    /// Makes `value` the current snapshot, discarding anything that could have been redone
    pub fn commit(&mut self, value: Value) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(value);
        while self.snapshots.len() > self.max_undo_depth + 1 {
            self.snapshots.pop_front();
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Move one step back in the history, returning `false` if there are no more changes
    pub fn undo(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Move one step forward in the history, returning `false` if there was no change to be
    /// redone
    pub fn redo(&mut self) -> bool {
        if self.index + 1 < self.snapshots.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// How many times [`History::undo`] can succeed in a row
    pub fn undo_depth(&self) -> usize {
        self.index
    }

    /// How many times [`History::redo`] can succeed in a row
    pub fn redo_depth(&self) -> usize {
        self.snapshots.len() - 1 - self.index
    }
}
