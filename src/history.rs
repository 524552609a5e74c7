//! Undo/redo history as two bounded stacks of graph snapshots.
//!
//! Snapshots are value copies, never references into the working graph. Each
//! stack holds at most `limit` entries; the oldest is evicted first.

use crate::constants::MAX_UNDO_HISTORY;
use crate::types::Snapshot;
use std::collections::VecDeque;

/// Which history stack an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stack {
    /// States that can be returned to with undo
    Past,
    /// States that can be returned to with redo
    Future,
}

/// Manages undo/redo history for one editor instance.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: VecDeque<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    /// Creates an empty history keeping at most `limit` snapshots per stack.
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    fn stack_mut(&mut self, which: Stack) -> &mut VecDeque<Snapshot> {
        match which {
            Stack::Past => &mut self.past,
            Stack::Future => &mut self.future,
        }
    }

    /// Pushes `current` onto `target`, first emptying `clear` if given.
    ///
    /// Mutations call `snapshot(current, Stack::Past, Some(Stack::Future))`
    /// before changing anything, which keeps history linear.
    pub fn snapshot(&mut self, current: Snapshot, target: Stack, clear: Option<Stack>) {
        if let Some(clear) = clear {
            self.stack_mut(clear).clear();
        }
        let limit = self.limit;
        let stack = self.stack_mut(target);
        stack.push_back(current);
        while stack.len() > limit {
            stack.pop_front();
        }
    }

    /// Records the state before a fresh mutation and invalidates redo.
    pub fn record(&mut self, current: Snapshot) {
        self.snapshot(current, Stack::Past, Some(Stack::Future));
    }

    /// Steps back one state.
    ///
    /// # Arguments
    ///
    /// * `current` - The state being left; it becomes redoable
    ///
    /// # Returns
    ///
    /// The state to restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.snapshot(current, Stack::Future, None);
        Some(previous)
    }

    /// Steps forward one state.
    ///
    /// # Returns
    ///
    /// The state to restore, or `None` if there is nothing to redo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop_back()?;
        self.snapshot(current, Stack::Past, None);
        Some(next)
    }

    /// Returns true if there are states that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns true if there are states that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undoable states.
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of redoable states.
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Clears all undo and redo history.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
