//! Bounded linear undo/redo buffer.
//!
//! Holds the present state, a capped stack of past states, and the states
//! undone since the last edit. Recording a new state discards the redo
//! branch. The buffer is a plain value owned by whoever edits the state.

use std::collections::VecDeque;

/// Maximum number of past states kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: Vec<T>,
    capacity: usize,
}

impl<T> History<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    /// A history that keeps at most `capacity` past states; the oldest are
    /// dropped first.
    #[must_use]
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        Self { past: VecDeque::new(), present: initial, future: Vec::new(), capacity }
    }

    #[must_use]
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Make `state` the present. The previous present becomes undoable and
    /// any redo branch is discarded.
    pub fn record(&mut self, state: T) {
        let previous = std::mem::replace(&mut self.present, state);
        self.past.push_back(previous);
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Step back one state. Returns the new present, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<&T> {
        let previous = self.past.pop_back()?;
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        Some(&self.present)
    }

    /// Re-apply the most recently undone state.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.future.pop()?;
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        Some(&self.present)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
