//! Undo log for backtrackable trail state
//!
//! Every change to the trail is recorded before it happens. `push` remembers
//! the current log length; `pop` hands back the records made since then,
//! newest first, so the caller can reverse them in strict LIFO order.

use crate::error::{Result, TrailError};

/// A reversible change to the trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undo {
    /// The active flag of entry `entry` was overwritten; it used to be `was_active`
    Deactivate { entry: usize, was_active: bool },
    /// An entry was appended
    Append,
}

#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    log: Vec<Undo>,
    scopes: Vec<usize>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change. Outside of any scope there is nothing to undo to,
    /// so the record is dropped.
    #[inline]
    pub fn record(&mut self, undo: Undo) {
        if !self.scopes.is_empty() {
            self.log.push(undo);
        }
    }

    /// Save the current position
    pub fn push(&mut self) {
        self.scopes.push(self.log.len());
    }

    /// Close `num_scopes` scopes, returning the records to reverse, newest first
    pub fn pop(&mut self, num_scopes: usize) -> Result<Vec<Undo>> {
        if num_scopes > self.scopes.len() {
            return Err(TrailError::ScopeUnderflow {
                requested: num_scopes,
                open: self.scopes.len(),
            });
        }
        if num_scopes == 0 {
            return Ok(Vec::new());
        }
        let keep = self.scopes.len() - num_scopes;
        let mark = self.scopes[keep];
        self.scopes.truncate(keep);
        let mut undone = self.log.split_off(mark);
        undone.reverse();
        Ok(undone)
    }

    pub fn scope_level(&self) -> usize {
        self.scopes.len()
    }

    /// Number of pending records
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_outside_scope_are_dropped() {
        let mut log = UndoLog::new();
        log.record(Undo::Append);
        assert!(log.is_empty());
    }

    #[test]
    fn test_pop_returns_newest_first() {
        let mut log = UndoLog::new();
        log.push();
        log.record(Undo::Append);
        log.record(Undo::Deactivate { entry: 0, was_active: true });

        let undone = log.pop(1).unwrap();
        assert_eq!(
            undone,
            vec![Undo::Deactivate { entry: 0, was_active: true }, Undo::Append]
        );
        assert_eq!(log.scope_level(), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_nested_scopes() {
        let mut log = UndoLog::new();
        log.push();
        log.record(Undo::Append);
        log.push();
        log.record(Undo::Deactivate { entry: 3, was_active: true });

        let inner = log.pop(1).unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(log.scope_level(), 1);
        assert_eq!(log.len(), 1);

        log.push();
        log.record(Undo::Append);
        let both = log.pop(2).unwrap();
        assert_eq!(both, vec![Undo::Append, Undo::Append]);
        assert_eq!(log.scope_level(), 0);
    }

    #[test]
    fn test_pop_underflow() {
        let mut log = UndoLog::new();
        log.push();
        assert_eq!(
            log.pop(2),
            Err(TrailError::ScopeUnderflow { requested: 2, open: 1 })
        );
        // Nothing was popped
        assert_eq!(log.scope_level(), 1);
        assert_eq!(log.pop(0), Ok(Vec::new()));
    }
}
