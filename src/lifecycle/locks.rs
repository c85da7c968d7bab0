//! Per-entity transition locks
//!
//! Each application id is a slot: at most one transition runs in it at a time,
//! and later callers for the same slot wait until the guard is dropped.
//! Transitions on different application ids never block each other.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct TransitionLocks {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl TransitionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until `key` is free, then hold it until the guard is dropped
    pub fn acquire(&self, key: &str) -> TransitionGuard<'_> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(key) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(key.to_string());

        TransitionGuard {
            locks: self,
            key: key.to_string(),
        }
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Releases its slot on drop
#[derive(Debug)]
pub struct TransitionGuard<'a> {
    locks: &'a TransitionLocks,
    key: String,
}

impl TransitionGuard<'_> {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
        self.locks.released.notify_all();
    }
}
