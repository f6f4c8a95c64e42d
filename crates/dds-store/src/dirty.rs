//! Dirty state tracking.

use std::collections::BTreeSet;

/// Tracks which snapshot keys have unsaved changes.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    keys: BTreeSet<&'static str>,
}

impl DirtyTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.keys.is_empty()
    }

    #[inline]
    pub fn is_key_dirty(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Mark a key as having unsaved changes.
    pub fn mark_dirty(&mut self, key: &'static str) {
        self.keys.insert(key);
    }

    /// Mark a key as written.
    pub fn save_complete(&mut self, key: &str) {
        self.keys.remove(key);
    }
}
