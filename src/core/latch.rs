//! One-shot visibility latches for reveal-on-scroll animations.

use std::collections::HashMap;
use std::hash::Hash;

/// Per-entity flag that flips to `true` on the first visibility report and
/// never reverts.
#[derive(Debug)]
pub struct VisibilityLatch<K> {
    latches: HashMap<K, bool>,
}

impl<K> Default for VisibilityLatch<K> {
    fn default() -> Self {
        Self {
            latches: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone + std::fmt::Debug> VisibilityLatch<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `id`, unrevealed.  An existing latch is left as is.
    pub fn register(&mut self, id: K) {
        self.latches.entry(id).or_insert(false);
    }

    pub fn deregister(&mut self, id: &K) {
        self.latches.remove(id);
    }

    /// Record that `id` was seen.  Returns `true` only for the report that
    /// flipped the latch, so callers can start the reveal exactly once.
    pub fn report(&mut self, id: K) -> bool {
        let latch = self.latches.entry(id.clone()).or_insert(false);
        if *latch {
            return false;
        }
        *latch = true;
        tracing::debug!(?id, "latch: revealed");
        true
    }

    pub fn is_triggered(&self, id: &K) -> bool {
        self.latches.get(id).copied().unwrap_or(false)
    }
}
