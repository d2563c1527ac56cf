use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// At-most-once guard over post IDs.
///
/// Exact-ID membership is the only idempotency guarantee the engine makes —
/// no content-based or time-based fuzzy matching. Implementations must make
/// `check_and_mark` atomic so two concurrent calls cannot both claim the
/// same ID.
pub trait Deduplicator: Send + Sync {
    /// Returns `true` when the ID was novel and is now marked processed,
    /// `false` when it had already been seen.
    fn check_and_mark(&self, post_id: &str) -> bool;

    fn contains(&self, post_id: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self);
}

/// Post ID → timestamp the engagement was recorded. Reporting only, never
/// re-entrancy control — that is the deduplicator's job.
pub trait HistoryStore: Send + Sync {
    fn record(&self, post_id: &str, at: DateTime<Utc>);

    fn snapshot(&self) -> HashMap<String, DateTime<Utc>>;

    fn len(&self) -> usize;

    fn clear(&self);
}

/// Reference in-memory deduplicator. Grows monotonically until `clear`.
#[derive(Debug, Default)]
pub struct MemoryDeduplicator {
    seen: Mutex<HashSet<String>>,
}

impl MemoryDeduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deduplicator for MemoryDeduplicator {
    fn check_and_mark(&self, post_id: &str) -> bool {
        self.seen
            .lock()
            .expect("dedup lock poisoned")
            .insert(post_id.to_string())
    }

    fn contains(&self, post_id: &str) -> bool {
        self.seen
            .lock()
            .expect("dedup lock poisoned")
            .contains(post_id)
    }

    fn len(&self) -> usize {
        self.seen.lock().expect("dedup lock poisoned").len()
    }

    fn clear(&self) {
        self.seen.lock().expect("dedup lock poisoned").clear();
    }
}

/// Reference in-memory history store.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl MemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn record(&self, post_id: &str, at: DateTime<Utc>) {
        self.entries
            .lock()
            .expect("history lock poisoned")
            .insert(post_id.to_string(), at);
    }

    fn snapshot(&self) -> HashMap<String, DateTime<Utc>> {
        self.entries.lock().expect("history lock poisoned").clone()
    }

    fn len(&self) -> usize {
        self.entries.lock().expect("history lock poisoned").len()
    }

    fn clear(&self) {
        self.entries.lock().expect("history lock poisoned").clear();
    }
}
