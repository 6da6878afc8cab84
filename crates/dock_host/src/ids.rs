//! Id generation for windows created at runtime.

use std::cell::Cell;

/// Source of fresh window ids for windows split off at runtime.
///
/// Callers are expected to skip ids that are already taken, so generators only need to be
/// unlikely to repeat, not globally aware.
pub trait IdGenerator {
    /// Returns the next candidate id.
    fn next_id(&self) -> String;
}

#[derive(Debug, Clone)]
/// Deterministic generator producing `{prefix}{n}` with a monotonic counter.
pub struct SequentialIds {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIds {
    /// Creates a generator starting at `{prefix}1`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// Creates a generator whose first id uses `first` as its counter.
    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(first),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n.saturating_add(1));
        format!("{}{n}", self.prefix)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Random v4 UUID generator used by browser hosts.
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
