//! Poll Store
//!
//! Registry from poll id to poll state. Each poll sits behind its own lock so
//! operations on one id are serialized while different ids never wait on each
//! other. The registry map itself is only write-locked for the instant it
//! takes to insert a new entry.

use super::error::{AlreadyExists, NotFound};
use super::model::Poll;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type Slot = Arc<RwLock<Poll>>;

/// Concurrency-safe poll registry
#[derive(Debug, Default)]
pub struct PollStore {
    slots: RwLock<HashMap<String, Slot>>,
}

impl PollStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `poll` under `id`. Fails if the id is taken.
    pub fn create(&self, id: &str, poll: Poll) -> Result<(), AlreadyExists> {
        let mut slots = self.slots.write();
        if slots.contains_key(id) {
            return Err(AlreadyExists(id.to_string()));
        }
        slots.insert(id.to_string(), Arc::new(RwLock::new(poll)));
        Ok(())
    }

    /// Apply `f` to the poll under `id` while holding that poll exclusively.
    ///
    /// `f` returns the replacement poll and an auxiliary result. This is the
    /// only way poll state changes.
    pub fn mutate_exclusive<R>(
        &self,
        id: &str,
        f: impl FnOnce(&Poll) -> (Poll, R),
    ) -> Result<R, NotFound> {
        let slot = self.slot(id)?;
        let mut poll = slot.write();
        let (next, result) = f(&poll);
        *poll = next;
        Ok(result)
    }

    /// Consistent copy of the poll under `id`
    pub fn read(&self, id: &str) -> Result<Poll, NotFound> {
        let slot = self.slot(id)?;
        let poll = slot.read().clone();
        Ok(poll)
    }

    /// Fold over every poll, one at a time. Each poll is read under its own lock.
    pub fn for_each(&self, mut f: impl FnMut(&Poll)) {
        let slots: Vec<Slot> = self.slots.read().values().cloned().collect();
        for slot in slots {
            f(&slot.read());
        }
    }

    /// Number of registered polls
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    // The registry guard is dropped before the slot lock is taken, so a slow
    // mutation on one poll never holds up lookups for another.
    fn slot(&self, id: &str) -> Result<Slot, NotFound> {
        self.slots
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| NotFound(id.to_string()))
    }
}
