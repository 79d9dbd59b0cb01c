use std::collections::{BTreeMap, HashMap};

use super::error::TrackerError;
use super::types::TrackedObject;

/// The authoritative set of tracked objects, at most one per id, iterated
/// in insertion order.
#[derive(Debug, Default)]
pub struct TrackedObjectRegistry {
    entries: BTreeMap<u64, TrackedObject>,
    index: HashMap<String, u64>,
    next_seq: u64,
}

impl TrackedObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: TrackedObject) -> Result<(), TrackerError> {
        if self.index.contains_key(&object.id) {
            return Err(TrackerError::DuplicateIdentifier(object.id));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(object.id.clone(), seq);
        self.entries.insert(seq, object);
        Ok(())
    }

    /// Returns whether an entry was present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.index.remove(id) {
            Some(seq) => {
                self.entries.remove(&seq);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Tracked objects in insertion order. The borrow keeps the view
    /// stable for as long as it is held.
    pub fn values(&self) -> impl Iterator<Item = &TrackedObject> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
