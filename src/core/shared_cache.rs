use std::collections::HashMap;
use crate::models::VerdictRecord;

/// State of one address within a call tree
#[derive(Debug, Clone, PartialEq)]
pub enum CacheSlot {
    /// Evaluation has started but not finished (an ancestor in the tree)
    InFlight,
    Resolved(VerdictRecord),
}

/// Per-call-tree memo of evaluated addresses.
///
/// Created fresh for every top-level evaluation and threaded down the
/// recursion by `&mut`; never persisted and never shared between trees.
#[derive(Debug, Default)]
pub struct SharedEvaluationCache {
    slots: HashMap<String, CacheSlot>,
}

impl SharedEvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, address: &str) -> Option<&CacheSlot> {
        self.slots.get(address)
    }

    pub fn resolved(&self, address: &str) -> Option<&VerdictRecord> {
        match self.slots.get(address) {
            Some(CacheSlot::Resolved(record)) => Some(record),
            _ => None,
        }
    }

    /// Insert an in-flight marker if the address is unknown.
    /// Returns `false` when the address was already claimed or resolved.
    pub fn claim(&mut self, address: &str) -> bool {
        if self.slots.contains_key(address) {
            return false;
        }
        self.slots.insert(address.to_string(), CacheSlot::InFlight);
        true
    }

    pub fn resolve(&mut self, address: &str, record: VerdictRecord) {
        self.slots.insert(address.to_string(), CacheSlot::Resolved(record));
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
