//! Reference index
//!
//! Maps each value of the reference attribute to the node that declared it.
//! Duplicate declarations resolve to the later node in document order.

use crate::dom::{NodeId, Tree};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
    /// Attribute whose values are indexed
    key: String,
    entries: HashMap<String, NodeId>,
    /// Declarations that overwrote an earlier one
    duplicates: usize,
}

impl ReferenceIndex {
    pub fn new(key: impl Into<String>) -> Self {
        ReferenceIndex {
            key: key.into(),
            entries: HashMap::new(),
            duplicates: 0,
        }
    }

    /// Sequential pass over the arena in document order
    pub fn build(tree: &Tree, key: impl Into<String>) -> Self {
        let mut index = ReferenceIndex::new(key);
        for (id, node) in tree.iter() {
            if let Some(value) = node.attribute(&index.key) {
                index.insert(value.to_string(), id);
            }
        }
        index.log_summary();
        index
    }

    pub(crate) fn from_parts(key: String, entries: HashMap<String, NodeId>, duplicates: usize) -> Self {
        ReferenceIndex {
            key,
            entries,
            duplicates,
        }
    }

    /// Record a declaration. Returns the node it displaced, if any.
    pub(crate) fn insert(&mut self, value: String, id: NodeId) -> Option<NodeId> {
        let previous = self.entries.insert(value, id);
        if let Some(prev) = previous {
            self.duplicates += 1;
            debug!(previous = prev, current = id, "duplicate reference declaration");
        }
        previous
    }

    pub(crate) fn log_summary(&self) {
        if self.duplicates > 0 {
            warn!(
                key = %self.key,
                duplicates = self.duplicates,
                "reference values declared more than once, keeping the last declaration"
            );
        }
        debug!(key = %self.key, entries = self.entries.len(), "reference index built");
    }

    /// The indexed attribute name
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn get(&self, reference: &str) -> Option<NodeId> {
        self.entries.get(reference).copied()
    }

    #[inline]
    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(reference)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of declarations that lost to a later one
    #[inline]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.entries.iter().map(|(k, &v)| (k.as_str(), v))
    }
}
