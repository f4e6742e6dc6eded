//! Database: a tree together with the reference index built from it
//!
//! The pair is built once and never mutated, so it is shared read-only
//! between the navigation surface and any number of resolver callers.

use crate::config::Keys;
use crate::dom::{NodeId, Tree, TreeBuilder};
use crate::error::{ResolveError, Result};
use crate::index::ReferenceIndex;
use crate::reader::SliceReader;
use crate::resolve::{resolve, Resolution};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    tree: Tree,
    index: ReferenceIndex,
    keys: Keys,
}

impl Database {
    /// Parse a complete document buffer, indexing while building.
    ///
    /// `Ok(None)` when the document holds no element.
    pub fn load(input: &[u8], keys: Keys) -> Result<Option<Database>> {
        let builder = TreeBuilder::with_reference_key(keys.reference_key.clone());
        // a keyed builder always hands back its index
        let Some((tree, Some(index))) = builder.build_indexed(SliceReader::new(input))? else {
            return Ok(None);
        };
        index.log_summary();
        debug!(bytes = input.len(), nodes = tree.len(), references = index.len(), "database loaded");
        Ok(Some(Database { tree, index, keys }))
    }

    /// Read a local dump file and load it
    pub fn load_file(path: impl AsRef<Path>, keys: Keys) -> Result<Option<Database>> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        info!(path = %path.display(), bytes = data.len(), "read database file");
        Self::load(&data, keys)
    }

    /// Wrap an already built tree, indexing it with a separate pass
    pub fn from_tree(tree: Tree, keys: Keys) -> Database {
        let index = ReferenceIndex::build(&tree, keys.reference_key.clone());
        Database { tree, index, keys }
    }

    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[inline]
    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Resolve a reference value through the index
    pub fn resolve(&self, reference: &str) -> std::result::Result<Resolution, ResolveError> {
        resolve(reference, &self.tree, &self.index)
    }

    /// Resolve `value` only if it carries the reference prefix
    pub fn follow(&self, value: &str) -> std::result::Result<Resolution, ResolveError> {
        if !self.keys.is_followable(value) {
            return Err(ResolveError::NotAReference {
                reference: value.to_string(),
            });
        }
        self.resolve(value)
    }

    /// `(table name, row count)` for every child of the root, in document
    /// order. Unnamed children fall back to their element name.
    pub fn tables(&self) -> Vec<(&str, usize)> {
        self.tree
            .children(self.tree.root_id())
            .filter_map(|id| self.tree.node(id))
            .map(|n| (n.attribute(&self.keys.label_key).unwrap_or(n.name()), n.children().len()))
            .collect()
    }

    /// Node at a slash separated path such as `/database/VM`.
    ///
    /// Each segment matches the first child whose label attribute, or
    /// failing that element name, equals it. The first segment names the
    /// root.
    pub fn locate(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let root = self.tree.root_id();
        if !self.matches(root, segments.next()?) {
            return None;
        }
        segments.try_fold(root, |id, segment| {
            self.tree.children(id).find(|&child| self.matches(child, segment))
        })
    }

    fn matches(&self, id: NodeId, segment: &str) -> bool {
        self.tree.node(id).is_some_and(|n| {
            n.attribute(&self.keys.label_key) == Some(segment) || n.name() == segment
        })
    }

    /// Child of the root whose label attribute equals `name`
    pub fn table(&self, name: &str) -> Option<NodeId> {
        self.tree
            .children(self.tree.root_id())
            .find(|&id| {
                self.tree
                    .node(id)
                    .and_then(|n| n.attribute(&self.keys.label_key))
                    == Some(name)
            })
    }
}
