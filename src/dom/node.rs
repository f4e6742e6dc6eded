//! Tree node
//!
//! Nodes live in the tree's arena and refer to each other by `NodeId`.
//! Children are owned downward through the arena; `parent` is a plain
//! back-reference used for upward walks.

use std::collections::HashMap;

/// Compact node identifier (index into the arena)
pub type NodeId = u32;

/// One element of the source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) attributes: HashMap<String, String>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: u32,
}

impl Node {
    /// Create a detached element node
    pub(crate) fn element(
        name: String,
        attributes: HashMap<String, String>,
        parent: Option<NodeId>,
        depth: u32,
    ) -> Self {
        Node {
            name,
            attributes,
            children: Vec::new(),
            parent,
            depth,
        }
    }

    /// Element tag, e.g. `database`, `table`, `row`
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child ids in document order
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Distance from the root (root = 0)
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Attribute pairs sorted by name
    pub fn sorted_attributes(&self) -> Vec<(&str, &str)> {
        let mut attrs: Vec<_> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        attrs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        attrs
    }
}
