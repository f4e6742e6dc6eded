//! Arena tree
//!
//! The whole document in one `Vec<Node>`:
//! - slot 0 is the root, every other slot has a parent
//! - arena order is open-event order
//! - immutable once built, so it can be shared across threads freely

use super::builder::TreeBuilder;
use super::node::{Node, NodeId};
use crate::error::LoadError;
use crate::reader::SliceReader;

/// A fully built document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) max_depth: u32,
    /// Number of elements still open when the token stream ended
    pub(crate) unclosed: usize,
}

impl Tree {
    /// Tokenize and build a tree from a complete document buffer.
    ///
    /// `Ok(None)` means the document holds no element at all.
    pub fn parse(input: &[u8]) -> Result<Option<Tree>, LoadError> {
        TreeBuilder::new().build(SliceReader::new(input))
    }

    pub const ROOT: NodeId = 0;

    #[inline]
    pub fn root_id(&self) -> NodeId {
        Self::ROOT
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT as usize]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Number of nodes, root included
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth of the deepest node (root = 0)
    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// True when the token stream ended with elements still open
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.unclosed > 0
    }

    #[inline]
    pub fn unclosed(&self) -> usize {
        self.unclosed
    }

    /// All nodes in arena (document) order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (i as NodeId, n))
    }

    /// Child ids of `id` in document order; empty for unknown ids
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// Pre-order walk below `id`, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let stack = self
            .node(id)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        DescendantIter { tree: self, stack }
    }

    /// Upward walk from the parent of `id` to the root
    pub fn ancestors(&self, id: NodeId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            next: self.node(id).and_then(Node::parent),
        }
    }
}

/// Pre-order iterator over descendants
pub struct DescendantIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.tree.node(current) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(current)
    }
}

/// Iterator over ancestors, nearest first
pub struct AncestorIter<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.node(current).and_then(Node::parent);
        Some(current)
    }
}
