//! Tree builder
//!
//! Turns the open/close event stream into an arena `Tree`. The stack of
//! open elements is local to one build, so concurrent loads never share
//! state. Optionally records the reference index while building.

use super::document::Tree;
use super::node::{Node, NodeId};
use crate::error::{LoadError, StructureError, TokenizerError};
use crate::index::ReferenceIndex;
use crate::reader::{EndElement, StartElement, XmlEvent};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Builder state for one document
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    /// Ids of the currently open elements, innermost last
    stack: Vec<NodeId>,
    max_depth: u32,
    /// Fused reference index, when requested
    index: Option<ReferenceIndex>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that also indexes the values of `reference_key`
    pub fn with_reference_key(reference_key: impl Into<String>) -> Self {
        TreeBuilder {
            index: Some(ReferenceIndex::new(reference_key)),
            ..Self::default()
        }
    }

    /// Handle an element-open event
    pub fn open(&mut self, elem: StartElement<'_>) -> Result<NodeId, StructureError> {
        let parent = self.stack.last().copied();
        if parent.is_none() && !self.nodes.is_empty() {
            return Err(StructureError::MultipleRoots {
                name: elem.name.to_string(),
            });
        }

        // Later duplicates overwrite earlier ones: last value wins
        let attributes: HashMap<String, String> = elem
            .attributes
            .into_iter()
            .map(|a| (a.name.to_string(), a.value.into_owned()))
            .collect();

        let id = self.nodes.len() as NodeId;
        let depth = self.stack.len() as u32;
        self.max_depth = self.max_depth.max(depth);

        if let Some(index) = self.index.as_mut() {
            if let Some(value) = attributes.get(index.key()) {
                index.insert(value.clone(), id);
            }
        }

        self.nodes
            .push(Node::element(elem.name.to_string(), attributes, parent, depth));
        if let Some(parent_id) = parent {
            self.nodes[parent_id as usize].children.push(id);
        }
        self.stack.push(id);

        Ok(id)
    }

    /// Handle an element-close event
    pub fn close(&mut self, end: EndElement<'_>) -> Result<NodeId, StructureError> {
        let Some(&open_id) = self.stack.last() else {
            return Err(StructureError::UnexpectedClose {
                name: end.name.to_string(),
            });
        };
        let expected = &self.nodes[open_id as usize].name;
        if expected != end.name {
            return Err(StructureError::MismatchedClose {
                expected: expected.clone(),
                found: end.name.to_string(),
            });
        }
        self.stack.pop();
        Ok(open_id)
    }

    /// Number of elements currently open
    #[cfg(test)]
    fn open_depth(&self) -> usize {
        self.stack.len()
    }

    /// Feed one event
    pub fn push_event(&mut self, event: XmlEvent<'_>) -> Result<(), StructureError> {
        match event {
            XmlEvent::Open(elem) => self.open(elem).map(|_| ()),
            XmlEvent::Close(end) => self.close(end).map(|_| ()),
        }
    }

    /// Consume a whole event stream and return the tree.
    ///
    /// A tokenizer error aborts with no tree. A stream that ends with
    /// elements still open yields the partial tree.
    pub fn build<'a, I>(self, events: I) -> Result<Option<Tree>, LoadError>
    where
        I: IntoIterator<Item = Result<XmlEvent<'a>, TokenizerError>>,
    {
        Ok(self.build_indexed(events)?.map(|(tree, _)| tree))
    }

    /// Like `build`, also returning the fused index when one was requested
    pub fn build_indexed<'a, I>(
        mut self,
        events: I,
    ) -> Result<Option<(Tree, Option<ReferenceIndex>)>, LoadError>
    where
        I: IntoIterator<Item = Result<XmlEvent<'a>, TokenizerError>>,
    {
        for event in events {
            self.push_event(event?)?;
        }
        Ok(self.finish())
    }

    /// Finish building. `None` when no element was ever opened.
    pub fn finish(self) -> Option<(Tree, Option<ReferenceIndex>)> {
        if self.nodes.is_empty() {
            debug!("document contains no elements");
            return None;
        }

        let unclosed = self.stack.len();
        if unclosed > 0 {
            warn!(unclosed, "document ended with open elements, keeping partial tree");
        }

        let tree = Tree {
            nodes: self.nodes,
            max_depth: self.max_depth,
            unclosed,
        };
        debug!(nodes = tree.len(), max_depth = tree.max_depth(), "tree built");

        Some((tree, self.index))
    }
}
