//! Presentation-neutral views of nodes: labels, paths and a plain-text dump.

use super::document::Tree;
use super::node::NodeId;
use crate::config::Keys;
use std::fmt::Write as _;
use std::io;

impl Tree {
    /// Element names from the root down to `id`, e.g. `/database/table/row`
    pub fn path(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        let mut names: Vec<&str> = self
            .ancestors(id)
            .filter_map(|a| self.node(a).map(|n| n.name()))
            .collect();
        names.reverse();
        names.push(node.name());

        let mut path = String::new();
        for name in names {
            path.push('/');
            path.push_str(name);
        }
        Some(path)
    }

    /// Short label for a node.
    ///
    /// The label-key attribute when present, otherwise the element name;
    /// then ` (N)` when the node has N children; then ` [hint]` taken from
    /// a non-empty label-hint attribute, falling back to the reference
    /// attribute.
    pub fn label(&self, id: NodeId, keys: &Keys) -> Option<String> {
        let node = self.node(id)?;
        let mut label = node
            .attribute(&keys.label_key)
            .unwrap_or(node.name())
            .to_string();

        if node.has_children() {
            let _ = write!(label, " ({})", node.children().len());
        }

        let hint = node
            .attribute(&keys.label_hint_key)
            .filter(|h| !h.is_empty())
            .or_else(|| node.attribute(&keys.reference_key));
        if let Some(hint) = hint {
            let _ = write!(label, " [{hint}]");
        }

        Some(label)
    }

    /// Indented dump: two spaces per level, the element name, then the
    /// attributes sorted by name
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        self.dump_node(out, self.root_id())?;
        for id in self.descendants(self.root_id()) {
            self.dump_node(out, id)?;
        }
        Ok(())
    }

    fn dump_node<W: io::Write>(&self, out: &mut W, id: NodeId) -> io::Result<()> {
        let Some(node) = self.node(id) else {
            return Ok(());
        };
        let indent = "  ".repeat(node.depth() as usize);
        write!(out, "{indent}{}", node.name())?;
        let attrs = node.sorted_attributes();
        if !attrs.is_empty() {
            let rendered: Vec<String> = attrs.iter().map(|(k, v)| format!("{k}=\"{v}\"")).collect();
            write!(out, " [{}]", rendered.join(" "))?;
        }
        writeln!(out)
    }
}
