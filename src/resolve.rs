//! Reference resolution
//!
//! Index-driven: a hash lookup finds the target, then a bounded upward walk
//! yields the chain of ancestors a lazily materialized view must expand
//! before the target can be shown. The tree is never searched.

use crate::dom::{NodeId, Tree};
use crate::error::ResolveError;
use crate::index::ReferenceIndex;
use tracing::trace;

/// Where a reference points and what must be unfolded to reach it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Node that declared the reference
    pub target: NodeId,
    /// Immediate parent of the target (the owning collection)
    pub owner: NodeId,
    /// Root first, owner last
    pub ancestors: Vec<NodeId>,
}

/// Resolve `reference` against a tree and the index built from it
pub fn resolve(reference: &str, tree: &Tree, index: &ReferenceIndex) -> Result<Resolution, ResolveError> {
    let target = index.get(reference).ok_or_else(|| ResolveError::NotFound {
        reference: reference.to_string(),
    })?;

    let unreachable = || ResolveError::Unreachable {
        reference: reference.to_string(),
    };

    let owner = tree
        .node(target)
        .ok_or_else(unreachable)?
        .parent()
        .ok_or_else(|| ResolveError::Orphan {
            reference: reference.to_string(),
        })?;

    // A sound parent chain has at most max_depth + 1 nodes
    let bound = tree.max_depth() as usize + 1;
    let mut ancestors = Vec::with_capacity(bound.min(64));
    let mut current = Some(owner);
    while let Some(id) = current {
        if ancestors.len() >= bound {
            return Err(unreachable());
        }
        let node = tree.node(id).ok_or_else(unreachable)?;
        ancestors.push(id);
        current = node.parent();
    }
    if ancestors.last() != Some(&tree.root_id()) {
        return Err(unreachable());
    }
    ancestors.reverse();

    trace!(reference, target, owner, depth = ancestors.len(), "reference resolved");

    Ok(Resolution {
        target,
        owner,
        ancestors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB: &str = r#"<database>
        <table name="Bond"/>
        <table name="PCI">
            <row ref="OpaqueRef:p1"/>
            <row ref="OpaqueRef:p2"/>
        </table>
    </database>"#;

    fn load(input: &str) -> (Tree, ReferenceIndex) {
        let tree = Tree::parse(input.as_bytes()).unwrap().unwrap();
        let index = ReferenceIndex::build(&tree, "ref");
        (tree, index)
    }

    #[test]
    fn test_resolve_row() {
        let (tree, index) = load(DB);
        let res = resolve("OpaqueRef:p2", &tree, &index).unwrap();
        assert_eq!(res.target, 4);
        assert_eq!(res.owner, 2);
        assert_eq!(res.ancestors, vec![0, 2]);
        assert_eq!(tree.node(res.target).unwrap().parent(), Some(res.owner));
    }

    #[test]
    fn test_not_found() {
        let (tree, index) = load(DB);
        let err = resolve("unknown", &tree, &index).unwrap_err();
        assert_eq!(err, ResolveError::NotFound { reference: "unknown".into() });
    }

    #[test]
    fn test_reference_on_root_is_orphan() {
        let (tree, index) = load("<database ref=\"OpaqueRef:db\"><table/></database>");
        let err = resolve("OpaqueRef:db", &tree, &index).unwrap_err();
        assert!(matches!(err, ResolveError::Orphan { .. }));
    }

    #[test]
    fn test_reference_one_level_below_root() {
        let (tree, index) = load("<database><table ref=\"OpaqueRef:t\"/></database>");
        let res = resolve("OpaqueRef:t", &tree, &index).unwrap();
        assert_eq!(res.owner, 0);
        assert_eq!(res.ancestors, vec![0]);
    }

    #[test]
    fn test_deep_chain() {
        let (tree, index) = load("<a><b><c><d><e ref=\"deep\"/></d></c></b></a>");
        let res = resolve("deep", &tree, &index).unwrap();
        assert_eq!(res.ancestors, vec![0, 1, 2, 3]);
        for pair in res.ancestors.windows(2) {
            assert_eq!(tree.node(pair[1]).unwrap().parent(), Some(pair[0]));
        }
    }

    #[test]
    fn test_cyclic_parent_chain_is_unreachable() {
        let (mut tree, index) = load(DB);
        // table -> row -> table
        tree.nodes[2].parent = Some(3);
        let err = resolve("OpaqueRef:p2", &tree, &index).unwrap_err();
        assert!(matches!(err, ResolveError::Unreachable { .. }));
    }

    #[test]
    fn test_chain_ending_off_root_is_unreachable() {
        let (mut tree, index) = load(DB);
        tree.nodes[2].parent = None;
        let err = resolve("OpaqueRef:p1", &tree, &index).unwrap_err();
        assert!(matches!(err, ResolveError::Unreachable { .. }));
    }

    #[test]
    fn test_idempotent() {
        let (tree, index) = load(DB);
        let first = resolve("OpaqueRef:p1", &tree, &index);
        let second = resolve("OpaqueRef:p1", &tree, &index);
        assert_eq!(first, second);
    }
}
