//! Parallel index pass
//!
//! Uses Rayon to scan the arena in parallel. Arena ids follow open-event
//! order, so keeping the larger id for a repeated value gives the same
//! last-write-wins result as the sequential pass.

use super::reference::ReferenceIndex;
use crate::dom::{NodeId, Tree};
use rayon::prelude::*;
use std::collections::HashMap;

/// Build the reference index with a parallel scan
pub fn build_parallel(tree: &Tree, key: impl Into<String>) -> ReferenceIndex {
    let key = key.into();

    let (entries, declarations) = tree
        .nodes
        .par_iter()
        .enumerate()
        .filter_map(|(i, node)| node.attribute(&key).map(|v| (v, i as NodeId)))
        .fold(
            || (HashMap::new(), 0usize),
            |(mut map, count), (value, id)| {
                keep_latest(&mut map, value, id);
                (map, count + 1)
            },
        )
        .reduce(
            || (HashMap::new(), 0usize),
            |(mut left, lcount), (right, rcount)| {
                for (value, id) in right {
                    keep_latest(&mut left, value, id);
                }
                (left, lcount + rcount)
            },
        );

    let entries: HashMap<String, NodeId> = entries
        .into_iter()
        .map(|(value, id): (&str, NodeId)| (value.to_string(), id))
        .collect();
    let duplicates = declarations - entries.len();

    let index = ReferenceIndex::from_parts(key, entries, duplicates);
    index.log_summary();
    index
}

fn keep_latest<'a>(map: &mut HashMap<&'a str, NodeId>, value: &'a str, id: NodeId) {
    map.entry(value)
        .and_modify(|existing| *existing = (*existing).max(id))
        .or_insert(id);
}
