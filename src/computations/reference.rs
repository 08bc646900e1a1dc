use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use lp_api::{NodeId, Pair};
use std::collections::{BTreeMap, VecDeque};

/// Labels every node with the minimum node of its component using breadth-first traversals over an
/// in-memory adjacency list.
///
/// Traversals start from the nodes in ascending order, so the start of every traversal is the
/// minimum of the component it discovers.
pub fn traversal_labels(edges: &[Pair]) -> BTreeMap<NodeId, NodeId> {
    let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for &(src, dst) in edges {
        adjacency.entry(src).or_insert_with(Vec::new).push(dst);
        adjacency.entry(dst).or_insert_with(Vec::new).push(src);
    }

    let mut labels = BTreeMap::new();
    let mut visited = HashSet::with_capacity(adjacency.len());
    let mut queue = VecDeque::new();
    for start in adjacency.keys().copied().sorted() {
        if !visited.insert(start) {
            continue;
        }
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            labels.insert(node, start);
            for &neighbor in &adjacency[&node] {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
    }
    labels
}

/// Number of distinct labels.
pub fn count_components(labels: &BTreeMap<NodeId, NodeId>) -> usize {
    labels.values().collect::<HashSet<_>>().len()
}
