use crate::workflow::{Connection, Node};
use ahash::AHashMap;
use std::collections::VecDeque;
use tracing::warn;

/// Orders `nodes` so that producers come before consumers.
///
/// Only active connections whose endpoints are both present in `nodes` are
/// considered; everything else is treated as "no edge". Nodes that are free to
/// go first keep their input order, so the result is reproducible.
///
/// If the active connections form a cycle, the nodes caught in it (and anything
/// downstream of them) are appended in their original relative order instead
/// of failing. The function is total over any input.
pub fn topological_sort<'a>(nodes: &'a [Node], connections: &[Connection]) -> Vec<&'a Node> {
    let mut index: AHashMap<&str, usize> = AHashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(i);
    }

    let edges: Vec<(usize, usize)> = connections
        .iter()
        .filter(|c| c.active)
        .filter_map(|c| Some((*index.get(c.from.as_str())?, *index.get(c.to.as_str())?)))
        .collect();

    kahn_order(nodes.len(), &edges)
        .into_iter()
        .map(|i| &nodes[i])
        .collect()
}

/// Kahn's algorithm over vertex indices `0..count`.
///
/// Returns a permutation of `0..count`. Self loops are ignored; multi-edges are
/// counted once per occurrence on both sides so they cancel out.
pub(crate) fn kahn_order(count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let (mut sorted, remaining) = partition_order(count, edges);
    if !remaining.is_empty() {
        warn!(
            unordered = remaining.len(),
            "dependency cycle detected, appending remaining nodes in input order"
        );
        sorted.extend(remaining);
    }
    sorted
}

/// Splits `0..count` into the topologically ordered prefix and the vertices
/// that could not be placed because they sit on or behind a cycle.
pub(crate) fn partition_order(count: usize, edges: &[(usize, usize)]) -> (Vec<usize>, Vec<usize>) {
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut in_degree = vec![0usize; count];

    for &(from, to) in edges {
        if from == to || from >= count || to >= count {
            continue;
        }
        successors[from].push(to);
        in_degree[to] += 1;
    }

    let mut queue: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
    let mut placed = vec![false; count];
    let mut sorted = Vec::with_capacity(count);

    while let Some(current) = queue.pop_front() {
        placed[current] = true;
        sorted.push(current);

        for &next in &successors[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    let remaining = (0..count).filter(|&i| !placed[i]).collect();
    (sorted, remaining)
}
