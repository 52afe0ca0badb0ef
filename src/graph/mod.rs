use crate::workflow::{Connection, ConnectorNode, Node, RunToggle};
use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

mod sort;

pub use sort::topological_sort;
use sort::{kahn_order, partition_order};

/// Dependency edges between plannable nodes, with connector nodes collapsed.
///
/// A connector node is a pass-through vertex: `A -> connector -> B` yields the
/// dependency `A -> B`. A connector toggled to skip severs every path through
/// it. Rule nodes, absent ids, and inactive connections contribute nothing.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    nodes: Vec<&'a Node>,
    edges: Vec<(usize, usize)>,
    predecessors: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    /// Builds the graph over every non-rule node in `nodes`, in input order.
    pub fn build(
        nodes: &'a [Node],
        connections: &[Connection],
        connector_nodes: &[ConnectorNode],
    ) -> Self {
        let nodes: Vec<&'a Node> = nodes.iter().filter(|n| !n.category.is_rule()).collect();

        let mut index: AHashMap<&str, usize> = AHashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.id.as_str()).or_insert(i);
        }

        let connectors: AHashMap<&str, &ConnectorNode> = connector_nodes
            .iter()
            .map(|c| (c.id.as_str(), c))
            .collect();

        let mut outgoing: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for connection in connections.iter().filter(|c| c.active) {
            outgoing
                .entry(connection.from.as_str())
                .or_default()
                .push(connection.to.as_str());
        }

        let mut seen: AHashSet<(usize, usize)> = AHashSet::new();
        let mut edges = Vec::new();

        for (from_idx, node) in nodes.iter().enumerate() {
            // Duplicate ids resolve to the first node carrying them.
            if index.get(node.id.as_str()) != Some(&from_idx) {
                continue;
            }
            for target in Self::reachable_nodes(node.id.as_str(), &outgoing, &index, &connectors) {
                if target != from_idx && seen.insert((from_idx, target)) {
                    edges.push((from_idx, target));
                }
            }
        }

        let mut predecessors = vec![Vec::new(); nodes.len()];
        for &(from, to) in &edges {
            predecessors[to].push(from);
        }

        Self {
            nodes,
            edges,
            predecessors,
        }
    }

    /// Plannable nodes that `start` feeds, directly or through live connectors.
    fn reachable_nodes(
        start: &str,
        outgoing: &AHashMap<&str, Vec<&str>>,
        index: &AHashMap<&str, usize>,
        connectors: &AHashMap<&str, &ConnectorNode>,
    ) -> Vec<usize> {
        let mut found = Vec::new();
        let mut visited_connectors: AHashSet<&str> = AHashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let Some(targets) = outgoing.get(current) else {
                continue;
            };
            for &target in targets {
                if let Some(&idx) = index.get(target) {
                    found.push(idx);
                } else if let Some(connector) = connectors.get(target) {
                    if connector.run_toggle != RunToggle::ForceSkip
                        && visited_connectors.insert(target)
                    {
                        queue.push_back(target);
                    }
                }
            }
        }
        found
    }

    /// Plannable nodes in input order.
    pub fn nodes(&self) -> &[&'a Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Direct dependencies of the node at `index`, deduplicated.
    pub fn predecessors(&self, index: usize) -> &[usize] {
        self.predecessors
            .get(index)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Evaluation order for planning: producers first, cycles appended.
    pub fn order(&self) -> Vec<usize> {
        kahn_order(self.nodes.len(), &self.edges)
    }

    /// Nodes that sit on a dependency cycle or downstream of one.
    pub fn unordered(&self) -> Vec<usize> {
        partition_order(self.nodes.len(), &self.edges).1
    }

    /// Nodes that sit on a dependency cycle, i.e. can reach themselves.
    ///
    /// Unlike [`DependencyGraph::unordered`], nodes that are merely downstream
    /// of a cycle are not included.
    pub fn cyclic(&self) -> Vec<usize> {
        let mut successors = vec![Vec::new(); self.nodes.len()];
        for &(from, to) in &self.edges {
            successors[from].push(to);
        }

        self.unordered()
            .into_iter()
            .filter(|&start| {
                let mut seen = vec![false; self.nodes.len()];
                let mut stack: Vec<usize> = successors[start].clone();
                while let Some(current) = stack.pop() {
                    if current == start {
                        return true;
                    }
                    if !seen[current] {
                        seen[current] = true;
                        stack.extend(&successors[current]);
                    }
                }
                false
            })
            .collect()
    }
}
