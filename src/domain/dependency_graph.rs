// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A type-safe wrapper for learning-path dependency relationships with
//! graph algorithms.
//!
//! The [`NodeGraph`] represents prerequisite relationships between
//! learning nodes as a directed graph in forward adjacency form: each
//! node id maps to the list of node ids that depend on it. This
//! representation is what the ordering machinery wants:
//!
//! - **Dependency counting**: count incoming edges per node (Kahn's seed)
//! - **Reverse mapping**: recover, per node, what it depends on
//! - **Topological sorting**: traverse dependents as in-degrees drain
//! - **Cycle extraction**: DFS that returns an actual witness cycle for
//!   diagnostics and recovery, not just a boolean
//!
//! The map is a `BTreeMap` so every traversal is ordered by node id;
//! nothing here depends on hash iteration order.

use std::collections::BTreeMap;
use uuid::Uuid;

/// Forward adjacency graph over learning-node ids.
///
/// Key: node id. Value: ids of nodes that depend on the key (must come
/// after it).
#[derive(Debug, Clone, Default)]
pub struct NodeGraph(pub BTreeMap<Uuid, Vec<Uuid>>);

impl NodeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Ensure a node exists, with no edges yet.
    pub fn add_node(&mut self, node_id: Uuid) {
        self.0.entry(node_id).or_default();
    }

    /// Add a directed edge `source -> dependent`. Both endpoints are
    /// created if absent; duplicate edges are ignored.
    pub fn add_edge(&mut self, source: Uuid, dependent: Uuid) {
        self.add_node(dependent);
        let dependents = self.0.entry(source).or_default();
        if !dependents.contains(&dependent) {
            dependents.push(dependent);
        }
    }

    /// Remove the edge `source -> dependent` if present.
    pub fn remove_edge(&mut self, source: Uuid, dependent: Uuid) {
        if let Some(dependents) = self.0.get_mut(&source) {
            dependents.retain(|id| *id != dependent);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of incoming edges per node. Nodes without incoming edges map
    /// to zero; these are the valid starting points.
    pub fn dependency_counts(&self) -> BTreeMap<Uuid, usize> {
        let mut counts: BTreeMap<Uuid, usize> =
            self.0.keys().map(|id| (*id, 0)).collect();
        for dependents in self.0.values() {
            for dependent in dependents {
                *counts.entry(*dependent).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Reverse mapping: node id to the ids it depends on.
    pub fn reverse_dependencies(&self) -> BTreeMap<Uuid, Vec<Uuid>> {
        let mut reverse: BTreeMap<Uuid, Vec<Uuid>> =
            self.0.keys().map(|id| (*id, Vec::new())).collect();
        for (source, dependents) in &self.0 {
            for dependent in dependents {
                reverse.entry(*dependent).or_default().push(*source);
            }
        }
        reverse
    }

    /// Kahn's algorithm over the graph.
    ///
    /// Returns `Some(order)` for acyclic graphs, `None` when a cycle
    /// prevents a total order. Traversal is over the id-ordered map, so
    /// the result is deterministic; callers that need a domain-aware
    /// tie-break run their own Kahn loop over
    /// [`NodeGraph::dependency_counts`].
    pub fn topological_sort(&self) -> Option<Vec<Uuid>> {
        let mut counts = self.dependency_counts();
        let mut ready: Vec<Uuid> = counts
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(self.0.len());

        while let Some(current) = ready.pop() {
            order.push(current);
            if let Some(dependents) = self.0.get(&current) {
                for dependent in dependents {
                    let count = counts.get_mut(dependent)?;
                    *count -= 1;
                    if *count == 0 {
                        ready.push(*dependent);
                    }
                }
            }
        }

        if order.len() == self.0.len() {
            Some(order)
        } else {
            None
        }
    }

    /// Whether the graph admits a total order.
    pub fn is_acyclic(&self) -> bool {
        self.topological_sort().is_some()
    }

    /// Extract one witness cycle via depth-first search.
    ///
    /// Returns the cycle as an ordered node-id list with the first node
    /// repeated at the end, or `None` when the graph is acyclic. Which
    /// cycle is returned is deterministic (DFS roots and neighbours are
    /// visited in id order).
    pub fn find_cycle(&self) -> Option<Vec<Uuid>> {
        const UNVISITED: u8 = 0;
        const VISITING: u8 = 1;
        const VISITED: u8 = 2;

        fn dfs(
            graph: &BTreeMap<Uuid, Vec<Uuid>>,
            node: Uuid,
            state: &mut BTreeMap<Uuid, u8>,
            path: &mut Vec<Uuid>,
        ) -> Option<Vec<Uuid>> {
            state.insert(node, VISITING);
            path.push(node);

            if let Some(dependents) = graph.get(&node) {
                for dependent in dependents {
                    match state.get(dependent).copied().unwrap_or(UNVISITED) {
                        VISITING => {
                            // Back edge: slice the current path from the
                            // first occurrence of the dependent.
                            let start = path
                                .iter()
                                .position(|id| id == dependent)
                                .unwrap_or(0);
                            let mut cycle: Vec<Uuid> = path[start..].to_vec();
                            cycle.push(*dependent);
                            return Some(cycle);
                        }
                        VISITED => {}
                        _ => {
                            if let Some(cycle) = dfs(graph, *dependent, state, path) {
                                return Some(cycle);
                            }
                        }
                    }
                }
            }

            state.insert(node, VISITED);
            path.pop();
            None
        }

        let mut state: BTreeMap<Uuid, u8> = BTreeMap::new();
        for node in self.0.keys() {
            if state.get(node).copied().unwrap_or(UNVISITED) == UNVISITED {
                let mut path = Vec::new();
                if let Some(cycle) = dfs(&self.0, *node, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }
}

impl From<BTreeMap<Uuid, Vec<Uuid>>> for NodeGraph {
    fn from(graph: BTreeMap<Uuid, Vec<Uuid>>) -> Self {
        Self(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_dependency_counts_diamond() {
        // a -> [b, c] -> d
        let v = ids(4);
        let mut graph = NodeGraph::new();
        graph.add_edge(v[0], v[1]);
        graph.add_edge(v[0], v[2]);
        graph.add_edge(v[1], v[3]);
        graph.add_edge(v[2], v[3]);

        let counts = graph.dependency_counts();
        assert_eq!(counts[&v[0]], 0);
        assert_eq!(counts[&v[1]], 1);
        assert_eq!(counts[&v[2]], 1);
        assert_eq!(counts[&v[3]], 2);
    }

    #[test]
    fn test_reverse_dependencies_linear_chain() {
        let v = ids(3);
        let mut graph = NodeGraph::new();
        graph.add_edge(v[0], v[1]);
        graph.add_edge(v[1], v[2]);

        let reverse = graph.reverse_dependencies();
        assert!(reverse[&v[0]].is_empty());
        assert_eq!(reverse[&v[1]], vec![v[0]]);
        assert_eq!(reverse[&v[2]], vec![v[1]]);
    }

    #[test]
    fn test_topological_sort_respects_edges() {
        let v = ids(4);
        let mut graph = NodeGraph::new();
        graph.add_edge(v[0], v[1]);
        graph.add_edge(v[0], v[2]);
        graph.add_edge(v[1], v[3]);
        graph.add_edge(v[2], v[3]);

        let order = graph.topological_sort().unwrap();
        assert_eq!(order.len(), 4);
        let pos =
            |id: Uuid| order.iter().position(|x| *x == id).unwrap();
        assert!(pos(v[0]) < pos(v[1]));
        assert!(pos(v[0]) < pos(v[2]));
        assert!(pos(v[1]) < pos(v[3]));
        assert!(pos(v[2]) < pos(v[3]));
    }

    #[test]
    fn test_topological_sort_cyclic_returns_none() {
        let v = ids(3);
        let mut graph = NodeGraph::new();
        graph.add_edge(v[0], v[1]);
        graph.add_edge(v[1], v[2]);
        graph.add_edge(v[2], v[0]);
        assert!(graph.topological_sort().is_none());
        assert!(!graph.is_acyclic());
    }

    #[test]
    fn test_find_cycle_returns_closed_witness() {
        let v = ids(3);
        let mut graph = NodeGraph::new();
        graph.add_edge(v[0], v[1]);
        graph.add_edge(v[1], v[2]);
        graph.add_edge(v[2], v[0]);

        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        // All three nodes participate.
        assert_eq!(cycle.len(), 4);
        for id in &v {
            assert!(cycle.contains(id));
        }
    }

    #[test]
    fn test_find_cycle_none_for_dag() {
        let v = ids(2);
        let mut graph = NodeGraph::new();
        graph.add_edge(v[0], v[1]);
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn test_empty_graph() {
        let graph = NodeGraph::new();
        assert!(graph.is_empty());
        assert!(graph.dependency_counts().is_empty());
        assert_eq!(graph.topological_sort().unwrap(), Vec::<Uuid>::new());
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn test_single_node() {
        let mut graph = NodeGraph::new();
        let id = Uuid::new_v4();
        graph.add_node(id);
        assert_eq!(graph.topological_sort().unwrap(), vec![id]);
    }

    #[test]
    fn test_remove_edge_breaks_cycle() {
        let v = ids(2);
        let mut graph = NodeGraph::new();
        graph.add_edge(v[0], v[1]);
        graph.add_edge(v[1], v[0]);
        assert!(!graph.is_acyclic());

        graph.remove_edge(v[1], v[0]);
        assert!(graph.is_acyclic());
    }

    #[test]
    fn test_duplicate_edges_ignored() {
        let v = ids(2);
        let mut graph = NodeGraph::new();
        graph.add_edge(v[0], v[1]);
        graph.add_edge(v[0], v[1]);
        assert_eq!(graph.0[&v[0]].len(), 1);
        assert_eq!(graph.dependency_counts()[&v[1]], 1);
    }

    #[test]
    fn test_multiple_entrypoints() {
        let v = ids(3);
        let mut graph = NodeGraph::new();
        graph.add_edge(v[0], v[2]);
        graph.add_edge(v[1], v[2]);

        let counts = graph.dependency_counts();
        assert_eq!(counts[&v[0]], 0);
        assert_eq!(counts[&v[1]], 0);
        assert_eq!(counts[&v[2]], 2);

        let order = graph.topological_sort().unwrap();
        let pos = |id: Uuid| order.iter().position(|x| *x == id).unwrap();
        assert!(pos(v[0]) < pos(v[2]));
        assert!(pos(v[1]) < pos(v[2]));
    }
}
