// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Topological ordering of learning paths with cycle recovery.
//!
//! [`TopologicalSorter`] reorders a path's nodes so every node follows the
//! nodes it depends on. It runs Kahn's algorithm over the graph induced by
//! the *full* relation set (advisory edges shape the order too; only
//! blocking edges are a hard invariant), draining the ready set through a
//! [`ReadyQueue`] so the pick order is a pure function of the input:
//! lowest natural learning priority first, insertion order among ties.
//!
//! # Cycle recovery
//!
//! When the graph is not a DAG the sorter extracts one witness cycle via
//! depth-first search and attempts a single recovery pass: every removable
//! edge participating in the witness (system-created, and weak or of an
//! advisory type) is removed, then Kahn's algorithm runs again. A witness
//! without removable edges, or a cycle surviving the retry, is terminal
//! and reported with the node ids left unordered. User-created relations
//! are never removed.
//!
//! # Heuristic regrouping
//!
//! The sorted list is re-partitioned by primary skill type (first
//! appearance order) and each group is reordered by ascending complexity.
//! The regrouped sequence is then repaired pairwise against the dependency
//! edges; if repair does not converge the regrouping is abandoned and
//! Kahn's order wins.

use chrono::Utc;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::{LearningPath, NodeGraph};
use crate::engine::ready_queue::ReadyQueue;
use crate::errors::{DomainError, DomainResult};
use crate::observability::messages::sorter::{CycleDetected, EdgeRemoved, SortCompleted};
use crate::observability::messages::StructuredLog;

/// Orders the nodes of a learning path.
#[derive(Debug, Default)]
pub struct TopologicalSorter;

impl TopologicalSorter {
    pub fn new() -> Self {
        Self
    }

    /// Reorder `path.nodes` into a topological order and return the node
    /// ids in that order.
    ///
    /// Fails with [`DomainError::InvalidSequence`] only when a cycle
    /// survives the single recovery attempt. Diagnostics for removed
    /// edges are appended to `warnings`.
    pub fn sort(
        &self,
        path: &mut LearningPath,
        warnings: &mut Vec<String>,
    ) -> DomainResult<Vec<Uuid>> {
        let graph = path.relation_graph();
        let (order, leftover) = stable_kahn(path, &graph);

        let order = if leftover.is_empty() {
            order
        } else {
            self.recover_from_cycle(path, &graph, warnings)?
        };

        // Recovery may have removed edges; regroup against the current set.
        let graph = path.relation_graph();
        let order = regroup_by_skill(path, &graph, order);

        apply_order(path, &order);
        path.last_optimized_at = Some(Utc::now());
        path.touch();

        SortCompleted {
            path_name: &path.name,
            node_count: order.len(),
        }
        .log();

        Ok(order)
    }

    // One recovery pass: drop removable witness-cycle edges and retry.
    fn recover_from_cycle(
        &self,
        path: &mut LearningPath,
        graph: &NodeGraph,
        warnings: &mut Vec<String>,
    ) -> DomainResult<Vec<Uuid>> {
        let witness = graph.find_cycle().unwrap_or_default();
        CycleDetected {
            path_name: &path.name,
            // The witness repeats its first node at the end.
            cycle_len: witness.len().saturating_sub(1),
        }
        .log();

        let mut removed_any = false;
        for pair in witness.windows(2) {
            let (source_node, target_node) = (pair[0], pair[1]);
            let Some((source_repo, target_repo, removable)) =
                relation_for_nodes(path, source_node, target_node)
            else {
                continue;
            };
            if !removable {
                continue;
            }
            let source_name = repository_name(path, source_node);
            let target_name = repository_name(path, target_node);

            if path.remove_relation_between(source_repo, target_repo) {
                removed_any = true;
                EdgeRemoved {
                    source: &source_name,
                    target: &target_name,
                }
                .log();
                warnings.push(format!(
                    "Removed weak dependency {source_name} -> {target_name} to break a cycle"
                ));
            }
        }

        if !removed_any {
            let affected: Vec<String> = dedup_cycle(&witness)
                .iter()
                .map(|id| id.to_string())
                .collect();
            return Err(DomainError::InvalidSequence {
                message: format!(
                    "path '{}' contains a cycle with no removable edges",
                    path.name
                ),
                affected_nodes: affected,
            });
        }

        let rebuilt = path.relation_graph();
        let (order, leftover) = stable_kahn(path, &rebuilt);
        if !leftover.is_empty() {
            return Err(DomainError::InvalidSequence {
                message: format!(
                    "path '{}' could not be ordered after cycle recovery",
                    path.name
                ),
                affected_nodes: leftover.iter().map(|id| id.to_string()).collect(),
            });
        }
        Ok(order)
    }
}

// Kahn's algorithm with the stable priority pick. Returns the emitted
// order and the ids left unordered (non-empty exactly when a cycle
// exists).
fn stable_kahn(path: &LearningPath, graph: &NodeGraph) -> (Vec<Uuid>, Vec<Uuid>) {
    let priorities: BTreeMap<Uuid, u32> = path
        .nodes
        .iter()
        .map(|n| (n.node_id, n.repository.recommended_order()))
        .collect();

    let mut counts = graph.dependency_counts();
    let mut ready = ReadyQueue::new();
    // Seed in current node order so ties follow the existing sequence.
    for node in &path.nodes {
        if counts.get(&node.node_id).copied() == Some(0) {
            ready.push(node.node_id, priorities[&node.node_id]);
        }
    }

    let mut order = Vec::with_capacity(path.nodes.len());
    while let Some(current) = ready.pop() {
        order.push(current);
        if let Some(dependents) = graph.0.get(&current) {
            for dependent in dependents {
                if let Some(count) = counts.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(
                            *dependent,
                            priorities.get(dependent).copied().unwrap_or(u32::MAX),
                        );
                    }
                }
            }
        }
    }

    let leftover: Vec<Uuid> = path
        .nodes
        .iter()
        .map(|n| n.node_id)
        .filter(|id| !order.contains(id))
        .collect();
    (order, leftover)
}

// Partition the sorted order by primary skill type (first appearance
// wins), reorder each group by ascending complexity, then repair pairwise
// against the dependency edges. Falls back to the input order when repair
// does not converge.
fn regroup_by_skill(path: &LearningPath, graph: &NodeGraph, order: Vec<Uuid>) -> Vec<Uuid> {
    if order.len() < 2 {
        return order;
    }

    let complexity: BTreeMap<Uuid, f64> = path
        .nodes
        .iter()
        .map(|n| (n.node_id, n.repository.complexity_score))
        .collect();
    let skill_of = |id: &Uuid| {
        path.node(*id)
            .and_then(|n| n.repository.primary_skill)
            .map(|s| s.skill_type)
    };

    let mut group_keys = Vec::new();
    let mut groups: BTreeMap<usize, Vec<Uuid>> = BTreeMap::new();
    for id in &order {
        let key = skill_of(id);
        let slot = match group_keys.iter().position(|k| *k == key) {
            Some(slot) => slot,
            None => {
                group_keys.push(key);
                group_keys.len() - 1
            }
        };
        groups.entry(slot).or_default().push(*id);
    }

    let mut candidate = Vec::with_capacity(order.len());
    for slot in 0..group_keys.len() {
        let mut group = groups.remove(&slot).unwrap_or_default();
        group.sort_by(|a, b| {
            complexity[a]
                .partial_cmp(&complexity[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidate.extend(group);
    }

    // Pairwise repair: any edge now pointing backwards gets its endpoints
    // restored to dependency order. Bounded passes; give up to Kahn's
    // order if a fixpoint is not reached.
    let edges: Vec<(Uuid, Uuid)> = graph
        .0
        .iter()
        .flat_map(|(source, dependents)| {
            dependents.iter().map(move |dependent| (*source, *dependent))
        })
        .collect();

    let max_passes = candidate.len() * candidate.len() + 1;
    for _ in 0..max_passes {
        let position: BTreeMap<Uuid, usize> = candidate
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        let violation = edges
            .iter()
            .find(|(source, target)| position[source] > position[target]);
        match violation {
            None => return candidate,
            Some((source, target)) => {
                let (i, j) = (position[source], position[target]);
                candidate.swap(i, j);
            }
        }
    }
    order
}

// Rewrite path.nodes into the given id order.
fn apply_order(path: &mut LearningPath, order: &[Uuid]) {
    let mut nodes = std::mem::take(&mut path.nodes);
    let mut reordered = Vec::with_capacity(nodes.len());
    for id in order {
        if let Some(index) = nodes.iter().position(|n| n.node_id == *id) {
            reordered.push(nodes.swap_remove(index));
        }
    }
    // Anything not mentioned in the order keeps its relative position at
    // the tail. With a successful sort this is empty.
    reordered.extend(nodes);
    path.nodes = reordered;
    path.recalculate_metrics();
}

// Find the relation joining two nodes; returns (source repo, target repo,
// removable).
fn relation_for_nodes(
    path: &LearningPath,
    source_node: Uuid,
    target_node: Uuid,
) -> Option<(Uuid, Uuid, bool)> {
    let source_repo = path.node(source_node)?.repository.repository_id;
    let target_repo = path.node(target_node)?.repository.repository_id;
    path.dependencies
        .iter()
        .find(|d| {
            d.source_repository_id == source_repo && d.target_repository_id == target_repo
        })
        .map(|d| (source_repo, target_repo, d.is_removable()))
}

fn repository_name(path: &LearningPath, node_id: Uuid) -> String {
    path.node(node_id)
        .map(|n| n.repository.name.clone())
        .unwrap_or_else(|| node_id.to_string())
}

// Witness cycles repeat the first node at the end; drop the repeat.
fn dedup_cycle(witness: &[Uuid]) -> Vec<Uuid> {
    match witness.split_last() {
        Some((last, rest)) if rest.first() == Some(last) => rest.to_vec(),
        _ => witness.to_vec(),
    }
}
