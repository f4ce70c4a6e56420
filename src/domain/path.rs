// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Learning-path aggregate root.
//!
//! A [`LearningPath`] owns its node list and its dependency-relation set;
//! everything else is referenced by identifier. The aggregate maintains
//! two standing invariants across mutations:
//!
//! 1. The graph induced by *blocking* relations is acyclic. A blocking
//!    insertion that would close a cycle is rolled back and rejected with
//!    the witness cycle. Advisory relations (recommended, related,
//!    alternative, weak) may form cycles; the sorter recovers from those.
//! 2. Derived totals (`total_repositories`, `total_estimated_hours`,
//!    `completion_percentage`) are recomputed after every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

use crate::domain::dependency_graph::NodeGraph;
use crate::domain::node::{LearningNode, NodeStatus};
use crate::domain::relation::{
    DependencyRelation, DependencyStrength, DependencyType, RelationOrigin,
};
use crate::domain::repository::Repository;
use crate::errors::{DomainError, DomainResult};

/// Lifecycle of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    Draft,
    Active,
    Completed,
    Archived,
}

impl PathStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PathStatus::Draft => "draft",
            PathStatus::Active => "active",
            PathStatus::Completed => "completed",
            PathStatus::Archived => "archived",
        }
    }
}

/// Aggregate statistics derived from a path's nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStatistics {
    pub total_repositories: usize,
    pub completed_repositories: usize,
    pub in_progress_repositories: usize,
    pub total_estimated_hours: u32,
    pub completed_hours: u32,
    pub remaining_hours: u32,
    pub average_complexity: f64,
}

/// An ordered learning path for one learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPath {
    pub path_id: Uuid,
    pub learner_id: String,
    pub name: String,
    pub description: String,

    /// Ordered node sequence; after sorting, a topologically valid order
    /// with respect to the prerequisite edges.
    pub nodes: Vec<LearningNode>,
    /// Dependency relations, unique per (source, target) repository pair.
    pub dependencies: Vec<DependencyRelation>,

    pub status: PathStatus,
    pub allow_parallel_learning: bool,
    /// At least 1.
    pub max_parallel_nodes: u32,

    // Derived.
    pub total_repositories: usize,
    pub total_estimated_hours: u32,
    pub completion_percentage: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_optimized_at: Option<DateTime<Utc>>,
}

impl LearningPath {
    /// Create an empty path, validating name, learner id, and the parallel
    /// node limit.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        learner_id: impl Into<String>,
        allow_parallel_learning: bool,
        max_parallel_nodes: u32,
    ) -> DomainResult<Self> {
        let name = name.into();
        let learner_id = learner_id.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation(
                "name",
                "learning path name cannot be empty",
            ));
        }
        if learner_id.trim().is_empty() {
            return Err(DomainError::validation(
                "learner_id",
                "learner id cannot be empty",
            ));
        }
        if max_parallel_nodes < 1 {
            return Err(DomainError::validation(
                "max_parallel_nodes",
                "at least 1 parallel node must be allowed",
            ));
        }
        let now = Utc::now();
        Ok(Self {
            path_id: Uuid::new_v4(),
            learner_id,
            name,
            description: description.into(),
            nodes: Vec::new(),
            dependencies: Vec::new(),
            status: PathStatus::Draft,
            allow_parallel_learning,
            max_parallel_nodes,
            total_repositories: 0,
            total_estimated_hours: 0,
            completion_percentage: 0.0,
            created_at: now,
            updated_at: now,
            last_optimized_at: None,
        })
    }

    /// Add a repository as a new node at the end of the sequence.
    ///
    /// Returns the new node's id. Fails with `BusinessRule` when a node
    /// for the same repository (by path) already exists.
    pub fn add_repository(&mut self, repository: Repository) -> DomainResult<Uuid> {
        if self
            .nodes
            .iter()
            .any(|n| n.repository.path == repository.path)
        {
            return Err(DomainError::business_rule(format!(
                "repository {} is already in the learning path",
                repository.name
            )));
        }
        let node = LearningNode::new(repository);
        let node_id = node.node_id;
        self.nodes.push(node);
        self.recalculate_metrics();
        self.touch();
        Ok(node_id)
    }

    /// Remove a node. Refuses while other nodes list it as a prerequisite.
    pub fn remove_node(&mut self, node_id: Uuid) -> DomainResult<bool> {
        let Some(node) = self.node(node_id) else {
            return Ok(false);
        };
        let repository_id = node.repository.repository_id;

        let dependents: Vec<&str> = self
            .nodes
            .iter()
            .filter(|n| n.prerequisite_nodes.contains(&node_id))
            .map(|n| n.repository.name.as_str())
            .collect();
        if !dependents.is_empty() {
            return Err(DomainError::business_rule(format!(
                "cannot remove node: required by {}",
                dependents.join(", ")
            )));
        }

        self.nodes.retain(|n| n.node_id != node_id);
        self.dependencies.retain(|d| {
            d.source_repository_id != repository_id && d.target_repository_id != repository_id
        });
        for node in &mut self.nodes {
            node.dependent_nodes.remove(&node_id);
        }
        self.recalculate_metrics();
        self.touch();
        Ok(true)
    }

    /// Add a dependency relation between two nodes.
    ///
    /// For blocking relations the prerequisite edge is installed on the
    /// target node and the blocking graph is re-checked for cycles; a
    /// violating insertion is fully rolled back and reported with the
    /// witness cycle. Relations over an already-connected pair are
    /// rejected as duplicates.
    pub fn add_dependency(
        &mut self,
        source_node_id: Uuid,
        target_node_id: Uuid,
        dependency_type: DependencyType,
        strength: DependencyStrength,
        created_by: RelationOrigin,
    ) -> DomainResult<Uuid> {
        let source_repo = self
            .node(source_node_id)
            .map(|n| n.repository.repository_id)
            .ok_or_else(|| DomainError::validation("source_node_id", "source node not found"))?;
        let target_repo = self
            .node(target_node_id)
            .map(|n| n.repository.repository_id)
            .ok_or_else(|| DomainError::validation("target_node_id", "target node not found"))?;

        let relation = DependencyRelation::new(
            source_repo,
            target_repo,
            dependency_type,
            strength,
            created_by,
            1.0,
        )?;
        if self.dependencies.iter().any(|d| *d == relation) {
            return Err(DomainError::Duplicate {
                entity: "dependency_relation".into(),
                identifier: format!("{source_repo} -> {target_repo}"),
            });
        }

        let blocking = relation.is_blocking();
        let relation_id = relation.relation_id;
        self.dependencies.push(relation);

        if blocking {
            if let Err(err) = self.install_blocking_edge(source_node_id, target_node_id) {
                self.dependencies.pop();
                return Err(err);
            }
            if let Some(cycle) = self.blocking_graph().find_cycle() {
                // Roll back: the blocking graph must stay acyclic.
                self.dependencies.pop();
                self.uninstall_blocking_edge(source_node_id, target_node_id);
                return Err(DomainError::CircularDependency {
                    cycle: cycle.iter().map(|id| id.to_string()).collect(),
                });
            }
        }

        self.touch();
        Ok(relation_id)
    }

    /// Remove the relation between two repositories, together with the
    /// prerequisite/dependent entries it installed. Used by cycle
    /// recovery. Returns whether a relation was removed.
    pub fn remove_relation_between(&mut self, source_repo: Uuid, target_repo: Uuid) -> bool {
        let before = self.dependencies.len();
        self.dependencies.retain(|d| {
            !(d.source_repository_id == source_repo && d.target_repository_id == target_repo)
        });
        if self.dependencies.len() == before {
            return false;
        }

        let source_node = self.node_id_for_repository(source_repo);
        let target_node = self.node_id_for_repository(target_repo);
        if let (Some(source), Some(target)) = (source_node, target_node) {
            self.uninstall_blocking_edge(source, target);
        }
        self.touch();
        true
    }

    /// Look up a node by id.
    pub fn node(&self, node_id: Uuid) -> Option<&LearningNode> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }

    /// Look up a node mutably by id.
    pub fn node_mut(&mut self, node_id: Uuid) -> Option<&mut LearningNode> {
        self.nodes.iter_mut().find(|n| n.node_id == node_id)
    }

    /// Node id carrying a given repository.
    pub fn node_id_for_repository(&self, repository_id: Uuid) -> Option<Uuid> {
        self.nodes
            .iter()
            .find(|n| n.repository.repository_id == repository_id)
            .map(|n| n.node_id)
    }

    /// Graph over the prerequisite (blocking) edges only.
    pub fn blocking_graph(&self) -> NodeGraph {
        let mut graph = NodeGraph::new();
        for node in &self.nodes {
            graph.add_node(node.node_id);
        }
        for node in &self.nodes {
            for prerequisite in &node.prerequisite_nodes {
                graph.add_edge(*prerequisite, node.node_id);
            }
        }
        graph
    }

    /// Graph over the full relation set, blocking and advisory alike,
    /// mapped to node ids. This is the graph the sorter orders over.
    pub fn relation_graph(&self) -> NodeGraph {
        let repo_to_node: BTreeMap<Uuid, Uuid> = self
            .nodes
            .iter()
            .map(|n| (n.repository.repository_id, n.node_id))
            .collect();

        let mut graph = NodeGraph::new();
        for node in &self.nodes {
            graph.add_node(node.node_id);
        }
        for relation in &self.dependencies {
            if let (Some(source), Some(target)) = (
                repo_to_node.get(&relation.source_repository_id),
                repo_to_node.get(&relation.target_repository_id),
            ) {
                graph.add_edge(*source, *target);
            }
        }
        graph
    }

    /// Nodes that can be started next, respecting prerequisites and the
    /// parallel learning limits, ordered by natural learning priority.
    pub fn next_available_nodes(&self) -> Vec<&LearningNode> {
        let completed: BTreeSet<Uuid> = self
            .nodes
            .iter()
            .filter(|n| n.status == NodeStatus::Completed)
            .map(|n| n.node_id)
            .collect();
        let in_progress = self
            .nodes
            .iter()
            .filter(|n| n.status == NodeStatus::InProgress)
            .count();

        if !self.allow_parallel_learning && in_progress > 0 {
            return Vec::new();
        }
        if self.allow_parallel_learning && in_progress >= self.max_parallel_nodes as usize {
            return Vec::new();
        }

        let mut available: Vec<&LearningNode> = self
            .nodes
            .iter()
            .filter(|n| {
                matches!(n.status, NodeStatus::NotStarted | NodeStatus::Available)
                    && n.can_start(&completed)
            })
            .collect();
        available.sort_by_key(|n| (n.repository.recommended_order(), n.node_id));
        available
    }

    /// Aggregate statistics over the current node set.
    pub fn learning_statistics(&self) -> LearningStatistics {
        let total = self.nodes.len();
        let completed = self
            .nodes
            .iter()
            .filter(|n| n.status == NodeStatus::Completed)
            .count();
        let in_progress = self
            .nodes
            .iter()
            .filter(|n| n.status == NodeStatus::InProgress)
            .count();
        let total_hours: u32 = self.nodes.iter().map(|n| n.estimated_hours).sum();
        let completed_hours: u32 = self
            .nodes
            .iter()
            .filter(|n| n.status == NodeStatus::Completed)
            .map(|n| n.estimated_hours)
            .sum();
        let average_complexity = if total > 0 {
            self.nodes
                .iter()
                .map(|n| n.repository.complexity_score)
                .sum::<f64>()
                / total as f64
        } else {
            0.0
        };

        LearningStatistics {
            total_repositories: total,
            completed_repositories: completed,
            in_progress_repositories: in_progress,
            total_estimated_hours: total_hours,
            completed_hours,
            remaining_hours: total_hours - completed_hours,
            average_complexity,
        }
    }

    /// Count of nodes per primary skill type name.
    pub fn skill_distribution(&self) -> BTreeMap<String, usize> {
        let mut distribution = BTreeMap::new();
        for node in &self.nodes {
            if let Some(skill) = &node.repository.primary_skill {
                *distribution
                    .entry(skill.skill_type.as_str().to_string())
                    .or_insert(0) += 1;
            }
        }
        distribution
    }

    /// Recompute the derived totals. Public so ordering passes that
    /// rewrite `nodes` wholesale can restore the invariant.
    pub fn recalculate_metrics(&mut self) {
        self.total_repositories = self.nodes.len();
        self.total_estimated_hours = self.nodes.iter().map(|n| n.estimated_hours).sum();
        self.completion_percentage = if self.total_repositories > 0 {
            let completed = self
                .nodes
                .iter()
                .filter(|n| n.status == NodeStatus::Completed)
                .count();
            completed as f64 / self.total_repositories as f64 * 100.0
        } else {
            0.0
        };
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn install_blocking_edge(&mut self, source: Uuid, target: Uuid) -> DomainResult<()> {
        // Order matters for rollback: prerequisite first, dependent second.
        self.node_mut(target)
            .ok_or_else(|| DomainError::validation("target_node_id", "target node not found"))?
            .add_prerequisite(source)?;
        if let Err(err) = self
            .node_mut(source)
            .ok_or_else(|| DomainError::validation("source_node_id", "source node not found"))?
            .add_dependent(target)
        {
            if let Some(node) = self.node_mut(target) {
                node.prerequisite_nodes.remove(&source);
            }
            return Err(err);
        }
        Ok(())
    }

    fn uninstall_blocking_edge(&mut self, source: Uuid, target: Uuid) {
        if let Some(node) = self.node_mut(target) {
            node.prerequisite_nodes.remove(&source);
        }
        if let Some(node) = self.node_mut(source) {
            node.dependent_nodes.remove(&target);
        }
    }
}

impl fmt::Display for LearningPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LearningPath({}, {} repos, {:.1}% complete)",
            self.name, self.total_repositories, self.completion_percentage
        )
    }
}
