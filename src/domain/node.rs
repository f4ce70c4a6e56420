// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Learning nodes: a repository's representation inside one path.
//!
//! Each [`LearningNode`] wraps exactly one repository and carries the
//! path-local state: prerequisite/dependent edges (as node ids), learning
//! status, and progress. Status transitions follow a small state machine:
//!
//! ```text
//! not_started --start(prereqs met)--> in_progress
//! in_progress --progress >= 100----> completed
//! in_progress --skip---------------> skipped
//! not_started --skip---------------> skipped
//! *           --reset (not in_progress)--> not_started
//! ```
//!
//! Starting with unmet prerequisites fails with `InvalidSequence` listing
//! the missing node ids; completing a node that is not in progress fails
//! with `BusinessRule`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::domain::repository::Repository;
use crate::errors::{DomainError, DomainResult};

/// Lifecycle state of a node within its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    NotStarted,
    /// Prerequisites met; the node can start.
    Available,
    InProgress,
    Completed,
    /// Prerequisites not met.
    Blocked,
    Skipped,
}

/// A repository inside one learning path, with local status and progress.
///
/// Equality is by `node_id`. Cross-references to other nodes are ids, not
/// owning references; the owning [`super::LearningPath`] resolves them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningNode {
    pub node_id: Uuid,
    pub repository: Repository,

    /// Node ids that must complete before this node may start.
    pub prerequisite_nodes: BTreeSet<Uuid>,
    /// Node ids that depend on this node.
    pub dependent_nodes: BTreeSet<Uuid>,

    pub status: NodeStatus,
    /// 0..=100.
    pub progress_percentage: f64,
    pub estimated_hours: u32,
    pub actual_hours: f64,
    /// Manual difficulty override, 1..=10.
    pub difficulty_override: Option<u8>,

    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completion_notes: String,
}

impl LearningNode {
    /// Wrap a repository in a fresh node. The hour estimate is seeded from
    /// the repository's derived estimate.
    pub fn new(repository: Repository) -> Self {
        let estimated_hours = repository.learning_hours_estimate;
        Self {
            node_id: Uuid::new_v4(),
            repository,
            prerequisite_nodes: BTreeSet::new(),
            dependent_nodes: BTreeSet::new(),
            status: NodeStatus::NotStarted,
            progress_percentage: 0.0,
            estimated_hours,
            actual_hours: 0.0,
            difficulty_override: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            completion_notes: String::new(),
        }
    }

    /// Set a manual difficulty override in 1..=10.
    pub fn set_difficulty_override(&mut self, difficulty: u8) -> DomainResult<()> {
        if !(1..=10).contains(&difficulty) {
            return Err(DomainError::validation(
                "difficulty_override",
                "difficulty override must be between 1 and 10",
            ));
        }
        self.difficulty_override = Some(difficulty);
        Ok(())
    }

    /// Add a prerequisite edge.
    ///
    /// Self-edges and edges contradicting an existing dependent edge (an
    /// immediate two-node cycle) are rejected.
    pub fn add_prerequisite(&mut self, prerequisite_id: Uuid) -> DomainResult<()> {
        if prerequisite_id == self.node_id {
            return Err(DomainError::business_rule(
                "node cannot be its own prerequisite",
            ));
        }
        if self.dependent_nodes.contains(&prerequisite_id) {
            return Err(DomainError::business_rule(
                "node is already a dependent; adding it as prerequisite would create a cycle",
            ));
        }
        self.prerequisite_nodes.insert(prerequisite_id);
        self.refresh_availability();
        Ok(())
    }

    /// Add a dependent edge. Mirror-image rules of
    /// [`LearningNode::add_prerequisite`].
    pub fn add_dependent(&mut self, dependent_id: Uuid) -> DomainResult<()> {
        if dependent_id == self.node_id {
            return Err(DomainError::business_rule("node cannot depend on itself"));
        }
        if self.prerequisite_nodes.contains(&dependent_id) {
            return Err(DomainError::business_rule(
                "node is already a prerequisite; adding it as dependent would create a cycle",
            ));
        }
        self.dependent_nodes.insert(dependent_id);
        Ok(())
    }

    /// Whether the node may start given the set of completed node ids.
    pub fn can_start(&self, completed: &BTreeSet<Uuid>) -> bool {
        if matches!(self.status, NodeStatus::Completed | NodeStatus::InProgress) {
            return false;
        }
        self.prerequisite_nodes.is_subset(completed)
    }

    /// Transition to `InProgress`.
    ///
    /// Fails with `InvalidSequence` (listing the missing prerequisite ids)
    /// when prerequisites are unmet, and with `BusinessRule` when the node
    /// is already completed or in progress.
    pub fn start(&mut self, completed: &BTreeSet<Uuid>) -> DomainResult<()> {
        if self.status == NodeStatus::Completed {
            return Err(DomainError::business_rule("cannot restart a completed node"));
        }
        if self.status == NodeStatus::InProgress {
            return Err(DomainError::business_rule("node is already in progress"));
        }
        if !self.prerequisite_nodes.is_subset(completed) {
            let missing: Vec<String> = self
                .prerequisite_nodes
                .difference(completed)
                .map(|id| id.to_string())
                .collect();
            return Err(DomainError::InvalidSequence {
                message: format!(
                    "node {} has unmet prerequisites",
                    self.repository.name
                ),
                affected_nodes: missing,
            });
        }
        self.status = NodeStatus::InProgress;
        self.started_at = Some(Utc::now());
        self.progress_percentage = 0.0;
        Ok(())
    }

    /// Record progress; auto-completes at 100%.
    pub fn update_progress(&mut self, percentage: f64, hours_spent: f64) -> DomainResult<()> {
        if !(0.0..=100.0).contains(&percentage) {
            return Err(DomainError::validation(
                "progress_percentage",
                "progress must be between 0 and 100",
            ));
        }
        if self.status != NodeStatus::InProgress {
            return Err(DomainError::business_rule(
                "progress can only be updated for in-progress nodes",
            ));
        }
        self.progress_percentage = percentage;
        self.actual_hours += hours_spent;
        if percentage >= 100.0 {
            self.complete("")?;
        }
        Ok(())
    }

    /// Transition to `Completed`. Only legal from `InProgress`.
    pub fn complete(&mut self, notes: &str) -> DomainResult<()> {
        if self.status != NodeStatus::InProgress {
            return Err(DomainError::business_rule(
                "only in-progress nodes can be completed",
            ));
        }
        self.status = NodeStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.progress_percentage = 100.0;
        self.completion_notes = notes.to_string();
        Ok(())
    }

    /// Transition to `Skipped`. Completed nodes cannot be skipped.
    pub fn skip(&mut self, reason: &str) -> DomainResult<()> {
        if self.status == NodeStatus::Completed {
            return Err(DomainError::business_rule("cannot skip a completed node"));
        }
        self.status = NodeStatus::Skipped;
        self.completion_notes = format!("Skipped: {reason}");
        self.progress_percentage = 0.0;
        Ok(())
    }

    /// Return to `NotStarted`, clearing progress. Forbidden while the node
    /// is in progress.
    pub fn reset(&mut self) -> DomainResult<()> {
        if self.status == NodeStatus::InProgress {
            return Err(DomainError::business_rule("cannot reset an in-progress node"));
        }
        self.status = NodeStatus::NotStarted;
        self.progress_percentage = 0.0;
        self.actual_hours = 0.0;
        self.started_at = None;
        self.completed_at = None;
        self.completion_notes.clear();
        Ok(())
    }

    /// Difficulty with the manual override honored.
    pub fn effective_difficulty(&self) -> u8 {
        match self.difficulty_override {
            Some(value) => value,
            None => self.repository.complexity_score as u8,
        }
    }

    // Blocked/available is derived from whether prerequisites exist; the
    // terminal and active statuses are left alone.
    fn refresh_availability(&mut self) {
        if matches!(
            self.status,
            NodeStatus::Completed | NodeStatus::InProgress | NodeStatus::Skipped
        ) {
            return;
        }
        self.status = if self.prerequisite_nodes.is_empty() {
            NodeStatus::Available
        } else {
            NodeStatus::Blocked
        };
    }
}

impl PartialEq for LearningNode {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id
    }
}

impl Eq for LearningNode {}

impl fmt::Display for LearningNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LearningNode({}, {:?})",
            self.repository.name, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::Repository;

    fn node(name: &str) -> LearningNode {
        LearningNode::new(Repository::new(name, format!("/repos/{name}"), "python").unwrap())
    }

    #[test]
    fn test_self_prerequisite_rejected() {
        let mut n = node("a");
        let own_id = n.node_id;
        assert!(n.add_prerequisite(own_id).is_err());
    }

    #[test]
    fn test_two_cycle_at_node_level_rejected() {
        let mut n = node("a");
        let other = Uuid::new_v4();
        n.add_dependent(other).unwrap();
        assert!(n.add_prerequisite(other).is_err());
    }

    #[test]
    fn test_start_with_unmet_prerequisites_lists_missing_ids() {
        let mut n = node("a");
        let prereq = Uuid::new_v4();
        n.add_prerequisite(prereq).unwrap();

        let err = n.start(&BTreeSet::new()).unwrap_err();
        match err {
            DomainError::InvalidSequence { affected_nodes, .. } => {
                assert_eq!(affected_nodes, vec![prereq.to_string()]);
            }
            other => panic!("expected InvalidSequence, got {other:?}"),
        }
    }

    #[test]
    fn test_start_succeeds_once_prerequisites_complete() {
        let mut n = node("a");
        let prereq = Uuid::new_v4();
        n.add_prerequisite(prereq).unwrap();
        assert_eq!(n.status, NodeStatus::Blocked);

        let mut completed = BTreeSet::new();
        completed.insert(prereq);
        n.start(&completed).unwrap();
        assert_eq!(n.status, NodeStatus::InProgress);
        assert!(n.started_at.is_some());
    }

    #[test]
    fn test_progress_auto_completes_at_100() {
        let mut n = node("a");
        n.start(&BTreeSet::new()).unwrap();
        n.update_progress(50.0, 2.0).unwrap();
        assert_eq!(n.status, NodeStatus::InProgress);
        n.update_progress(100.0, 1.5).unwrap();
        assert_eq!(n.status, NodeStatus::Completed);
        assert!((n.actual_hours - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_complete_requires_in_progress() {
        let mut n = node("a");
        assert!(matches!(
            n.complete("done"),
            Err(DomainError::BusinessRule { .. })
        ));
    }

    #[test]
    fn test_skip_from_not_started_and_in_progress() {
        let mut fresh = node("a");
        fresh.skip("not relevant").unwrap();
        assert_eq!(fresh.status, NodeStatus::Skipped);

        let mut active = node("b");
        active.start(&BTreeSet::new()).unwrap();
        active.skip("changed plans").unwrap();
        assert_eq!(active.status, NodeStatus::Skipped);
    }

    #[test]
    fn test_completed_node_cannot_be_skipped_or_restarted() {
        let mut n = node("a");
        n.start(&BTreeSet::new()).unwrap();
        n.complete("").unwrap();
        assert!(n.skip("too late").is_err());
        assert!(n.start(&BTreeSet::new()).is_err());
    }

    #[test]
    fn test_reset_forbidden_while_in_progress() {
        let mut n = node("a");
        n.start(&BTreeSet::new()).unwrap();
        assert!(n.reset().is_err());
        n.complete("").unwrap();
        n.reset().unwrap();
        assert_eq!(n.status, NodeStatus::NotStarted);
        assert_eq!(n.progress_percentage, 0.0);
    }

    #[test]
    fn test_difficulty_override_bounds() {
        let mut n = node("a");
        assert!(n.set_difficulty_override(0).is_err());
        assert!(n.set_difficulty_override(11).is_err());
        n.set_difficulty_override(7).unwrap();
        assert_eq!(n.effective_difficulty(), 7);
    }
}
