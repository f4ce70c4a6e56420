// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Learner overrides applied over the grouped path.
//!
//! An [`OverrideInstruction`] is a persisted, learner-specific instruction
//! that adjusts a generated path after milestone grouping: skip a
//! repository, pin a node to a position, force it into another phase, or
//! attach a note. [`OverrideApplier::apply`] replays the instructions in
//! input order over a *copy* of the phase list, so later overrides observe
//! earlier effects and the caller's input is never mutated.
//!
//! Failures are soft: an override naming an unknown repository or an
//! unknown phase is logged, recorded as a warning, and skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::milestone::{MilestoneGroup, MilestonePhase, PHASE_ORDER};
use crate::observability::messages::overrides::{OverrideApplied, OverrideIgnored};
use crate::observability::messages::StructuredLog;

/// What an override does to its target node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverrideKind {
    /// Remove the node from every phase.
    Skip,
    /// Pin the node's `order_index`; phases re-sort stably afterwards.
    Reorder { target_index: usize },
    /// Move the node to the tail of the named phase. The name is kept as
    /// text so unknown phases degrade to a warning instead of an error.
    ForcePhase { phase: String },
    /// Attach a note; no structural change.
    Note { text: String },
}

impl OverrideKind {
    fn name(&self) -> &'static str {
        match self {
            OverrideKind::Skip => "skip",
            OverrideKind::Reorder { .. } => "reorder",
            OverrideKind::ForcePhase { .. } => "force_phase",
            OverrideKind::Note { .. } => "note",
        }
    }

    fn default_reason(&self) -> String {
        match self {
            OverrideKind::Skip => "Skipped by learner".into(),
            OverrideKind::Reorder { .. } => "Manual reorder".into(),
            OverrideKind::ForcePhase { phase } => format!("Moved to {phase}"),
            OverrideKind::Note { .. } => "Note added".into(),
        }
    }
}

/// One persisted override for one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideInstruction {
    pub override_id: Uuid,
    pub learner_id: String,
    pub repository_id: Uuid,
    #[serde(flatten)]
    pub kind: OverrideKind,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OverrideInstruction {
    pub fn new(learner_id: impl Into<String>, repository_id: Uuid, kind: OverrideKind) -> Self {
        Self {
            override_id: Uuid::new_v4(),
            learner_id: learner_id.into(),
            repository_id,
            kind,
            reason: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Applies override instructions to milestone groups.
#[derive(Debug, Default)]
pub struct OverrideApplier;

impl OverrideApplier {
    pub fn new() -> Self {
        Self
    }

    /// Apply `overrides` in order over a copy of `milestones`.
    ///
    /// Returns the new phase list; diagnostics for ignored overrides are
    /// appended to `warnings`. An empty override list returns the input
    /// unchanged.
    pub fn apply(
        &self,
        milestones: &[MilestoneGroup],
        overrides: &[OverrideInstruction],
        warnings: &mut Vec<String>,
    ) -> Vec<MilestoneGroup> {
        let mut groups: Vec<MilestoneGroup> = milestones.to_vec();
        if overrides.is_empty() {
            return groups;
        }

        for instruction in overrides {
            self.apply_one(&mut groups, instruction, warnings);
        }

        // Stable re-sort each phase by order_index, then drop phases the
        // overrides emptied and normalise phase order.
        for group in &mut groups {
            group.nodes.sort_by_key(|n| n.order_index);
        }
        let mut output = Vec::with_capacity(groups.len());
        for phase in PHASE_ORDER {
            if let Some(position) = groups.iter().position(|g| g.phase == phase) {
                let group = groups.remove(position);
                if !group.nodes.is_empty() {
                    output.push(group);
                }
            }
        }
        output
    }

    fn apply_one(
        &self,
        groups: &mut Vec<MilestoneGroup>,
        instruction: &OverrideInstruction,
        warnings: &mut Vec<String>,
    ) {
        let located = locate(groups, instruction.repository_id);
        let Some((group_index, node_index)) = located else {
            OverrideIgnored {
                repository_id: instruction.repository_id,
                reason: "repository not present in the generated path",
            }
            .log();
            warnings.push(format!(
                "Ignored {} override: repository {} not present in the generated path",
                instruction.kind.name(),
                instruction.repository_id
            ));
            return;
        };

        let reason = instruction
            .reason
            .clone()
            .unwrap_or_else(|| instruction.kind.default_reason());

        match &instruction.kind {
            OverrideKind::Skip => {
                let removed = groups[group_index].nodes.remove(node_index);
                OverrideApplied {
                    kind: "skip",
                    repository_name: &removed.repository_name,
                }
                .log();
            }
            OverrideKind::Reorder { target_index } => {
                let node = &mut groups[group_index].nodes[node_index];
                node.order_index = *target_index;
                node.is_overridden = true;
                node.override_reason = Some(reason);
                OverrideApplied {
                    kind: "reorder",
                    repository_name: &node.repository_name,
                }
                .log();
            }
            OverrideKind::ForcePhase { phase } => {
                let Some(target_phase) = MilestonePhase::parse(phase) else {
                    OverrideIgnored {
                        repository_id: instruction.repository_id,
                        reason: "unknown milestone phase",
                    }
                    .log();
                    warnings.push(format!(
                        "Ignored force_phase override: unknown milestone phase '{phase}'"
                    ));
                    return;
                };

                let mut node = groups[group_index].nodes.remove(node_index);
                node.is_overridden = true;
                node.override_reason = Some(reason);
                // Re-index one past the target's current tail so the
                // closing stable re-sort keeps the node at the tail.
                let target = ensure_group(groups, target_phase);
                let tail_index = target
                    .nodes
                    .iter()
                    .map(|n| n.order_index + 1)
                    .max()
                    .unwrap_or(0);
                node.order_index = tail_index;
                OverrideApplied {
                    kind: "force_phase",
                    repository_name: &node.repository_name,
                }
                .log();
                target.nodes.push(node);
            }
            OverrideKind::Note { text } => {
                let node = &mut groups[group_index].nodes[node_index];
                node.notes.push(text.clone());
                node.is_overridden = true;
                node.override_reason = Some(reason);
                OverrideApplied {
                    kind: "note",
                    repository_name: &node.repository_name,
                }
                .log();
            }
        }
    }
}

// Find the (group, node) indices of a repository.
fn locate(groups: &[MilestoneGroup], repository_id: Uuid) -> Option<(usize, usize)> {
    for (group_index, group) in groups.iter().enumerate() {
        if let Some(node_index) = group
            .nodes
            .iter()
            .position(|n| n.repository_id == repository_id)
        {
            return Some((group_index, node_index));
        }
    }
    None
}

// Get the group for a phase, creating it if the grouper omitted it.
fn ensure_group(groups: &mut Vec<MilestoneGroup>, phase: MilestonePhase) -> &mut MilestoneGroup {
    let position = match groups.iter().position(|g| g.phase == phase) {
        Some(position) => position,
        None => {
            groups.push(MilestoneGroup::new(phase));
            groups.len() - 1
        }
    };
    &mut groups[position]
}
