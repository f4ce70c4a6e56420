// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Milestone grouping: from a sorted node sequence to named phases.
//!
//! Phase assignment is skill-first: a node with a primary skill maps its
//! level directly (basic to foundations, intermediate to core skills,
//! advanced to advanced systems, expert to specialized topics). Only
//! skill-less nodes fall back to complexity bands (`<3`, `<5`, `<7`,
//! `>=7`). Skill evidence beats complexity evidence, so a basic-level
//! repository lands in foundations no matter how complex it measures.
//!
//! The grouper never reorders: within each phase nodes keep their relative
//! order from the sorter, and the concatenation of the produced groups
//! equals the input sequence. Empty phases are omitted.

use crate::domain::{LearningNode, SkillLevel};
use crate::engine::milestone::{MilestoneGroup, MilestonePhase, NodeSummary, PHASE_ORDER};

/// Partitions sorted nodes into milestone phases.
#[derive(Debug, Default)]
pub struct MilestoneGrouper;

impl MilestoneGrouper {
    pub fn new() -> Self {
        Self
    }

    /// Assign each node to a phase and return the non-empty groups in
    /// fixed phase order.
    pub fn group(&self, sorted_nodes: &[LearningNode]) -> Vec<MilestoneGroup> {
        let mut buckets: Vec<MilestoneGroup> =
            PHASE_ORDER.iter().map(|p| MilestoneGroup::new(*p)).collect();

        for (order_index, node) in sorted_nodes.iter().enumerate() {
            let phase = assign_phase(node);
            let slot = PHASE_ORDER.iter().position(|p| *p == phase).unwrap_or(0);
            buckets[slot].nodes.push(summarize(node, order_index));
        }

        buckets.retain(|group| !group.nodes.is_empty());
        buckets
    }
}

/// Map a node to its milestone phase.
pub fn assign_phase(node: &LearningNode) -> MilestonePhase {
    if let Some(skill) = &node.repository.primary_skill {
        return match skill.skill_level {
            SkillLevel::Basic => MilestonePhase::Foundations,
            SkillLevel::Intermediate => MilestonePhase::CoreSkills,
            SkillLevel::Advanced => MilestonePhase::AdvancedSystems,
            SkillLevel::Expert => MilestonePhase::SpecializedTopics,
        };
    }

    match node.repository.complexity_score {
        c if c < 3.0 => MilestonePhase::Foundations,
        c if c < 5.0 => MilestonePhase::CoreSkills,
        c if c < 7.0 => MilestonePhase::AdvancedSystems,
        _ => MilestonePhase::SpecializedTopics,
    }
}

fn summarize(node: &LearningNode, order_index: usize) -> NodeSummary {
    let skill = node.repository.primary_skill;
    NodeSummary {
        node_id: node.node_id,
        repository_id: node.repository.repository_id,
        repository_name: node.repository.name.clone(),
        order_index,
        estimated_hours: node.estimated_hours,
        complexity_score: node.repository.complexity_score,
        skill_type: skill.map(|s| s.skill_type),
        skill_level: skill.map(|s| s.skill_level),
        prerequisites: node.prerequisite_nodes.iter().copied().collect(),
        is_overridden: false,
        override_reason: None,
        notes: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LearningNode, Repository, Skill, SkillType};

    fn node_with_skill(name: &str, level: SkillLevel) -> LearningNode {
        let mut repo = Repository::new(name, format!("/repos/{name}"), "python").unwrap();
        repo.set_primary_skill(Skill::new(SkillType::Backend, level)).unwrap();
        LearningNode::new(repo)
    }

    fn node_with_complexity(name: &str, complexity: f64) -> LearningNode {
        let mut repo = Repository::new(name, format!("/repos/{name}"), "python").unwrap();
        repo.complexity_score = complexity;
        LearningNode::new(repo)
    }

    #[test]
    fn test_skill_levels_map_to_phases() {
        let nodes = vec![
            node_with_skill("a", SkillLevel::Basic),
            node_with_skill("b", SkillLevel::Intermediate),
            node_with_skill("c", SkillLevel::Advanced),
            node_with_skill("d", SkillLevel::Expert),
        ];
        let groups = MilestoneGrouper::new().group(&nodes);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].phase, MilestonePhase::Foundations);
        assert_eq!(groups[1].phase, MilestonePhase::CoreSkills);
        assert_eq!(groups[2].phase, MilestonePhase::AdvancedSystems);
        assert_eq!(groups[3].phase, MilestonePhase::SpecializedTopics);
        for group in &groups {
            assert_eq!(group.repository_count(), 1);
        }
    }

    #[test]
    fn test_complexity_fallback_bands() {
        let nodes = vec![
            node_with_complexity("a", 2.0),
            node_with_complexity("b", 4.0),
            node_with_complexity("c", 6.5),
            node_with_complexity("d", 9.0),
        ];
        let groups = MilestoneGrouper::new().group(&nodes);
        let phases: Vec<MilestonePhase> = groups.iter().map(|g| g.phase).collect();
        assert_eq!(
            phases,
            vec![
                MilestonePhase::Foundations,
                MilestonePhase::CoreSkills,
                MilestonePhase::AdvancedSystems,
                MilestonePhase::SpecializedTopics,
            ]
        );
    }

    #[test]
    fn test_skill_evidence_beats_complexity() {
        let mut node = node_with_skill("a", SkillLevel::Basic);
        node.repository.complexity_score = 9.5;
        assert_eq!(assign_phase(&node), MilestonePhase::Foundations);
    }

    #[test]
    fn test_empty_phases_omitted_and_order_preserved() {
        let nodes = vec![
            node_with_skill("a", SkillLevel::Expert),
            node_with_skill("b", SkillLevel::Basic),
            node_with_skill("c", SkillLevel::Basic),
        ];
        let groups = MilestoneGrouper::new().group(&nodes);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].phase, MilestonePhase::Foundations);
        let names: Vec<&str> = groups[0]
            .nodes
            .iter()
            .map(|n| n.repository_name.as_str())
            .collect();
        // b before c, as in the input.
        assert_eq!(names, vec!["b", "c"]);
        assert_eq!(groups[1].phase, MilestonePhase::SpecializedTopics);
    }

    #[test]
    fn test_concatenated_groups_equal_input_sequence() {
        let nodes = vec![
            node_with_skill("a", SkillLevel::Basic),
            node_with_complexity("b", 6.0),
            node_with_skill("c", SkillLevel::Expert),
            node_with_complexity("d", 1.0),
        ];
        let groups = MilestoneGrouper::new().group(&nodes);
        let mut flattened: Vec<usize> = groups
            .iter()
            .flat_map(|g| g.nodes.iter().map(|n| n.order_index))
            .collect();
        flattened.sort_unstable();
        assert_eq!(flattened, vec![0, 1, 2, 3]);

        let total: usize = groups.iter().map(|g| g.repository_count()).sum();
        assert_eq!(total, nodes.len());
    }

    #[test]
    fn test_empty_input_produces_no_groups() {
        assert!(MilestoneGrouper::new().group(&[]).is_empty());
    }
}
