// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Milestone phases and the value types carried between the grouper, the
//! override applier, and the final result.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::{SkillLevel, SkillType};

/// The four named learning phases, in their fixed output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestonePhase {
    Foundations,
    CoreSkills,
    AdvancedSystems,
    SpecializedTopics,
}

/// Phase order used everywhere milestones are emitted.
pub const PHASE_ORDER: [MilestonePhase; 4] = [
    MilestonePhase::Foundations,
    MilestonePhase::CoreSkills,
    MilestonePhase::AdvancedSystems,
    MilestonePhase::SpecializedTopics,
];

impl MilestonePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            MilestonePhase::Foundations => "foundations",
            MilestonePhase::CoreSkills => "core_skills",
            MilestonePhase::AdvancedSystems => "advanced_systems",
            MilestonePhase::SpecializedTopics => "specialized_topics",
        }
    }

    /// Parse a snake_case phase name.
    pub fn parse(name: &str) -> Option<MilestonePhase> {
        match name {
            "foundations" => Some(MilestonePhase::Foundations),
            "core_skills" => Some(MilestonePhase::CoreSkills),
            "advanced_systems" => Some(MilestonePhase::AdvancedSystems),
            "specialized_topics" => Some(MilestonePhase::SpecializedTopics),
            _ => None,
        }
    }

    /// Human-readable description shown alongside the phase name.
    pub fn description(self) -> &'static str {
        match self {
            MilestonePhase::Foundations => {
                "Core fundamentals and basic concepts, the essential starting point."
            }
            MilestonePhase::CoreSkills => {
                "Practical, production-relevant skills for day-to-day engineering work."
            }
            MilestonePhase::AdvancedSystems => {
                "Complex system design, architecture, and cross-cutting concerns."
            }
            MilestonePhase::SpecializedTopics => {
                "Expert-level and domain-specific repositories for deep specialisation."
            }
        }
    }
}

impl fmt::Display for MilestonePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightweight view of a learning node inside a milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub node_id: Uuid,
    pub repository_id: Uuid,
    pub repository_name: String,
    /// Position in the overall sorted sequence; overrides rewrite it.
    pub order_index: usize,
    pub estimated_hours: u32,
    pub complexity_score: f64,
    pub skill_type: Option<SkillType>,
    pub skill_level: Option<SkillLevel>,
    pub prerequisites: Vec<Uuid>,
    pub is_overridden: bool,
    pub override_reason: Option<String>,
    /// Learner-attached annotations; purely informational.
    pub notes: Vec<String>,
}

/// A named learning phase with its ordered nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneGroup {
    pub phase: MilestonePhase,
    pub nodes: Vec<NodeSummary>,
}

impl MilestoneGroup {
    pub fn new(phase: MilestonePhase) -> Self {
        Self {
            phase,
            nodes: Vec::new(),
        }
    }

    pub fn repository_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn estimated_hours(&self) -> u32 {
        self.nodes.iter().map(|n| n.estimated_hours).sum()
    }
}
