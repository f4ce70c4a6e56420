// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Skill value objects: what a repository teaches and at what depth.
//!
//! [`Skill`] is an immutable value pairing a [`SkillType`] with a
//! [`SkillLevel`]. Levels are totally ordered (basic < intermediate <
//! advanced < expert) and types carry a fixed compatibility table that
//! drives cross-discipline prerequisite inference: a backend repository
//! can precede a data-science repository, but not a mobile one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discipline a repository primarily exercises.
///
/// The derived `Ord` is declaration order; it exists so skills can live in
/// ordered collections, not to rank disciplines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Frontend,
    Backend,
    DataScience,
    Infrastructure,
    Mobile,
    Devops,
    MachineLearning,
    Security,
}

impl SkillType {
    /// All skill types, in declaration order.
    pub const ALL: [SkillType; 8] = [
        SkillType::Frontend,
        SkillType::Backend,
        SkillType::DataScience,
        SkillType::Infrastructure,
        SkillType::Mobile,
        SkillType::Devops,
        SkillType::MachineLearning,
        SkillType::Security,
    ];

    /// Skill types that are compatible predecessors in a learning
    /// progression. Fixed table, built once; no generation code mutates it.
    pub fn compatible_types(self) -> &'static [SkillType] {
        match self {
            SkillType::Frontend => &[SkillType::Backend, SkillType::Mobile],
            SkillType::Backend => &[
                SkillType::Frontend,
                SkillType::DataScience,
                SkillType::Devops,
                SkillType::Security,
            ],
            SkillType::DataScience => &[SkillType::Backend, SkillType::MachineLearning],
            SkillType::Infrastructure => &[
                SkillType::Devops,
                SkillType::Backend,
                SkillType::Security,
            ],
            SkillType::Mobile => &[SkillType::Frontend, SkillType::Backend],
            SkillType::Devops => &[
                SkillType::Infrastructure,
                SkillType::Backend,
                SkillType::Security,
            ],
            SkillType::MachineLearning => &[SkillType::DataScience, SkillType::Backend],
            SkillType::Security => &[
                SkillType::Backend,
                SkillType::Infrastructure,
                SkillType::Devops,
            ],
        }
    }

    /// Whether `other` is in this type's compatibility set.
    pub fn is_compatible_with(self, other: SkillType) -> bool {
        self.compatible_types().contains(&other)
    }

    /// Parse a snake_case name such as `"data_science"`.
    pub fn parse(name: &str) -> Option<SkillType> {
        match name {
            "frontend" => Some(SkillType::Frontend),
            "backend" => Some(SkillType::Backend),
            "data_science" => Some(SkillType::DataScience),
            "infrastructure" => Some(SkillType::Infrastructure),
            "mobile" => Some(SkillType::Mobile),
            "devops" => Some(SkillType::Devops),
            "machine_learning" => Some(SkillType::MachineLearning),
            "security" => Some(SkillType::Security),
            _ => None,
        }
    }

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            SkillType::Frontend => "frontend",
            SkillType::Backend => "backend",
            SkillType::DataScience => "data_science",
            SkillType::Infrastructure => "infrastructure",
            SkillType::Mobile => "mobile",
            SkillType::Devops => "devops",
            SkillType::MachineLearning => "machine_learning",
            SkillType::Security => "security",
        }
    }

    // Difficulty multiplier applied on top of the level base score.
    fn difficulty_multiplier(self) -> f64 {
        match self {
            SkillType::Frontend => 1.0,
            SkillType::Backend => 1.2,
            SkillType::DataScience => 1.4,
            SkillType::Infrastructure => 1.3,
            SkillType::Mobile => 1.1,
            SkillType::Devops => 1.5,
            SkillType::MachineLearning => 1.6,
            SkillType::Security => 1.4,
        }
    }

    // Hour factor applied on top of the level base hours.
    fn hour_factor(self) -> f64 {
        match self {
            SkillType::Frontend => 0.8,
            SkillType::Backend => 1.0,
            SkillType::DataScience => 1.3,
            SkillType::Infrastructure => 1.2,
            SkillType::Mobile => 0.9,
            SkillType::Devops => 1.4,
            SkillType::MachineLearning => 1.5,
            SkillType::Security => 1.3,
        }
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proficiency depth, totally ordered from `Basic` to `Expert`.
///
/// The derived `Ord` follows declaration order, which is the progression
/// order. [`SkillLevel::weight`] is the contribution each level makes to
/// the natural learning priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Priority weight: basic 1, intermediate 3, advanced 5, expert 7.
    pub fn weight(self) -> u32 {
        match self {
            SkillLevel::Basic => 1,
            SkillLevel::Intermediate => 3,
            SkillLevel::Advanced => 5,
            SkillLevel::Expert => 7,
        }
    }

    /// The next level in the progression, or `None` past `Expert`.
    pub fn next_level(self) -> Option<SkillLevel> {
        match self {
            SkillLevel::Basic => Some(SkillLevel::Intermediate),
            SkillLevel::Intermediate => Some(SkillLevel::Advanced),
            SkillLevel::Advanced => Some(SkillLevel::Expert),
            SkillLevel::Expert => None,
        }
    }

    /// Whether a learner at this level may progress to `target`.
    pub fn can_progress_to(self, target: SkillLevel) -> bool {
        self <= target
    }

    /// Parse a snake_case name such as `"intermediate"`.
    pub fn parse(name: &str) -> Option<SkillLevel> {
        match name {
            "basic" => Some(SkillLevel::Basic),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            "expert" => Some(SkillLevel::Expert),
            _ => None,
        }
    }

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Basic => "basic",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }

    // Base difficulty score before the type multiplier.
    fn base_difficulty(self) -> f64 {
        match self {
            SkillLevel::Basic => 2.0,
            SkillLevel::Intermediate => 4.0,
            SkillLevel::Advanced => 7.0,
            SkillLevel::Expert => 9.0,
        }
    }

    // Base learning hours before the type factor.
    fn base_hours(self) -> f64 {
        match self {
            SkillLevel::Basic => 20.0,
            SkillLevel::Intermediate => 40.0,
            SkillLevel::Advanced => 80.0,
            SkillLevel::Expert => 120.0,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable value object pairing a discipline with a proficiency level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Skill {
    pub skill_type: SkillType,
    pub skill_level: SkillLevel,
}

impl Skill {
    pub fn new(skill_type: SkillType, skill_level: SkillLevel) -> Self {
        Self {
            skill_type,
            skill_level,
        }
    }

    /// Whether this skill can act as a prerequisite for `target`.
    ///
    /// Same discipline: any lower-or-equal level qualifies. Compatible
    /// discipline: at least intermediate proficiency is required before a
    /// skill counts as groundwork for a neighbouring field.
    pub fn can_be_prerequisite_for(&self, target: &Skill) -> bool {
        if self.skill_type == target.skill_type {
            return self.skill_level <= target.skill_level;
        }
        if self.skill_type.is_compatible_with(target.skill_type) {
            return self.skill_level >= SkillLevel::Intermediate;
        }
        false
    }

    /// Learning difficulty on a 1..=10 scale.
    pub fn learning_difficulty(&self) -> u32 {
        let difficulty =
            self.skill_level.base_difficulty() * self.skill_type.difficulty_multiplier();
        (difficulty as u32).min(10)
    }

    /// Estimated hours to acquire this skill from scratch.
    pub fn estimate_learning_hours(&self) -> u32 {
        (self.skill_level.base_hours() * self.skill_type.hour_factor()) as u32
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.skill_type, self.skill_level)
    }
}
