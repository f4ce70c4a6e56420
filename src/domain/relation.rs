// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency relations between repositories.
//!
//! A [`DependencyRelation`] is a directed edge from a source repository to
//! a target that should be learned after it. Identity is the
//! (source, target) pair; two relations over the same pair are the same
//! relation regardless of type or strength. Only *blocking* relations
//! (prerequisite edges of strong or critical strength) constrain the
//! topological order; everything else is advisory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// How the source relates to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// Source must be learned before target.
    Prerequisite,
    /// Source helps with learning target.
    Recommended,
    /// Source and target cover related ground.
    Related,
    /// Source or target suffices; both are not needed.
    Alternative,
}

impl DependencyType {
    fn impact(self) -> f64 {
        match self {
            DependencyType::Prerequisite => 1.0,
            DependencyType::Recommended => 0.7,
            DependencyType::Related => 0.4,
            DependencyType::Alternative => 0.2,
        }
    }
}

/// How firmly the relation holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStrength {
    Weak,
    Moderate,
    Strong,
    Critical,
}

impl DependencyStrength {
    fn multiplier(self) -> f64 {
        match self {
            DependencyStrength::Critical => 1.0,
            DependencyStrength::Strong => 0.8,
            DependencyStrength::Moderate => 0.6,
            DependencyStrength::Weak => 0.3,
        }
    }
}

/// Who created the relation. User-created relations survive automatic
/// cycle resolution; system-inferred ones may be sacrificed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationOrigin {
    System,
    User,
}

/// Directed dependency edge between two repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyRelation {
    pub relation_id: Uuid,
    pub source_repository_id: Uuid,
    pub target_repository_id: Uuid,
    pub dependency_type: DependencyType,
    pub strength: DependencyStrength,
    pub created_by: RelationOrigin,
    /// Inference confidence in 0..=1; user edges default to 1.0.
    pub confidence: f64,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DependencyRelation {
    /// Create a system-inferred relation.
    pub fn system(
        source: Uuid,
        target: Uuid,
        dependency_type: DependencyType,
        strength: DependencyStrength,
    ) -> DomainResult<Self> {
        Self::new(source, target, dependency_type, strength, RelationOrigin::System, 1.0)
    }

    /// Create a user-supplied relation.
    pub fn user(
        source: Uuid,
        target: Uuid,
        dependency_type: DependencyType,
        strength: DependencyStrength,
    ) -> DomainResult<Self> {
        Self::new(source, target, dependency_type, strength, RelationOrigin::User, 1.0)
    }

    pub fn new(
        source: Uuid,
        target: Uuid,
        dependency_type: DependencyType,
        strength: DependencyStrength,
        created_by: RelationOrigin,
        confidence: f64,
    ) -> DomainResult<Self> {
        if source == target {
            return Err(DomainError::business_rule(
                "repository cannot depend on itself",
            ));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DomainError::validation(
                "confidence",
                "confidence must be between 0 and 1",
            ));
        }
        Ok(Self {
            relation_id: Uuid::new_v4(),
            source_repository_id: source,
            target_repository_id: target,
            dependency_type,
            strength,
            created_by,
            confidence,
            reason: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether this relation constrains the learning order.
    pub fn is_blocking(&self) -> bool {
        self.dependency_type == DependencyType::Prerequisite
            && self.strength >= DependencyStrength::Strong
    }

    /// Whether automatic cycle resolution may drop this relation.
    ///
    /// Only system-created edges that are weak, or of an advisory type
    /// (related/alternative), qualify. User edges are never removable.
    pub fn is_removable(&self) -> bool {
        if self.created_by == RelationOrigin::User {
            return false;
        }
        self.strength == DependencyStrength::Weak
            || matches!(
                self.dependency_type,
                DependencyType::Related | DependencyType::Alternative
            )
    }

    /// Impact on the learning sequence in 0..=1, combining type, strength,
    /// and confidence. User edges get a 20% bonus, capped at 1.
    pub fn impact_score(&self) -> f64 {
        let mut score =
            self.dependency_type.impact() * self.strength.multiplier() * self.confidence;
        if self.created_by == RelationOrigin::User {
            score = (score * 1.2).min(1.0);
        }
        score
    }
}

impl PartialEq for DependencyRelation {
    fn eq(&self, other: &Self) -> bool {
        self.source_repository_id == other.source_repository_id
            && self.target_repository_id == other.target_repository_id
    }
}

impl Eq for DependencyRelation {}

impl Hash for DependencyRelation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source_repository_id.hash(state);
        self.target_repository_id.hash(state);
    }
}

impl fmt::Display for DependencyRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dependency({} -> {}, {:?}/{:?})",
            self.source_repository_id,
            self.target_repository_id,
            self.dependency_type,
            self.strength
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_dependency_rejected() {
        let id = Uuid::new_v4();
        assert!(DependencyRelation::system(
            id,
            id,
            DependencyType::Prerequisite,
            DependencyStrength::Strong
        )
        .is_err());
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(DependencyRelation::new(
            a,
            b,
            DependencyType::Recommended,
            DependencyStrength::Weak,
            RelationOrigin::System,
            1.5
        )
        .is_err());
    }

    #[test]
    fn test_blocking_requires_prerequisite_and_strong_or_critical() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let strong = DependencyRelation::system(
            a,
            b,
            DependencyType::Prerequisite,
            DependencyStrength::Strong,
        )
        .unwrap();
        assert!(strong.is_blocking());

        let moderate = DependencyRelation::system(
            a,
            b,
            DependencyType::Prerequisite,
            DependencyStrength::Moderate,
        )
        .unwrap();
        assert!(!moderate.is_blocking());

        let recommended = DependencyRelation::system(
            a,
            b,
            DependencyType::Recommended,
            DependencyStrength::Critical,
        )
        .unwrap();
        assert!(!recommended.is_blocking());
    }

    #[test]
    fn test_user_edges_never_removable() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let user_weak = DependencyRelation::user(
            a,
            b,
            DependencyType::Related,
            DependencyStrength::Weak,
        )
        .unwrap();
        assert!(!user_weak.is_removable());

        let system_weak = DependencyRelation::system(
            a,
            b,
            DependencyType::Recommended,
            DependencyStrength::Weak,
        )
        .unwrap();
        assert!(system_weak.is_removable());
    }

    #[test]
    fn test_strong_prerequisite_not_removable() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let rel = DependencyRelation::system(
            a,
            b,
            DependencyType::Prerequisite,
            DependencyStrength::Strong,
        )
        .unwrap();
        assert!(!rel.is_removable());
    }

    #[test]
    fn test_equality_by_endpoints() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let weak = DependencyRelation::system(
            a,
            b,
            DependencyType::Recommended,
            DependencyStrength::Weak,
        )
        .unwrap();
        let critical = DependencyRelation::user(
            a,
            b,
            DependencyType::Prerequisite,
            DependencyStrength::Critical,
        )
        .unwrap();
        assert_eq!(weak, critical);
    }

    #[test]
    fn test_impact_score_ranks_prerequisites_above_related() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let prereq = DependencyRelation::system(
            a,
            b,
            DependencyType::Prerequisite,
            DependencyStrength::Critical,
        )
        .unwrap();
        let related = DependencyRelation::system(
            a,
            b,
            DependencyType::Related,
            DependencyStrength::Weak,
        )
        .unwrap();
        assert!(prereq.impact_score() > related.impact_score());
        assert!(prereq.impact_score() <= 1.0);
    }
}
