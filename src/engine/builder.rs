// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph construction: from a flat repository list to a populated path.
//!
//! [`GraphBuilder`] creates a [`LearningPath`] with one node per included
//! repository and infers directed dependency edges between them. For every
//! ordered pair the first matching rule fires and produces at most one
//! edge:
//!
//! 1. **Topic prerequisite** - a topic of the target lists a topic of the
//!    source as parent (prerequisite/strong)
//! 2. **Skill progression** - same skill type, source level one step below
//!    the target level (prerequisite/moderate); wider gaps are implied
//!    transitively and left to the advisory rules
//! 3. **Compatible progression** - source discipline is compatible
//!    groundwork for the target's and the source is simpler
//!    (recommended/weak)
//! 4. **Complexity gap** - source below 3.0, target above 6.0
//!    (recommended/weak)
//!
//! Repositories are pre-sorted by natural learning priority before nodes
//! are added, which stabilises downstream tie-breaking; pairs are only
//! considered in pre-sort direction, so inferred edges cannot form cycles
//! among themselves. Individual inference failures never abort the build:
//! the edge is dropped, logged, and recorded as a warning.

use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domain::{
    DependencyStrength, DependencyType, LearningPath, RelationOrigin, Repository,
};
use crate::errors::{DomainError, DomainResult};
use crate::observability::messages::builder::{DependencyInferred, EdgeDropped, PathBuilt};
use crate::observability::messages::StructuredLog;

/// Complexity below which a repository counts as simple.
const SIMPLE_THRESHOLD: f64 = 3.0;

/// Complexity above which a repository counts as complex.
const COMPLEX_THRESHOLD: f64 = 6.0;

/// Builds a populated learning path from repository entities.
#[derive(Debug, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a path for `learner_id` from `repositories`.
    ///
    /// Excluded repositories are filtered out first; an empty remainder
    /// produces an empty, well-formed path. Node-insertion and
    /// edge-insertion failures are downgraded to `warnings` entries.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        &self,
        learner_id: &str,
        name: &str,
        description: &str,
        repositories: Vec<Repository>,
        allow_parallel: bool,
        max_parallel: u32,
        exclude_ids: &BTreeSet<Uuid>,
        warnings: &mut Vec<String>,
    ) -> DomainResult<LearningPath> {
        let mut included: Vec<Repository> = repositories
            .into_iter()
            .filter(|r| !exclude_ids.contains(&r.repository_id))
            .collect();

        // Pre-sort by natural learning priority, then id, so both node
        // order and pair direction are deterministic.
        included.sort_by_key(|r| (r.recommended_order(), r.repository_id));

        let mut path = LearningPath::new(
            name,
            description,
            learner_id,
            allow_parallel,
            max_parallel,
        )?;

        let mut node_ids: Vec<(Uuid, Uuid)> = Vec::with_capacity(included.len());
        for repository in &included {
            let repository_id = repository.repository_id;
            match path.add_repository(repository.clone()) {
                Ok(node_id) => node_ids.push((repository_id, node_id)),
                Err(err) => {
                    warnings.push(format!(
                        "Skipped repository {}: {err}",
                        repository.name
                    ));
                }
            }
        }

        self.infer_edges(&included, &node_ids, &mut path, warnings);

        PathBuilt {
            path_name: &path.name,
            node_count: path.nodes.len(),
            dependency_count: path.dependencies.len(),
        }
        .log();

        Ok(path)
    }

    // Run the pairwise inference over the pre-sorted list and install the
    // resulting edges.
    fn infer_edges(
        &self,
        included: &[Repository],
        node_ids: &[(Uuid, Uuid)],
        path: &mut LearningPath,
        warnings: &mut Vec<String>,
    ) {
        let node_for = |repository_id: Uuid| {
            node_ids
                .iter()
                .find(|(repo, _)| *repo == repository_id)
                .map(|(_, node)| *node)
        };

        for (i, source) in included.iter().enumerate() {
            for target in &included[i + 1..] {
                let Some((dependency_type, strength, rule)) =
                    infer_dependency(source, target)
                else {
                    continue;
                };
                let (Some(source_node), Some(target_node)) = (
                    node_for(source.repository_id),
                    node_for(target.repository_id),
                ) else {
                    continue;
                };

                DependencyInferred {
                    source: &source.name,
                    target: &target.name,
                    rule,
                }
                .log();

                match path.add_dependency(
                    source_node,
                    target_node,
                    dependency_type,
                    strength,
                    RelationOrigin::System,
                ) {
                    Ok(_) => {}
                    Err(DomainError::CircularDependency { .. }) => {
                        EdgeDropped {
                            source: &source.name,
                            target: &target.name,
                            reason: "insertion would create a cycle",
                        }
                        .log();
                        warnings.push(format!(
                            "Dropped inferred edge {} -> {}: insertion would create a cycle",
                            source.name, target.name
                        ));
                    }
                    Err(err) => {
                        EdgeDropped {
                            source: &source.name,
                            target: &target.name,
                            reason: "relation rejected",
                        }
                        .log();
                        warnings.push(format!(
                            "Dropped inferred edge {} -> {}: {err}",
                            source.name, target.name
                        ));
                    }
                }
            }
        }
    }
}

/// Decide whether `source` should precede `target`, returning the edge
/// type, strength, and the name of the rule that fired.
fn infer_dependency(
    source: &Repository,
    target: &Repository,
) -> Option<(DependencyType, DependencyStrength, &'static str)> {
    // 1. Topic-based prerequisite.
    let source_topics: BTreeSet<&str> =
        source.topics.iter().map(|t| t.name.as_str()).collect();
    for topic in &target.topics {
        if topic
            .parent_topics
            .iter()
            .any(|parent| source_topics.contains(parent.as_str()))
        {
            return Some((
                DependencyType::Prerequisite,
                DependencyStrength::Strong,
                "topic_prerequisite",
            ));
        }
    }

    // 2. Skill-level progression within the same discipline. Only the
    // consecutive step gets a prerequisite edge; basic -> expert is implied
    // through the intermediate repositories.
    if let (Some(source_skill), Some(target_skill)) =
        (&source.primary_skill, &target.primary_skill)
    {
        if source_skill.skill_type == target_skill.skill_type
            && source_skill.skill_level.next_level() == Some(target_skill.skill_level)
        {
            return Some((
                DependencyType::Prerequisite,
                DependencyStrength::Moderate,
                "skill_progression",
            ));
        }

        // 3. Compatible discipline with rising complexity.
        if target_skill.skill_type.is_compatible_with(source_skill.skill_type)
            && source.complexity_score < target.complexity_score
        {
            return Some((
                DependencyType::Recommended,
                DependencyStrength::Weak,
                "compatible_progression",
            ));
        }
    }

    // 4. Complexity gap.
    if source.complexity_score < SIMPLE_THRESHOLD
        && target.complexity_score > COMPLEX_THRESHOLD
    {
        return Some((
            DependencyType::Recommended,
            DependencyStrength::Weak,
            "complexity_gap",
        ));
    }

    None
}
