// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The path generator: one request in, one generated path out.
//!
//! [`PathGenerator`] drives the full pipeline once per request: filter the
//! candidate repositories, build the dependency graph, order it, group it
//! into milestones, and re-apply the learner's persisted overrides. The
//! run is synchronous, touches no state outside the path being built, and
//! treats the input repositories as read-only; callers may invoke it from
//! as many threads as they like.
//!
//! Filtering order matters and is fixed: skill-type filter, then
//! skill-level filter, then the `max_repositories` cap over whatever
//! survived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use uuid::Uuid;

use crate::domain::{PathStatus, Repository, SkillLevel, SkillType};
use crate::engine::builder::GraphBuilder;
use crate::engine::grouper::MilestoneGrouper;
use crate::engine::milestone::{MilestoneGroup, NodeSummary};
use crate::engine::overrides::{OverrideApplier, OverrideInstruction};
use crate::engine::sorter::TopologicalSorter;
use crate::errors::{DomainError, DomainResult};
use crate::observability::messages::generator::{GenerationCompleted, GenerationStarted};
use crate::observability::messages::StructuredLog;

/// Input for one generation run. All collaborator identifiers are opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub learner_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Skill-type names; empty means no filter. Repositories without a
    /// primary skill always pass as foundational content.
    #[serde(default)]
    pub target_skill_types: Vec<String>,
    /// Optional skill-level name; repositories more than one level away
    /// are filtered out.
    #[serde(default)]
    pub target_skill_level: Option<String>,
    /// Cap applied after filtering; `None` means unlimited.
    #[serde(default)]
    pub max_repositories: Option<usize>,
    #[serde(default)]
    pub allow_parallel_learning: bool,
    #[serde(default = "default_max_parallel")]
    pub max_parallel_nodes: u32,
    #[serde(default)]
    pub exclude_repository_ids: Vec<Uuid>,
}

fn default_max_parallel() -> u32 {
    3
}

impl GenerateRequest {
    /// A request with default flags: sequential learning, no filters.
    pub fn new(learner_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            learner_id: learner_id.into(),
            name: name.into(),
            description: String::new(),
            target_skill_types: Vec::new(),
            target_skill_level: None,
            max_repositories: None,
            allow_parallel_learning: false,
            max_parallel_nodes: default_max_parallel(),
            exclude_repository_ids: Vec::new(),
        }
    }

    /// Check the field-level invariants.
    pub fn validate(&self) -> DomainResult<()> {
        if self.learner_id.trim().is_empty() {
            return Err(DomainError::validation(
                "learner_id",
                "learner id cannot be empty",
            ));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "name cannot be empty"));
        }
        if self.max_parallel_nodes < 1 {
            return Err(DomainError::validation(
                "max_parallel_nodes",
                "at least 1 parallel node must be allowed",
            ));
        }
        if self.max_repositories == Some(0) {
            return Err(DomainError::validation(
                "max_repositories",
                "max_repositories must be positive when set",
            ));
        }
        Ok(())
    }
}

/// One milestone in the generated result, with its aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub phase: String,
    pub description: String,
    pub nodes: Vec<NodeSummary>,
    pub repository_count: usize,
    pub estimated_hours: u32,
}

impl From<MilestoneGroup> for Milestone {
    fn from(group: MilestoneGroup) -> Self {
        let repository_count = group.repository_count();
        let estimated_hours = group.estimated_hours();
        Self {
            phase: group.phase.as_str().to_string(),
            description: group.phase.description().to_string(),
            nodes: group.nodes,
            repository_count,
            estimated_hours,
        }
    }
}

/// Output of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResult {
    pub path_id: Uuid,
    pub learner_id: String,
    pub name: String,
    pub description: String,
    pub status: PathStatus,
    pub milestones: Vec<Milestone>,
    pub total_repositories: usize,
    pub total_estimated_hours: u32,
    pub completion_percentage: f64,
    pub generated_at: DateTime<Utc>,
    pub last_optimized_at: Option<DateTime<Utc>>,
    /// Assigned by the path store on save; monotonically increasing per
    /// learner.
    pub version: u32,
    pub warnings: Vec<String>,
    /// Open diagnostics dictionary. Always contains at least
    /// `repositories_considered`, `repositories_included`, and
    /// `generation_time_ms`.
    pub generation_stats: BTreeMap<String, serde_json::Value>,
}

/// Drives the generation pipeline.
#[derive(Debug, Default)]
pub struct PathGenerator {
    builder: GraphBuilder,
    sorter: TopologicalSorter,
    grouper: MilestoneGrouper,
    applier: OverrideApplier,
}

impl PathGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pipeline: filter, build, sort, group, apply overrides.
    ///
    /// `repositories` are the generator's own working copies; the caller's
    /// entities are never touched. Fails on invalid requests and on cycles
    /// that survive recovery; everything recoverable lands in `warnings`.
    pub fn generate(
        &self,
        request: &GenerateRequest,
        repositories: Vec<Repository>,
        overrides: &[OverrideInstruction],
    ) -> DomainResult<GenerateResult> {
        request.validate()?;
        let started = Instant::now();
        let mut warnings = Vec::new();

        GenerationStarted {
            learner_id: &request.learner_id,
            path_name: &request.name,
            repositories_considered: repositories.len(),
        }
        .log();

        let considered = repositories.len();
        let filtered = self.filter_repositories(request, repositories, &mut warnings);

        let exclude_ids = request.exclude_repository_ids.iter().copied().collect();
        let mut path = self.builder.build(
            &request.learner_id,
            &request.name,
            &request.description,
            filtered,
            request.allow_parallel_learning,
            request.max_parallel_nodes,
            &exclude_ids,
            &mut warnings,
        )?;

        if path.nodes.is_empty() {
            warnings.push("No repositories available after filtering and exclusions.".into());
        }

        self.sorter.sort(&mut path, &mut warnings)?;

        let groups = self.grouper.group(&path.nodes);
        let groups = self.applier.apply(&groups, overrides, &mut warnings);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let milestones: Vec<Milestone> = groups.into_iter().map(Milestone::from).collect();

        GenerationCompleted {
            learner_id: &request.learner_id,
            path_name: &request.name,
            repositories_included: path.nodes.len(),
            milestone_count: milestones.len(),
            elapsed_ms,
        }
        .log();

        let stats = self.collect_stats(&path, considered, &milestones, elapsed_ms);

        Ok(GenerateResult {
            path_id: path.path_id,
            learner_id: path.learner_id.clone(),
            name: path.name.clone(),
            description: path.description.clone(),
            status: path.status,
            milestones,
            total_repositories: path.total_repositories,
            total_estimated_hours: path.total_estimated_hours,
            completion_percentage: path.completion_percentage,
            generated_at: Utc::now(),
            last_optimized_at: path.last_optimized_at,
            version: 1,
            warnings,
            generation_stats: stats,
        })
    }

    // Skill-type filter, skill-level filter, then the cap.
    fn filter_repositories(
        &self,
        request: &GenerateRequest,
        repositories: Vec<Repository>,
        warnings: &mut Vec<String>,
    ) -> Vec<Repository> {
        let mut filtered = repositories;

        if !request.target_skill_types.is_empty() {
            let mut targets = Vec::new();
            for name in &request.target_skill_types {
                match SkillType::parse(name) {
                    Some(skill_type) => targets.push(skill_type),
                    None => warnings.push(format!("Ignored unknown skill type '{name}'")),
                }
            }
            if !targets.is_empty() {
                let before = filtered.len();
                filtered.retain(|r| match &r.primary_skill {
                    Some(skill) => targets.contains(&skill.skill_type),
                    // Skill-less repositories stay as foundational content.
                    None => true,
                });
                if filtered.len() < before {
                    warnings.push(format!(
                        "Filtered to {} repositories matching skill types {:?}",
                        filtered.len(),
                        request.target_skill_types
                    ));
                }
            }
        }

        if let Some(level_name) = &request.target_skill_level {
            match SkillLevel::parse(level_name) {
                Some(level) => {
                    let before = filtered.len();
                    filtered.retain(|r| r.suits_level(level));
                    if filtered.len() < before {
                        warnings.push(format!(
                            "Filtered to {} repositories suiting skill level '{level_name}'",
                            filtered.len()
                        ));
                    }
                }
                None => {
                    warnings.push(format!("Ignored unknown skill level '{level_name}'"));
                }
            }
        }

        if let Some(cap) = request.max_repositories {
            if filtered.len() > cap {
                filtered.truncate(cap);
                warnings.push(format!("Capped to {cap} repositories"));
            }
        }

        filtered
    }

    fn collect_stats(
        &self,
        path: &crate::domain::LearningPath,
        considered: usize,
        milestones: &[Milestone],
        elapsed_ms: u64,
    ) -> BTreeMap<String, serde_json::Value> {
        let statistics = path.learning_statistics();
        let mut stats = BTreeMap::new();
        stats.insert("repositories_considered".into(), considered.into());
        stats.insert("repositories_included".into(), path.nodes.len().into());
        stats.insert(
            "dependencies_detected".into(),
            path.dependencies.len().into(),
        );
        stats.insert("milestone_count".into(), milestones.len().into());
        stats.insert("generation_time_ms".into(), elapsed_ms.into());
        stats.insert(
            "average_complexity".into(),
            serde_json::json!(statistics.average_complexity),
        );
        stats.insert(
            "skill_distribution".into(),
            serde_json::json!(path.skill_distribution()),
        );
        stats
    }
}
