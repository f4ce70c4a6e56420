// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end tests for the generation pipeline: concrete learner
//! scenarios plus the invariants every generated path must satisfy.

use std::collections::BTreeSet;

use crate::domain::{
    DependencyRelation, DependencyStrength, DependencyType, LearningPath, RelationOrigin,
    Repository, Skill, SkillLevel, SkillType, Topic, TopicCategory,
};
use crate::engine::generator::{GenerateRequest, GenerateResult, PathGenerator};
use crate::engine::grouper::MilestoneGrouper;
use crate::engine::overrides::{OverrideInstruction, OverrideKind};
use crate::engine::sorter::TopologicalSorter;
use crate::engine::OverrideApplier;
use crate::errors::DomainError;

fn repo(name: &str, language: &str, complexity: f64) -> Repository {
    let mut r = Repository::new(name, format!("/repos/{name}"), language).unwrap();
    r.complexity_score = complexity;
    r
}

fn backend_repo(name: &str, level: SkillLevel, complexity: f64) -> Repository {
    let mut r = Repository::new(name, format!("/repos/{name}"), "python").unwrap();
    r.set_primary_skill(Skill::new(SkillType::Backend, level)).unwrap();
    r.complexity_score = complexity;
    r
}

fn node_names(result: &GenerateResult) -> Vec<String> {
    result
        .milestones
        .iter()
        .flat_map(|m| m.nodes.iter().map(|n| n.repository_name.clone()))
        .collect()
}

#[test]
fn test_skill_level_progression_produces_four_phase_path() {
    let repositories = vec![
        backend_repo("r1", SkillLevel::Basic, 1.0),
        backend_repo("r2", SkillLevel::Intermediate, 3.5),
        backend_repo("r3", SkillLevel::Advanced, 6.0),
        backend_repo("r4", SkillLevel::Expert, 8.0),
    ];
    let request = GenerateRequest::new("learner", "Backend Journey");
    let result = PathGenerator::new()
        .generate(&request, repositories, &[])
        .unwrap();

    assert_eq!(node_names(&result), vec!["r1", "r2", "r3", "r4"]);
    assert_eq!(result.total_repositories, 4);

    let phases: Vec<&str> = result.milestones.iter().map(|m| m.phase.as_str()).collect();
    assert_eq!(
        phases,
        vec![
            "foundations",
            "core_skills",
            "advanced_systems",
            "specialized_topics"
        ]
    );
    for milestone in &result.milestones {
        assert_eq!(milestone.repository_count, 1);
    }

    // The prerequisite chain r1 -> r2 -> r3 -> r4.
    let prerequisite_edges = result.generation_stats["dependencies_detected"].clone();
    assert!(prerequisite_edges.as_u64().unwrap() >= 3);
}

#[test]
fn test_prerequisite_chain_edges_link_consecutive_levels() {
    let repositories = vec![
        backend_repo("r1", SkillLevel::Basic, 1.0),
        backend_repo("r2", SkillLevel::Intermediate, 3.5),
        backend_repo("r3", SkillLevel::Advanced, 6.0),
        backend_repo("r4", SkillLevel::Expert, 8.0),
    ];
    let mut warnings = Vec::new();
    let path = crate::engine::GraphBuilder::new()
        .build(
            "learner",
            "Backend Journey",
            "",
            repositories,
            false,
            3,
            &BTreeSet::new(),
            &mut warnings,
        )
        .unwrap();

    let prerequisite_edges: Vec<(&str, &str)> = path
        .dependencies
        .iter()
        .filter(|d| d.dependency_type == DependencyType::Prerequisite)
        .map(|d| {
            let source = path
                .node(path.node_id_for_repository(d.source_repository_id).unwrap())
                .unwrap();
            let target = path
                .node(path.node_id_for_repository(d.target_repository_id).unwrap())
                .unwrap();
            (
                source.repository.name.as_str(),
                target.repository.name.as_str(),
            )
        })
        .collect();
    assert_eq!(
        prerequisite_edges,
        vec![("r1", "r2"), ("r2", "r3"), ("r3", "r4")]
    );
}

#[test]
fn test_complexity_fallback_when_skill_absent() {
    let repositories = vec![
        repo("c1", "python", 2.0),
        repo("c2", "python", 4.0),
        repo("c3", "python", 6.5),
        repo("c4", "python", 9.0),
    ];
    let request = GenerateRequest::new("learner", "By Complexity");
    let result = PathGenerator::new()
        .generate(&request, repositories, &[])
        .unwrap();

    let phases: Vec<&str> = result.milestones.iter().map(|m| m.phase.as_str()).collect();
    assert_eq!(
        phases,
        vec![
            "foundations",
            "core_skills",
            "advanced_systems",
            "specialized_topics"
        ]
    );
}

#[test]
fn test_topic_prerequisite_overrides_complexity_ordering() {
    let mut low = repo("r_low", "html", 1.0);
    low.add_topic(Topic::new("html", "", TopicCategory::Concept).unwrap());
    low.complexity_score = 1.0;

    let mut high = repo("r_high", "javascript", 5.0);
    let mut react = Topic::new("react", "", TopicCategory::Framework).unwrap();
    react.add_parent("html").unwrap();
    high.add_topic(react);
    high.complexity_score = 5.0;

    let request = GenerateRequest::new("learner", "Frontend Basics");
    let result = PathGenerator::new()
        .generate(&request, vec![high, low], &[])
        .unwrap();

    let names = node_names(&result);
    let low_position = names.iter().position(|n| n == "r_low").unwrap();
    let high_position = names.iter().position(|n| n == "r_high").unwrap();
    assert!(low_position < high_position);

    // The r_high node carries r_low as a prerequisite.
    let high_node = result
        .milestones
        .iter()
        .flat_map(|m| m.nodes.iter())
        .find(|n| n.repository_name == "r_high")
        .unwrap();
    assert_eq!(high_node.prerequisites.len(), 1);
}

#[test]
fn test_system_weak_cycle_recovers_with_warning() {
    let mut path = LearningPath::new("Ring", "", "learner", false, 3).unwrap();
    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        ids.push(
            path.add_repository(
                Repository::new(name, format!("/repos/{name}"), "python").unwrap(),
            )
            .unwrap(),
        );
    }
    for (source, target) in [(0usize, 1), (1, 2), (2, 0)] {
        path.add_dependency(
            ids[source],
            ids[target],
            DependencyType::Recommended,
            DependencyStrength::Weak,
            RelationOrigin::System,
        )
        .unwrap();
    }

    let mut warnings = Vec::new();
    let order = TopologicalSorter::new().sort(&mut path, &mut warnings).unwrap();

    assert_eq!(order.len(), 3);
    assert!(warnings.iter().any(|w| w.contains("break a cycle")));

    let groups = MilestoneGrouper::new().group(&path.nodes);
    let grouped: usize = groups.iter().map(|g| g.nodes.len()).sum();
    assert_eq!(grouped, 3);
}

#[test]
fn test_user_blocking_cycle_is_unresolvable() {
    let mut path = LearningPath::new("Deadlock", "", "learner", false, 3).unwrap();
    let a = path
        .add_repository(Repository::new("a", "/repos/a", "python").unwrap())
        .unwrap();
    let b = path
        .add_repository(Repository::new("b", "/repos/b", "python").unwrap())
        .unwrap();

    let repo_a = path.node(a).unwrap().repository.repository_id;
    let repo_b = path.node(b).unwrap().repository.repository_id;
    path.dependencies.push(
        DependencyRelation::user(
            repo_a,
            repo_b,
            DependencyType::Prerequisite,
            DependencyStrength::Strong,
        )
        .unwrap(),
    );
    path.dependencies.push(
        DependencyRelation::user(
            repo_b,
            repo_a,
            DependencyType::Prerequisite,
            DependencyStrength::Strong,
        )
        .unwrap(),
    );
    path.node_mut(b).unwrap().prerequisite_nodes.insert(a);
    path.node_mut(a).unwrap().prerequisite_nodes.insert(b);

    let mut warnings = Vec::new();
    let err = TopologicalSorter::new()
        .sort(&mut path, &mut warnings)
        .unwrap_err();
    match err {
        DomainError::InvalidSequence { affected_nodes, .. } => {
            let expected: BTreeSet<String> =
                [a.to_string(), b.to_string()].into_iter().collect();
            let actual: BTreeSet<String> = affected_nodes.into_iter().collect();
            assert_eq!(actual, expected);
        }
        other => panic!("expected InvalidSequence, got {other:?}"),
    }
}

#[test]
fn test_skip_and_reorder_overrides() {
    let repositories = vec![
        backend_repo("r1", SkillLevel::Basic, 1.0),
        backend_repo("r2", SkillLevel::Intermediate, 3.0),
        backend_repo("r3", SkillLevel::Intermediate, 4.0),
        backend_repo("r4", SkillLevel::Advanced, 6.0),
    ];
    let repo_ids: std::collections::BTreeMap<String, uuid::Uuid> = repositories
        .iter()
        .map(|r| (r.name.clone(), r.repository_id))
        .collect();

    let overrides = vec![
        OverrideInstruction::new("learner", repo_ids["r2"], OverrideKind::Skip),
        OverrideInstruction::new(
            "learner",
            repo_ids["r4"],
            OverrideKind::Reorder { target_index: 0 },
        ),
    ];
    let request = GenerateRequest::new("learner", "Trimmed");
    let result = PathGenerator::new()
        .generate(&request, repositories, &overrides)
        .unwrap();

    let names = node_names(&result);
    assert!(!names.contains(&"r2".to_string()));

    // Only r2 was skipped: foundations keeps r1 and all three phases
    // survive. A phase is dropped only once its node list is empty.
    assert_eq!(result.milestones.len(), 3);
    let foundations = &result.milestones[0];
    assert_eq!(foundations.phase, "foundations");
    assert_eq!(foundations.nodes.len(), 1);
    assert_eq!(foundations.nodes[0].repository_name, "r1");
    assert!(!foundations.nodes[0].is_overridden);

    let core = result
        .milestones
        .iter()
        .find(|m| m.phase == "core_skills")
        .unwrap();
    assert_eq!(core.nodes.len(), 1);
    assert_eq!(core.nodes[0].repository_name, "r3");

    let advanced = result
        .milestones
        .iter()
        .find(|m| m.phase == "advanced_systems")
        .unwrap();
    assert_eq!(advanced.nodes.len(), 1);
    assert_eq!(advanced.nodes[0].repository_name, "r4");
    assert!(advanced.nodes[0].is_overridden);
    assert_eq!(advanced.nodes[0].order_index, 0);
}

// Universal invariants over a mixed fixture.

fn mixed_fixture() -> Vec<Repository> {
    let mut html = repo("html-primer", "html", 1.5);
    html.add_topic(Topic::new("html", "", TopicCategory::Concept).unwrap());
    html.complexity_score = 1.5;

    let mut react = repo("react-app", "javascript", 4.5);
    let mut react_topic = Topic::new("react", "", TopicCategory::Framework).unwrap();
    react_topic.add_parent("html").unwrap();
    react.add_topic(react_topic);
    react.complexity_score = 4.5;

    vec![
        html,
        react,
        backend_repo("api", SkillLevel::Basic, 2.0),
        backend_repo("services", SkillLevel::Intermediate, 4.0),
        backend_repo("distributed", SkillLevel::Advanced, 7.5),
        repo("scripts", "shell", 0.5),
    ]
}

#[test]
fn test_blocking_edges_respect_output_order() {
    let repositories = mixed_fixture();
    let mut warnings = Vec::new();
    let mut path = crate::engine::GraphBuilder::new()
        .build(
            "learner",
            "Mixed",
            "",
            repositories,
            false,
            3,
            &BTreeSet::new(),
            &mut warnings,
        )
        .unwrap();
    TopologicalSorter::new().sort(&mut path, &mut warnings).unwrap();

    let position = |node_id: uuid::Uuid| {
        path.nodes
            .iter()
            .position(|n| n.node_id == node_id)
            .unwrap()
    };
    for relation in path.dependencies.iter().filter(|d| d.is_blocking()) {
        let source = path
            .node_id_for_repository(relation.source_repository_id)
            .unwrap();
        let target = path
            .node_id_for_repository(relation.target_repository_id)
            .unwrap();
        assert!(
            position(source) < position(target),
            "blocking edge out of order"
        );
    }
}

#[test]
fn test_totals_and_phase_structure_invariants() {
    let request = GenerateRequest::new("learner", "Mixed");
    let result = PathGenerator::new()
        .generate(&request, mixed_fixture(), &[])
        .unwrap();

    // Totals match the flattened node list.
    let flattened: Vec<&crate::engine::NodeSummary> = result
        .milestones
        .iter()
        .flat_map(|m| m.nodes.iter())
        .collect();
    assert_eq!(result.total_repositories, flattened.len());
    assert_eq!(
        result.total_estimated_hours,
        flattened.iter().map(|n| n.estimated_hours).sum::<u32>()
    );

    // The phases partition the node sequence: every position appears
    // exactly once, and each phase preserves the sorter's relative order.
    let mut order_indexes: Vec<usize> = flattened.iter().map(|n| n.order_index).collect();
    order_indexes.sort_unstable();
    assert_eq!(order_indexes, (0..flattened.len()).collect::<Vec<_>>());
    for milestone in &result.milestones {
        let in_phase: Vec<usize> = milestone.nodes.iter().map(|n| n.order_index).collect();
        let mut sorted_in_phase = in_phase.clone();
        sorted_in_phase.sort_unstable();
        assert_eq!(in_phase, sorted_in_phase);
    }

    // Phases appear in fixed order with no empty groups.
    let phase_positions: Vec<usize> = result
        .milestones
        .iter()
        .map(|m| {
            crate::engine::PHASE_ORDER
                .iter()
                .position(|p| p.as_str() == m.phase)
                .unwrap()
        })
        .collect();
    let mut sorted_positions = phase_positions.clone();
    sorted_positions.sort_unstable();
    sorted_positions.dedup();
    assert_eq!(phase_positions, sorted_positions);
    assert!(result.milestones.iter().all(|m| !m.nodes.is_empty()));
}

#[test]
fn test_generation_is_deterministic() {
    let build_inputs = || {
        let mut repositories = mixed_fixture();
        // Same logical content on every call; ids differ but names,
        // skills, and complexities are identical.
        repositories.sort_by(|a, b| a.name.cmp(&b.name));
        repositories
    };
    let request = GenerateRequest::new("learner", "Deterministic");
    let generator = PathGenerator::new();

    let first = generator.generate(&request, build_inputs(), &[]).unwrap();
    let second = generator.generate(&request, build_inputs(), &[]).unwrap();

    assert_eq!(node_names(&first), node_names(&second));
    let phases =
        |r: &GenerateResult| r.milestones.iter().map(|m| m.phase.clone()).collect::<Vec<_>>();
    assert_eq!(phases(&first), phases(&second));
    assert_eq!(first.total_estimated_hours, second.total_estimated_hours);
}

#[test]
fn test_override_for_unknown_repository_adds_exactly_one_warning() {
    let request = GenerateRequest::new("learner", "Mixed");
    let generator = PathGenerator::new();

    let baseline = generator
        .generate(&request, mixed_fixture(), &[])
        .unwrap();
    let overrides = vec![OverrideInstruction::new(
        "learner",
        uuid::Uuid::new_v4(),
        OverrideKind::Skip,
    )];
    let with_override = generator
        .generate(&request, mixed_fixture(), &overrides)
        .unwrap();

    assert_eq!(node_names(&baseline), node_names(&with_override));
    assert_eq!(with_override.warnings.len(), baseline.warnings.len() + 1);
}

#[test]
fn test_empty_override_list_is_identity_on_phases() {
    let groups = {
        let request = GenerateRequest::new("learner", "Mixed");
        let result = PathGenerator::new()
            .generate(&request, mixed_fixture(), &[])
            .unwrap();
        result.milestones
    };

    // Re-applying nothing over grouper output changes nothing.
    let rebuilt: Vec<crate::engine::MilestoneGroup> = groups
        .iter()
        .map(|m| {
            let mut group = crate::engine::MilestoneGroup::new(
                crate::engine::MilestonePhase::parse(&m.phase).unwrap(),
            );
            group.nodes = m.nodes.clone();
            group
        })
        .collect();
    let mut warnings = Vec::new();
    let output = OverrideApplier::new().apply(&rebuilt, &[], &mut warnings);
    assert_eq!(output, rebuilt);
    assert!(warnings.is_empty());
}
