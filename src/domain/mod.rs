// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod dependency_graph;
mod metadata;
mod node;
mod path;
mod relation;
mod repository;
mod skill;
mod topic;

pub use dependency_graph::NodeGraph;
pub use metadata::{AnalysisUpdate, RepositoryMetadata};
pub use node::{LearningNode, NodeStatus};
pub use path::{LearningPath, LearningStatistics, PathStatus};
pub use relation::{DependencyRelation, DependencyStrength, DependencyType, RelationOrigin};
pub use repository::Repository;
pub use skill::{Skill, SkillLevel, SkillType};
pub use topic::{Topic, TopicCategory};
