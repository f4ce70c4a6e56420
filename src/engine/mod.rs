// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod builder;
pub mod generator;
pub mod grouper;
#[cfg(test)]
mod integration_tests;
pub mod milestone;
pub mod overrides;
pub mod ready_queue;
pub mod sorter;

pub use builder::GraphBuilder;
pub use generator::{GenerateRequest, GenerateResult, Milestone, PathGenerator};
pub use grouper::MilestoneGrouper;
pub use milestone::{MilestoneGroup, MilestonePhase, NodeSummary, PHASE_ORDER};
pub use overrides::{OverrideApplier, OverrideInstruction, OverrideKind};
pub use sorter::TopologicalSorter;
