// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline lifecycle events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A generation run started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GenerationStarted<'a> {
    pub learner_id: &'a str,
    pub path_name: &'a str,
    pub repositories_considered: usize,
}

impl Display for GenerationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Generating learning path '{}' for learner '{}' from {} repositories",
            self.path_name, self.learner_id, self.repositories_considered
        )
    }
}

impl StructuredLog for GenerationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            learner_id = self.learner_id,
            path_name = self.path_name,
            repositories_considered = self.repositories_considered,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "path_generation",
            span_name = name,
            learner_id = self.learner_id,
            path_name = self.path_name,
            repositories_considered = self.repositories_considered,
        )
    }
}

/// A generation run completed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GenerationCompleted<'a> {
    pub learner_id: &'a str,
    pub path_name: &'a str,
    pub repositories_included: usize,
    pub milestone_count: usize,
    pub elapsed_ms: u64,
}

impl Display for GenerationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Generated path '{}' for learner '{}': {} repositories, {} milestones in {}ms",
            self.path_name,
            self.learner_id,
            self.repositories_included,
            self.milestone_count,
            self.elapsed_ms
        )
    }
}

impl StructuredLog for GenerationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            learner_id = self.learner_id,
            path_name = self.path_name,
            repositories_included = self.repositories_included,
            milestone_count = self.milestone_count,
            elapsed_ms = self.elapsed_ms,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "path_generation_done",
            span_name = name,
            learner_id = self.learner_id,
            path_name = self.path_name,
            elapsed_ms = self.elapsed_ms,
        )
    }
}
