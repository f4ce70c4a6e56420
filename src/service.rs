// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The path service: stores on the outside, the generator in the middle.
//!
//! [`PathService`] is the entry point callers use. One call loads the
//! candidate repositories and the learner's persisted overrides, runs the
//! synchronous generation pipeline, persists the result, and returns the
//! stored value (with its store-assigned version). Store access happens
//! only before and after the pipeline; the pipeline itself never awaits.

use std::sync::Arc;

use crate::engine::{GenerateRequest, GenerateResult, PathGenerator};
use crate::errors::{DomainError, DomainResult};
use crate::stores::{OverrideStore, PathStore, PathSummary, RepositoryStore};

/// Wires the three collaborator stores to the generation pipeline.
pub struct PathService {
    repositories: Arc<dyn RepositoryStore>,
    overrides: Arc<dyn OverrideStore>,
    paths: Arc<dyn PathStore>,
    generator: PathGenerator,
}

impl PathService {
    pub fn new(
        repositories: Arc<dyn RepositoryStore>,
        overrides: Arc<dyn OverrideStore>,
        paths: Arc<dyn PathStore>,
    ) -> Self {
        Self {
            repositories,
            overrides,
            paths,
            generator: PathGenerator::new(),
        }
    }

    /// Generate a learning path for the request and persist it.
    ///
    /// Fails with [`DomainError::NotFound`] when the repository store is
    /// empty: nothing has been scanned yet, which is different from all
    /// candidates being filtered away (that produces an empty path with
    /// warnings).
    pub async fn generate(&self, request: GenerateRequest) -> DomainResult<GenerateResult> {
        let repositories = self.repositories.get_all().await?;
        if repositories.is_empty() {
            return Err(DomainError::NotFound {
                entity: "repository".into(),
                identifier: "any".into(),
            });
        }

        let overrides = self.overrides.get_by_learner(&request.learner_id).await?;
        let result = self
            .generator
            .generate(&request, repositories, &overrides)?;
        self.paths.save(result).await
    }

    /// A learner's stored paths, newest first.
    pub async fn history(&self, learner_id: &str) -> DomainResult<Vec<PathSummary>> {
        self.paths.get_by_learner(learner_id).await
    }
}
