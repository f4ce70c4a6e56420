// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory store implementations.
//!
//! Deterministic fixtures for tests and the demo driver. Each store is a
//! `tokio::sync::RwLock` over plain vectors; insertion order is the
//! creation order the contracts promise.

use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Repository;
use crate::engine::{GenerateResult, OverrideInstruction};
use crate::errors::DomainResult;
use crate::stores::{OverrideStore, PathStore, PathSummary, RepositoryStore};

/// Repository store backed by a vector.
#[derive(Debug, Default)]
pub struct InMemoryRepositoryStore {
    repositories: RwLock<Vec<Repository>>,
}

impl InMemoryRepositoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from an iterator, upserting each entry.
    pub async fn seed(&self, repositories: impl IntoIterator<Item = Repository>) {
        let mut guard = self.repositories.write().await;
        for repository in repositories {
            upsert(&mut guard, repository);
        }
    }
}

fn upsert(repositories: &mut Vec<Repository>, repository: Repository) {
    match repositories.iter_mut().find(|r| r.path == repository.path) {
        Some(existing) => *existing = repository,
        None => repositories.push(repository),
    }
}

#[async_trait]
impl RepositoryStore for InMemoryRepositoryStore {
    async fn get_all(&self) -> DomainResult<Vec<Repository>> {
        Ok(self.repositories.read().await.clone())
    }

    async fn get_by_ids(&self, ids: &BTreeSet<Uuid>) -> DomainResult<Vec<Repository>> {
        Ok(self
            .repositories
            .read()
            .await
            .iter()
            .filter(|r| ids.contains(&r.repository_id))
            .cloned()
            .collect())
    }

    async fn save(&self, repository: Repository) -> DomainResult<()> {
        let mut guard = self.repositories.write().await;
        upsert(&mut guard, repository);
        Ok(())
    }
}

/// Override store backed by a vector in creation order.
#[derive(Debug, Default)]
pub struct InMemoryOverrideStore {
    overrides: RwLock<Vec<OverrideInstruction>>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an override; appended order is creation order.
    pub async fn add(&self, instruction: OverrideInstruction) {
        self.overrides.write().await.push(instruction);
    }
}

#[async_trait]
impl OverrideStore for InMemoryOverrideStore {
    async fn get_by_learner(&self, learner_id: &str) -> DomainResult<Vec<OverrideInstruction>> {
        Ok(self
            .overrides
            .read()
            .await
            .iter()
            .filter(|o| o.learner_id == learner_id)
            .cloned()
            .collect())
    }
}

/// Path store backed by a vector, with a per-learner version counter.
#[derive(Debug, Default)]
pub struct InMemoryPathStore {
    paths: RwLock<Vec<GenerateResult>>,
}

impl InMemoryPathStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PathStore for InMemoryPathStore {
    async fn save(&self, mut result: GenerateResult) -> DomainResult<GenerateResult> {
        let mut guard = self.paths.write().await;
        let next_version = guard
            .iter()
            .filter(|p| p.learner_id == result.learner_id)
            .map(|p| p.version)
            .max()
            .unwrap_or(0)
            + 1;
        result.version = next_version;
        guard.push(result.clone());
        Ok(result)
    }

    async fn get_by_learner(&self, learner_id: &str) -> DomainResult<Vec<PathSummary>> {
        let mut summaries: Vec<PathSummary> = self
            .paths
            .read()
            .await
            .iter()
            .filter(|p| p.learner_id == learner_id)
            .map(|p| PathSummary {
                path_id: p.path_id,
                learner_id: p.learner_id.clone(),
                name: p.name.clone(),
                status: p.status,
                total_repositories: p.total_repositories,
                total_estimated_hours: p.total_estimated_hours,
                version: p.version,
                generated_at: p.generated_at,
            })
            .collect();
        // Newest first; version is monotonically increasing per learner.
        summaries.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(summaries)
    }
}
