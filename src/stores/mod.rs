// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Collaborator store contracts.
//!
//! The generation pipeline touches persistence only at its boundaries:
//! repositories and overrides are loaded before a run, the result is saved
//! after it. These traits carry exactly that surface. Production backs
//! them with a database; tests and the demo binary use the in-memory
//! implementations from [`memory`].

mod catalog;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domain::{PathStatus, Repository};
use crate::engine::{GenerateResult, OverrideInstruction};
use crate::errors::DomainResult;

pub use catalog::{load_catalog, parse_catalog};
pub use memory::{InMemoryOverrideStore, InMemoryPathStore, InMemoryRepositoryStore};

/// Condensed view of a stored path, for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSummary {
    pub path_id: Uuid,
    pub learner_id: String,
    pub name: String,
    pub status: PathStatus,
    pub total_repositories: usize,
    pub total_estimated_hours: u32,
    pub version: u32,
    pub generated_at: DateTime<Utc>,
}

/// Source of scanned repository entities.
#[async_trait]
pub trait RepositoryStore: Send + Sync {
    /// Every stored repository; an empty sequence is allowed.
    async fn get_all(&self) -> DomainResult<Vec<Repository>>;

    /// The subset matching `ids`; missing ids are omitted, not an error.
    async fn get_by_ids(&self, ids: &BTreeSet<Uuid>) -> DomainResult<Vec<Repository>>;

    /// Upsert one repository (keyed by its filesystem path).
    async fn save(&self, repository: Repository) -> DomainResult<()>;
}

/// Source of persisted learner overrides.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// A learner's overrides, oldest first.
    async fn get_by_learner(&self, learner_id: &str) -> DomainResult<Vec<OverrideInstruction>>;
}

/// Sink for generated paths.
#[async_trait]
pub trait PathStore: Send + Sync {
    /// Persist a result, returning it with store-assigned fields set
    /// (the per-learner `version` counter).
    async fn save(&self, result: GenerateResult) -> DomainResult<GenerateResult>;

    /// Summaries of a learner's paths, newest first.
    async fn get_by_learner(&self, learner_id: &str) -> DomainResult<Vec<PathSummary>>;
}
