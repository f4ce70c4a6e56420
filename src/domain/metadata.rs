// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Quantitative repository metadata.
//!
//! [`RepositoryMetadata`] is an immutable value: two instances with the
//! same numbers describe the same state. Scanner collaborators produce an
//! [`AnalysisUpdate`] and [`RepositoryMetadata::apply`] merges it into a
//! fresh value; nothing mutates in place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable snapshot of a repository's measurable properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub lines_of_code: u64,
    pub file_count: u64,
    /// External package names, in the order the scanner reported them.
    pub dependencies: Vec<String>,
    pub has_tests: bool,
    pub has_ci: bool,
    pub has_documentation: bool,
    /// Language name to file count. `BTreeMap` so traversal order is
    /// stable regardless of insertion order.
    pub language_distribution: BTreeMap<String, u64>,
}

/// Partial update produced by an analysis pass. `None` fields keep the
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisUpdate {
    pub lines_of_code: Option<u64>,
    pub file_count: Option<u64>,
    pub dependencies: Option<Vec<String>>,
    pub has_tests: Option<bool>,
    pub has_ci: Option<bool>,
    pub has_documentation: Option<bool>,
    pub language_distribution: Option<BTreeMap<String, u64>>,
}

impl RepositoryMetadata {
    /// Merge an update, producing a new value. Fields absent from the
    /// update retain their current values.
    pub fn apply(&self, update: &AnalysisUpdate) -> RepositoryMetadata {
        RepositoryMetadata {
            lines_of_code: update.lines_of_code.unwrap_or(self.lines_of_code),
            file_count: update.file_count.unwrap_or(self.file_count),
            dependencies: update
                .dependencies
                .clone()
                .unwrap_or_else(|| self.dependencies.clone()),
            has_tests: update.has_tests.unwrap_or(self.has_tests),
            has_ci: update.has_ci.unwrap_or(self.has_ci),
            has_documentation: update.has_documentation.unwrap_or(self.has_documentation),
            language_distribution: update
                .language_distribution
                .clone()
                .unwrap_or_else(|| self.language_distribution.clone()),
        }
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Codebases past 10k lines push complexity up a band.
    pub fn is_large_codebase(&self) -> bool {
        self.lines_of_code > 10_000
    }
}
