// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for dependency inference events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A dependency edge was inferred between two repositories.
///
/// # Log Level
/// `debug!` - High-volume inference detail
pub struct DependencyInferred<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub rule: &'a str,
}

impl Display for DependencyInferred<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Inferred dependency {} -> {} via {} rule",
            self.source, self.target, self.rule
        )
    }
}

impl StructuredLog for DependencyInferred<'_> {
    fn log(&self) {
        tracing::debug!(
            source = self.source,
            target = self.target,
            rule = self.rule,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "dependency_inference",
            span_name = name,
            source = self.source,
            target = self.target,
            rule = self.rule,
        )
    }
}

/// An inferred edge was dropped instead of being added to the path.
///
/// # Log Level
/// `warn!` - Recoverable, surfaced as a generation warning
pub struct EdgeDropped<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub reason: &'a str,
}

impl Display for EdgeDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropped inferred edge {} -> {}: {}",
            self.source, self.target, self.reason
        )
    }
}

impl StructuredLog for EdgeDropped<'_> {
    fn log(&self) {
        tracing::warn!(
            source = self.source,
            target = self.target,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "edge_dropped",
            span_name = name,
            source = self.source,
            target = self.target,
        )
    }
}

/// Graph construction finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct PathBuilt<'a> {
    pub path_name: &'a str,
    pub node_count: usize,
    pub dependency_count: usize,
}

impl Display for PathBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built learning path '{}' with {} repositories and {} dependencies",
            self.path_name, self.node_count, self.dependency_count
        )
    }
}

impl StructuredLog for PathBuilt<'_> {
    fn log(&self) {
        tracing::info!(
            path_name = self.path_name,
            node_count = self.node_count,
            dependency_count = self.dependency_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "graph_build",
            span_name = name,
            path_name = self.path_name,
            node_count = self.node_count,
            dependency_count = self.dependency_count,
        )
    }
}
