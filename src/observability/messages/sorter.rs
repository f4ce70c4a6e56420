// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for ordering, cycle detection, and recovery events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A cycle was found while ordering a path; recovery will be attempted.
///
/// # Log Level
/// `warn!` - Recoverable condition
pub struct CycleDetected<'a> {
    pub path_name: &'a str,
    pub cycle_len: usize,
}

impl Display for CycleDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cycle of {} nodes detected in path '{}', attempting recovery",
            self.cycle_len, self.path_name
        )
    }
}

impl StructuredLog for CycleDetected<'_> {
    fn log(&self) {
        tracing::warn!(
            path_name = self.path_name,
            cycle_len = self.cycle_len,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "cycle_detected",
            span_name = name,
            path_name = self.path_name,
            cycle_len = self.cycle_len,
        )
    }
}

/// A removable edge was dropped to break a cycle.
///
/// # Log Level
/// `warn!` - Surfaced as a generation warning
pub struct EdgeRemoved<'a> {
    pub source: &'a str,
    pub target: &'a str,
}

impl Display for EdgeRemoved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Removed weak dependency {} -> {} to break a cycle",
            self.source, self.target
        )
    }
}

impl StructuredLog for EdgeRemoved<'_> {
    fn log(&self) {
        tracing::warn!(source = self.source, target = self.target, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "edge_removed",
            span_name = name,
            source = self.source,
            target = self.target,
        )
    }
}

/// Topological ordering finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SortCompleted<'a> {
    pub path_name: &'a str,
    pub node_count: usize,
}

impl Display for SortCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Sorted {} nodes for path '{}'",
            self.node_count, self.path_name
        )
    }
}

impl StructuredLog for SortCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            path_name = self.path_name,
            node_count = self.node_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "topological_sort",
            span_name = name,
            path_name = self.path_name,
            node_count = self.node_count,
        )
    }
}
