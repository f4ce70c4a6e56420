// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for override application events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;
use uuid::Uuid;

/// An override could not be applied and was skipped.
///
/// # Log Level
/// `warn!` - Surfaced as a generation warning
pub struct OverrideIgnored<'a> {
    pub repository_id: Uuid,
    pub reason: &'a str,
}

impl Display for OverrideIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Ignored override for repository {}: {}",
            self.repository_id, self.reason
        )
    }
}

impl StructuredLog for OverrideIgnored<'_> {
    fn log(&self) {
        tracing::warn!(
            repository_id = %self.repository_id,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "override_ignored",
            span_name = name,
            repository_id = %self.repository_id,
        )
    }
}

/// An override was applied to a node.
///
/// # Log Level
/// `info!`
pub struct OverrideApplied<'a> {
    pub kind: &'a str,
    pub repository_name: &'a str,
}

impl Display for OverrideApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Applied {} override to repository {}",
            self.kind, self.repository_name
        )
    }
}

impl StructuredLog for OverrideApplied<'_> {
    fn log(&self) {
        tracing::info!(
            kind = self.kind,
            repository_name = self.repository_name,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "override_applied",
            span_name = name,
            kind = self.kind,
            repository_name = self.repository_name,
        )
    }
}
