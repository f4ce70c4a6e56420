// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements:
//!
//! * `Display` - human-readable output
//! * [`StructuredLog`] - machine-readable fields plus span creation
//!
//! # Usage
//!
//! ```rust
//! use trailhead::observability::messages::{StructuredLog, sorter::SortCompleted};
//!
//! SortCompleted {
//!     path_name: "Backend Path",
//!     node_count: 12,
//! }
//! .log();
//! ```

pub mod builder;
pub mod generator;
pub mod overrides;
pub mod sorter;

use tracing::Span;

/// Trait for messages that support structured logging and tracing.
///
/// `log()` emits the event at the level matching the message's semantic
/// meaning, carrying both the `Display` text and the individual fields.
/// `span()` creates a span with the message fields as attributes so work
/// done under it inherits the context.
pub trait StructuredLog {
    /// Emit a log event with structured fields.
    fn log(&self);

    /// Create a span with this message's fields as attributes.
    fn span(&self, name: &str) -> Span;
}
