// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error taxonomy for the learning-path domain.
//!
//! Every failure the engine can surface is a variant of [`DomainError`],
//! a tagged sum type. Callers match on the variant instead of downcasting:
//! validation failures carry the offending field, rule violations carry an
//! optional rule tag, graph failures carry the nodes involved. All variants
//! implement `std::error::Error` via the `thiserror` crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type DomainResult<T> = std::result::Result<T, DomainError>;

/// All recoverable failures raised by domain entities and the generation
/// pipeline.
///
/// The four broad kinds map onto the variants as follows:
/// - field-level validation failures → [`DomainError::Validation`]
/// - aggregate/business-rule failures → [`DomainError::BusinessRule`] and
///   [`DomainError::Duplicate`]
/// - graph-ordering failures → [`DomainError::CircularDependency`] and
///   [`DomainError::InvalidSequence`]
/// - missing entities → [`DomainError::NotFound`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// An entity field violates a stated invariant (empty string,
    /// out-of-range number, unsupported enum value).
    #[error("validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// A legal field value combined with current state would violate an
    /// aggregate invariant.
    #[error("business rule violated: {message}")]
    BusinessRule {
        message: String,
        /// Optional machine-readable rule tag.
        rule: Option<String>,
    },

    /// A circular dependency was detected in a learning path.
    ///
    /// `cycle` is the witness cycle as an ordered list of node identifiers,
    /// first node repeated at the end.
    #[error("circular dependency detected: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// Nodes cannot be legally ordered, even after cycle recovery, or a
    /// node was started before its prerequisites completed.
    #[error("invalid learning sequence: {message}")]
    InvalidSequence {
        message: String,
        /// Identifiers of the nodes that could not be ordered or whose
        /// prerequisites are unmet.
        affected_nodes: Vec<String>,
    },

    /// A referenced entity does not exist.
    #[error("{entity} with identifier '{identifier}' not found")]
    NotFound { entity: String, identifier: String },

    /// An entity already exists and duplicates are not allowed.
    #[error("{entity} '{identifier}' already exists")]
    Duplicate { entity: String, identifier: String },
}

impl DomainError {
    /// Shorthand for a [`DomainError::Validation`] value.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an untagged [`DomainError::BusinessRule`] value.
    pub fn business_rule(message: impl Into<String>) -> Self {
        DomainError::BusinessRule {
            message: message.into(),
            rule: None,
        }
    }
}
