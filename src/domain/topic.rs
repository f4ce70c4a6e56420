// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Learning topics and their hierarchy.
//!
//! Topics form a directed graph through `parent_topics` (prerequisites)
//! and `child_topics` (dependents), referenced by name rather than by
//! owning pointer so the graph can contain legitimate long-range cycles
//! without ownership headaches. Identity and equality are by `name`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Maximum allowed topic name length.
const MAX_NAME_LEN: usize = 100;

/// Maximum difficulty weight.
const MAX_DIFFICULTY_WEIGHT: f64 = 5.0;

/// Closed set of topic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicCategory {
    ProgrammingLanguage,
    Framework,
    Library,
    Tool,
    Concept,
    Methodology,
    Platform,
    Database,
    Architecture,
}

impl TopicCategory {
    /// Complexity weight contributed by the category.
    pub fn complexity_weight(self) -> f64 {
        match self {
            TopicCategory::ProgrammingLanguage => 1.5,
            TopicCategory::Framework => 1.3,
            TopicCategory::Library => 1.0,
            TopicCategory::Tool => 0.8,
            TopicCategory::Concept => 1.2,
            TopicCategory::Methodology => 1.4,
            TopicCategory::Platform => 1.1,
            TopicCategory::Database => 1.2,
            TopicCategory::Architecture => 1.6,
        }
    }
}

/// A learning topic with prerequisite/dependent links to other topics.
///
/// `parent_topics` and `child_topics` hold topic *names*; resolution to
/// actual `Topic` values happens wherever a full topic table is available.
/// `BTreeSet` keeps iteration order stable so derived scores never depend
/// on hash ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: TopicCategory,
    pub keywords: BTreeSet<String>,
    /// Names of topics that must be understood before this one.
    pub parent_topics: BTreeSet<String>,
    /// Names of topics that build on this one.
    pub child_topics: BTreeSet<String>,
    /// Multiplier applied to the learning complexity, in (0, 5].
    pub difficulty_weight: f64,
}

impl Topic {
    /// Create a topic, validating the name.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: TopicCategory,
    ) -> DomainResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            topic_id: Uuid::new_v4(),
            name,
            description: description.into(),
            category,
            keywords: BTreeSet::new(),
            parent_topics: BTreeSet::new(),
            child_topics: BTreeSet::new(),
            difficulty_weight: 1.0,
        })
    }

    /// Set the difficulty weight, rejecting values outside (0, 5].
    pub fn with_difficulty_weight(mut self, weight: f64) -> DomainResult<Self> {
        if weight <= 0.0 {
            return Err(DomainError::validation(
                "difficulty_weight",
                "difficulty weight must be positive",
            ));
        }
        if weight > MAX_DIFFICULTY_WEIGHT {
            return Err(DomainError::validation(
                "difficulty_weight",
                format!("difficulty weight cannot exceed {MAX_DIFFICULTY_WEIGHT}"),
            ));
        }
        self.difficulty_weight = weight;
        Ok(self)
    }

    /// Add a lowercased keyword.
    pub fn add_keyword(&mut self, keyword: &str) -> DomainResult<()> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(DomainError::validation("keyword", "keyword cannot be empty"));
        }
        self.keywords.insert(keyword.to_lowercase());
        Ok(())
    }

    /// Register a prerequisite topic by name.
    ///
    /// Rejects self-reference and any name already registered as a child,
    /// which would make the local hierarchy contradict itself.
    pub fn add_parent(&mut self, parent_name: &str) -> DomainResult<()> {
        if parent_name == self.name {
            return Err(DomainError::business_rule("topic cannot be its own parent"));
        }
        if self.child_topics.contains(parent_name) {
            return Err(DomainError::business_rule(format!(
                "cannot add '{parent_name}' as parent: it is already a child of '{}'",
                self.name
            )));
        }
        self.parent_topics.insert(parent_name.to_string());
        Ok(())
    }

    /// Register a dependent topic by name. Mirror-image rules of
    /// [`Topic::add_parent`].
    pub fn add_child(&mut self, child_name: &str) -> DomainResult<()> {
        if child_name == self.name {
            return Err(DomainError::business_rule("topic cannot be its own child"));
        }
        if self.parent_topics.contains(child_name) {
            return Err(DomainError::business_rule(format!(
                "cannot add '{child_name}' as child: it is already a parent of '{}'",
                self.name
            )));
        }
        self.child_topics.insert(child_name.to_string());
        Ok(())
    }

    /// Whether this topic is listed as a prerequisite of `other`.
    pub fn is_prerequisite_for(&self, other: &Topic) -> bool {
        other.parent_topics.contains(&self.name)
    }

    /// Learning complexity: prerequisite count and category both raise it.
    pub fn learning_complexity(&self) -> f64 {
        let prerequisite_factor = 1.0 + self.parent_topics.len() as f64 * 0.2;
        prerequisite_factor * self.category.complexity_weight() * self.difficulty_weight
    }

    /// Case-insensitive match against the name or any keyword.
    pub fn matches_keyword(&self, search_term: &str) -> bool {
        let needle = search_term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.keywords.iter().any(|k| k.contains(&needle))
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name", "topic name cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            "name",
            format!("topic name cannot exceed {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(())
}

impl PartialEq for Topic {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Topic {}

impl Hash for Topic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({}, {:?})", self.name, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(name: &str) -> Topic {
        Topic::new(name, "", TopicCategory::Library).unwrap()
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            Topic::new("  ", "", TopicCategory::Tool),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_name_over_100_chars_rejected() {
        let long = "x".repeat(101);
        assert!(Topic::new(long, "", TopicCategory::Tool).is_err());
        let ok = "x".repeat(100);
        assert!(Topic::new(ok, "", TopicCategory::Tool).is_ok());
    }

    #[test]
    fn test_self_parent_rejected() {
        let mut t = topic("react");
        assert!(t.add_parent("react").is_err());
    }

    #[test]
    fn test_contradictory_hierarchy_rejected() {
        let mut t = topic("react");
        t.add_parent("html").unwrap();
        assert!(t.add_child("html").is_err());
        t.add_child("redux").unwrap();
        assert!(t.add_parent("redux").is_err());
    }

    #[test]
    fn test_prerequisite_relation_is_by_name() {
        let html = topic("html");
        let mut react = topic("react");
        react.add_parent("html").unwrap();
        assert!(html.is_prerequisite_for(&react));
        assert!(!react.is_prerequisite_for(&html));
    }

    #[test]
    fn test_complexity_grows_with_prerequisites() {
        let mut t = topic("react");
        let base = t.learning_complexity();
        t.add_parent("html").unwrap();
        t.add_parent("javascript").unwrap();
        assert!(t.learning_complexity() > base);
    }

    #[test]
    fn test_equality_by_name_only() {
        let a = topic("html");
        let mut b = topic("html");
        b.add_keyword("markup").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let mut t = topic("React");
        t.add_keyword("Frontend").unwrap();
        assert!(t.matches_keyword("react"));
        assert!(t.matches_keyword("FRONT"));
        assert!(!t.matches_keyword("backend"));
    }

    #[test]
    fn test_difficulty_weight_bounds() {
        assert!(topic("a").with_difficulty_weight(0.0).is_err());
        assert!(topic("a").with_difficulty_weight(5.1).is_err());
        assert!(topic("a").with_difficulty_weight(2.5).is_ok());
    }
}
