// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Repository aggregate.
//!
//! A [`Repository`] is the unit a learning path is built from: a scanned
//! codebase with topics, skills, and metadata attached by analysis
//! collaborators. Identity is the opaque `repository_id`; equality is by
//! filesystem `path`. The derived properties (`complexity_score`,
//! `learning_hours_estimate`, `content_hash`) are recomputed on every
//! mutation that can affect them, never set directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use crate::domain::metadata::{AnalysisUpdate, RepositoryMetadata};
use crate::domain::skill::{Skill, SkillLevel, SkillType};
use crate::domain::topic::Topic;
use crate::errors::{DomainError, DomainResult};

/// Maximum repository name length.
const MAX_NAME_LEN: usize = 255;

/// Characters a filesystem-safe repository name may not contain.
const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Learning-hour estimates are capped here.
const MAX_LEARNING_HOURS: u32 = 200;

/// Languages the analysis pipeline understands.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "python", "javascript", "typescript", "java", "c++", "c#", "c", "go", "rust", "kotlin",
    "swift", "php", "ruby", "scala", "r", "matlab", "shell", "dockerfile", "yaml", "json",
    "html", "css",
];

/// Baseline complexity contribution per language. Languages missing from
/// the table contribute the default of 2.0.
fn language_complexity(language: &str) -> f64 {
    match language {
        "python" => 2.0,
        "javascript" => 2.5,
        "typescript" => 3.0,
        "java" => 3.5,
        "c++" => 4.5,
        "c" => 4.0,
        "rust" => 4.8,
        "go" => 3.2,
        "kotlin" => 3.3,
        "swift" => 3.1,
        "php" => 2.8,
        "ruby" => 2.6,
        "scala" => 4.2,
        _ => 2.0,
    }
}

/// Skill types a primary skill may take for a given language. An empty
/// slice means the language is unconstrained.
fn compatible_skill_types(language: &str) -> &'static [SkillType] {
    match language {
        "python" => &[
            SkillType::Backend,
            SkillType::DataScience,
            SkillType::MachineLearning,
        ],
        "javascript" | "typescript" => &[SkillType::Frontend, SkillType::Backend],
        "java" | "kotlin" => &[SkillType::Backend, SkillType::Mobile],
        "swift" => &[SkillType::Mobile],
        "go" => &[
            SkillType::Backend,
            SkillType::Infrastructure,
            SkillType::Devops,
        ],
        "rust" => &[SkillType::Backend, SkillType::Infrastructure],
        "dockerfile" => &[SkillType::Devops, SkillType::Infrastructure],
        _ => &[],
    }
}

/// A scanned code repository with its analysis results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub repository_id: Uuid,
    pub name: String,
    pub path: String,
    /// Lowercased, guaranteed to be in the supported set.
    pub primary_language: String,
    pub description: Option<String>,

    pub topics: Vec<Topic>,
    pub primary_skill: Option<Skill>,
    pub secondary_skills: BTreeSet<Skill>,
    pub metadata: RepositoryMetadata,

    // Derived, recomputed on mutation.
    pub complexity_score: f64,
    pub learning_hours_estimate: u32,
    pub content_hash: String,

    pub created_at: DateTime<Utc>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Create a repository, validating name, path, and language.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        primary_language: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let path = path.into();
        let primary_language = primary_language.into().to_lowercase();

        validate_name(&name)?;
        if path.trim().is_empty() {
            return Err(DomainError::validation(
                "path",
                "repository path cannot be empty",
            ));
        }
        if !SUPPORTED_LANGUAGES.contains(&primary_language.as_str()) {
            return Err(DomainError::validation(
                "primary_language",
                format!("language '{primary_language}' is not supported"),
            ));
        }

        let mut repo = Self {
            repository_id: Uuid::new_v4(),
            name,
            path,
            primary_language,
            description: None,
            topics: Vec::new(),
            primary_skill: None,
            secondary_skills: BTreeSet::new(),
            metadata: RepositoryMetadata::default(),
            complexity_score: 0.0,
            learning_hours_estimate: 0,
            content_hash: String::new(),
            created_at: Utc::now(),
            last_analyzed_at: None,
        };
        repo.recalculate();
        Ok(repo)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a topic. Topics already present (by name) are ignored.
    pub fn add_topic(&mut self, topic: Topic) {
        if self.topics.iter().any(|t| t.name == topic.name) {
            return;
        }
        self.topics.push(topic);
        self.recalculate();
    }

    /// Set the primary skill.
    ///
    /// The skill type must be in the language's compatibility set (unknown
    /// languages are unconstrained), and must not already be a secondary
    /// skill.
    pub fn set_primary_skill(&mut self, skill: Skill) -> DomainResult<()> {
        let compatible = compatible_skill_types(&self.primary_language);
        if !compatible.is_empty() && !compatible.contains(&skill.skill_type) {
            return Err(DomainError::business_rule(format!(
                "skill type {} is not compatible with language {}",
                skill.skill_type, self.primary_language
            )));
        }
        if self.secondary_skills.contains(&skill) {
            return Err(DomainError::business_rule(
                "primary skill cannot also be a secondary skill",
            ));
        }
        self.primary_skill = Some(skill);
        self.recalculate();
        Ok(())
    }

    /// Add a secondary skill. The primary skill cannot double as one.
    pub fn add_secondary_skill(&mut self, skill: Skill) -> DomainResult<()> {
        if self.primary_skill == Some(skill) {
            return Err(DomainError::business_rule(
                "secondary skill cannot be the same as the primary skill",
            ));
        }
        self.secondary_skills.insert(skill);
        self.recalculate();
        Ok(())
    }

    /// Merge an analysis update into the metadata and refresh the derived
    /// properties and analysis timestamp.
    pub fn apply_analysis(&mut self, update: &AnalysisUpdate) {
        self.metadata = self.metadata.apply(update);
        self.last_analyzed_at = Some(Utc::now());
        self.recalculate();
    }

    /// Whether the repository changed since a previously recorded hash.
    pub fn has_changed_since(&self, previous_hash: &str) -> bool {
        self.content_hash != previous_hash
    }

    /// Natural learning priority; lower sorts earlier.
    ///
    /// Sum of the primary skill-level weight, the integer part of the
    /// complexity score, and the total prerequisite count across topics.
    /// This is the stable tie-breaking key used for graph construction and
    /// topological ordering.
    pub fn recommended_order(&self) -> u32 {
        let skill_weight = self
            .primary_skill
            .map(|s| s.skill_level.weight())
            .unwrap_or(0);
        let prerequisite_count: usize =
            self.topics.iter().map(|t| t.parent_topics.len()).sum();
        skill_weight + self.complexity_score as u32 + prerequisite_count as u32
    }

    /// Whether this repository suits a learner targeting `level`.
    ///
    /// Skill evidence wins: a repository with a primary skill suits levels
    /// at most one step away from it. Skill-less repositories only suit
    /// basic learners.
    pub fn suits_level(&self, level: SkillLevel) -> bool {
        match self.primary_skill {
            Some(skill) => {
                let gap = (skill.skill_level as i32 - level as i32).abs();
                gap <= 1
            }
            None => level == SkillLevel::Basic,
        }
    }

    // Recompute complexity, hours, and the content hash. Called after any
    // mutation of topics, skills, or metadata.
    fn recalculate(&mut self) {
        self.complexity_score = self.compute_complexity();
        self.learning_hours_estimate = self.compute_learning_hours();
        self.content_hash = self.compute_content_hash();
    }

    fn compute_complexity(&self) -> f64 {
        let mut score = 1.0;
        score += language_complexity(&self.primary_language);

        if let Some(skill) = &self.primary_skill {
            score += skill.learning_difficulty() as f64 * 0.3;
        }
        for skill in &self.secondary_skills {
            score += skill.learning_difficulty() as f64 * 0.1;
        }

        let topic_complexity: f64 = self.topics.iter().map(|t| t.learning_complexity()).sum();
        score += (topic_complexity * 0.2).min(2.0);

        score += match self.metadata.lines_of_code {
            loc if loc > 10_000 => 1.5,
            loc if loc > 5_000 => 1.0,
            loc if loc > 1_000 => 0.5,
            _ => 0.0,
        };
        score += match self.metadata.file_count {
            n if n > 100 => 1.0,
            n if n > 50 => 0.5,
            _ => 0.0,
        };
        score += (self.metadata.dependency_count() as f64 * 0.1).min(1.5);

        score.min(10.0)
    }

    fn compute_learning_hours(&self) -> u32 {
        let base = 20.0;
        let complexity_hours = self.complexity_score * 8.0;

        let mut skill_hours = 0.0;
        if let Some(skill) = &self.primary_skill {
            skill_hours += skill.estimate_learning_hours() as f64;
        }
        for skill in &self.secondary_skills {
            skill_hours += skill.estimate_learning_hours() as f64 * 0.3;
        }

        let topic_hours: f64 = self
            .topics
            .iter()
            .map(|t| t.learning_complexity() * 5.0)
            .sum();

        let size_multiplier = match self.metadata.lines_of_code {
            loc if loc > 10_000 => 1.5,
            loc if loc > 5_000 => 1.2,
            _ => 1.0,
        };

        let total = (base + complexity_hours + skill_hours + topic_hours) * size_multiplier;
        (total as u32).min(MAX_LEARNING_HOURS)
    }

    fn compute_content_hash(&self) -> String {
        let descriptor = format!(
            "{}:{}:{}:{}",
            self.name,
            self.primary_language,
            self.metadata.lines_of_code,
            self.topics.len()
        );
        let digest = Sha256::digest(descriptor.as_bytes());
        hex::encode(digest)
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation(
            "name",
            "repository name cannot be empty",
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            "name",
            format!("repository name cannot exceed {MAX_NAME_LEN} characters"),
        ));
    }
    if name.contains(INVALID_NAME_CHARS) {
        return Err(DomainError::validation(
            "name",
            r#"repository name contains invalid characters (<>:"/\|?*)"#,
        ));
    }
    Ok(())
}

impl PartialEq for Repository {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Repository {}

impl Hash for Repository {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.primary_skill {
            Some(skill) => write!(
                f,
                "Repository({}, lang={}, skill={})",
                self.name, self.primary_language, skill
            ),
            None => write!(f, "Repository({}, lang={})", self.name, self.primary_language),
        }
    }
}
