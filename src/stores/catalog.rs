// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! YAML repository catalogs.
//!
//! The demo driver and tests seed the in-memory repository store from a
//! small YAML file instead of a live scanner. The catalog is declarative:
//!
//! ```yaml
//! repositories:
//!   - name: flask-api
//!     path: /repos/flask-api
//!     language: python
//!     skill: { type: backend, level: basic }
//!     topics:
//!       - name: flask
//!         category: framework
//!         parents: [python-basics]
//!     metadata:
//!       lines_of_code: 1200
//!       has_tests: true
//! ```
//!
//! Entries pass through the same domain constructors and mutators as
//! scanner output, so every validation rule applies to catalog data too.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::{
    AnalysisUpdate, Repository, Skill, SkillLevel, SkillType, Topic, TopicCategory,
};
use crate::errors::{DomainError, DomainResult};

#[derive(Debug, Deserialize)]
struct Catalog {
    repositories: Vec<CatalogRepository>,
}

#[derive(Debug, Deserialize)]
struct CatalogRepository {
    name: String,
    path: String,
    language: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    skill: Option<CatalogSkill>,
    #[serde(default)]
    secondary_skills: Vec<CatalogSkill>,
    #[serde(default)]
    topics: Vec<CatalogTopic>,
    #[serde(default)]
    metadata: Option<AnalysisUpdate>,
}

#[derive(Debug, Deserialize)]
struct CatalogSkill {
    #[serde(rename = "type")]
    skill_type: SkillType,
    level: SkillLevel,
}

#[derive(Debug, Deserialize)]
struct CatalogTopic {
    name: String,
    category: TopicCategory,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parents: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Load and validate a catalog file.
pub fn load_catalog(path: &Path) -> DomainResult<Vec<Repository>> {
    let text = fs::read_to_string(path).map_err(|err| {
        DomainError::validation("catalog", format!("cannot read {}: {err}", path.display()))
    })?;
    parse_catalog(&text)
}

/// Parse catalog YAML into repository entities.
pub fn parse_catalog(text: &str) -> DomainResult<Vec<Repository>> {
    let catalog: Catalog = serde_yaml::from_str(text)
        .map_err(|err| DomainError::validation("catalog", format!("invalid catalog: {err}")))?;

    let mut repositories = Vec::with_capacity(catalog.repositories.len());
    for entry in catalog.repositories {
        repositories.push(build_repository(entry)?);
    }
    Ok(repositories)
}

fn build_repository(entry: CatalogRepository) -> DomainResult<Repository> {
    let mut repository = Repository::new(entry.name, entry.path, entry.language)?;
    if let Some(description) = entry.description {
        repository = repository.with_description(description);
    }

    for topic_entry in entry.topics {
        let mut topic = Topic::new(topic_entry.name, topic_entry.description, topic_entry.category)?;
        for parent in &topic_entry.parents {
            topic.add_parent(parent)?;
        }
        for keyword in &topic_entry.keywords {
            topic.add_keyword(keyword)?;
        }
        repository.add_topic(topic);
    }

    if let Some(skill) = entry.skill {
        repository.set_primary_skill(Skill::new(skill.skill_type, skill.level))?;
    }
    for skill in entry.secondary_skills {
        repository.add_secondary_skill(Skill::new(skill.skill_type, skill.level))?;
    }

    if let Some(update) = entry.metadata {
        repository.apply_analysis(&update);
    }

    Ok(repository)
}
