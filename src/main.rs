// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use trailhead::engine::GenerateRequest;
use trailhead::service::PathService;
use trailhead::stores::{
    load_catalog, InMemoryOverrideStore, InMemoryPathStore, InMemoryRepositoryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <catalog.yaml> <learner_id> [path name]", args[0]);
        eprintln!("Example: {} demos/catalog.yaml alice \"Backend Journey\"", args[0]);
        std::process::exit(1);
    }
    let catalog_path = &args[1];
    let learner_id = &args[2];
    let path_name = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| format!("Learning path for {learner_id}"));

    let repositories = load_catalog(Path::new(catalog_path))
        .with_context(|| format!("loading catalog {catalog_path}"))?;

    println!("🧭 Trailhead learning-path demo");
    println!("═══════════════════════════════");
    println!("Catalog: {catalog_path} ({} repositories)", repositories.len());
    println!("Learner: {learner_id}");
    println!();

    let repository_store = Arc::new(InMemoryRepositoryStore::new());
    repository_store.seed(repositories).await;
    let service = PathService::new(
        repository_store,
        Arc::new(InMemoryOverrideStore::new()),
        Arc::new(InMemoryPathStore::new()),
    );

    let request = GenerateRequest::new(learner_id.clone(), path_name);
    let result = service
        .generate(request)
        .await
        .context("generating learning path")?;

    println!(
        "Path '{}' (v{}): {} repositories, {} estimated hours",
        result.name, result.version, result.total_repositories, result.total_estimated_hours
    );
    println!();

    for milestone in &result.milestones {
        println!(
            "── {} ({} repos, {}h)",
            milestone.phase, milestone.repository_count, milestone.estimated_hours
        );
        println!("   {}", milestone.description);
        for node in &milestone.nodes {
            let skill = match (node.skill_type, node.skill_level) {
                (Some(skill_type), Some(level)) => format!("{skill_type}:{level}"),
                _ => "unclassified".to_string(),
            };
            println!(
                "   {:>3}. {} [{}] complexity {:.1}, ~{}h",
                node.order_index + 1,
                node.repository_name,
                skill,
                node.complexity_score,
                node.estimated_hours
            );
        }
        println!();
    }

    if !result.warnings.is_empty() {
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  ⚠ {warning}");
        }
    }

    Ok(())
}
