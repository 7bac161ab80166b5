//! Catalog fixtures: load movie definitions from YAML or JSON and seed a store.

use std::path::Path;

use anyhow::{bail, Context};
use serde::Serialize;

use crate::database::models::MovieDetails;
use crate::database::MovieStore;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Read a list of movies from `path`, picking the format by extension
pub fn load_movies(path: &Path) -> anyhow::Result<Vec<MovieDetails>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture file {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("yaml") | Some("yml") => parse_yaml(&content),
        Some("json") => parse_json(&content),
        _ => bail!(
            "Unsupported fixture format for {} (expected .yaml, .yml or .json)",
            path.display()
        ),
    }
}

pub fn parse_yaml(content: &str) -> anyhow::Result<Vec<MovieDetails>> {
    serde_yaml::from_str(content).context("Invalid YAML movie fixture")
}

pub fn parse_json(content: &str) -> anyhow::Result<Vec<MovieDetails>> {
    serde_json::from_str(content).context("Invalid JSON movie fixture")
}

/// Insert every movie whose title is not already in the store
pub async fn seed(store: &dyn MovieStore, movies: Vec<MovieDetails>) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    for details in movies {
        if store.find_by_title(&details.title).await?.is_some() {
            tracing::debug!("Skipping existing movie '{}'", details.title);
            report.skipped += 1;
            continue;
        }

        let movie = store.insert(details).await?;
        tracing::debug!("Seeded movie '{}' ({})", movie.details.title, movie.id);
        report.inserted += 1;
    }

    tracing::info!(
        "Seeded catalog: {} inserted, {} skipped",
        report.inserted,
        report.skipped
    );
    Ok(report)
}
