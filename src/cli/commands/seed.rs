use std::path::Path;

use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::{self, StoreBackend};
use crate::database::Datastore;
use crate::fixtures;

pub async fn handle(file: &Path, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    if config.database.backend == StoreBackend::Memory {
        tracing::warn!("DATABASE_BACKEND is memory; seeded movies are discarded when this command exits");
    }

    let movies = fixtures::load_movies(file)?;
    let store = Datastore::connect(&config.database).await?;
    let report = fixtures::seed(store.movies.as_ref(), movies).await?;

    output_success(
        output_format,
        &format!(
            "Seeded {}: {} inserted, {} skipped",
            file.display(),
            report.inserted,
            report.skipped
        ),
        Some(json!({ "inserted": report.inserted, "skipped": report.skipped })),
    )
}
