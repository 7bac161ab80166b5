use anyhow::Context;
use tracing_subscriber::EnvFilter;

use myflix_api::{config, database::Datastore, fixtures, is_development, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("myflix_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting myFlix API in {:?} mode", config.environment);
    if is_development!() {
        tracing::warn!("Development mode: built-in JWT secret and permissive CORS are active");
    }

    let store = Datastore::connect(&config.database)
        .await
        .context("failed to connect to the store")?;

    if let Some(path) = &config.database.seed_file {
        let movies = fixtures::load_movies(path)?;
        fixtures::seed(store.movies.as_ref(), movies).await?;
    }

    let state = AppState::from_config(config, store)?;
    let app = routes::app(state, config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("myFlix API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
