// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Welcome text, liveness, token acquisition and registration.

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub mod auth;
pub mod users;

pub use auth::login_post;

/// GET / - welcome text
pub async fn root() -> &'static str {
    "Welcome to myFlix!"
}

/// GET /health - liveness plus a store ping
pub async fn health(State(state): State<AppState>) -> Result<(StatusCode, Json<Value>), ApiError> {
    match state.store.health_check().await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "store": "connected",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        )),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::service_unavailable(format!("Store unavailable: {}", e)))
        }
    }
}
