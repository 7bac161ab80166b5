// handlers/public/auth.rs - POST /login handler

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::requests::{JsonBody, LoginRequest};
use crate::state::AppState;

const LOGIN_FAILED: &str = "Incorrect username or password.";

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// POST /login - verify credentials and issue a bearer token.
///
/// Unknown names and wrong passwords get the same 401.
pub async fn login_post(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(user) = state.store.users.find_by_name(&payload.name).await? else {
        tracing::warn!("Login failed: unknown user '{}'", payload.name);
        return Err(ApiError::unauthorized(LOGIN_FAILED));
    };

    if !state.passwords.verify(&payload.password, &user.password).await? {
        tracing::warn!("Login failed: bad password for '{}'", payload.name);
        return Err(ApiError::unauthorized(LOGIN_FAILED));
    }

    let token = state.tokens.issue(&user.name)?;
    tracing::info!("User '{}' logged in", user.name);

    Ok(Json(LoginResponse { user, token }))
}
