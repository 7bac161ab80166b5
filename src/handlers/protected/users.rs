// handlers/protected/users.rs - account mutations, token and ownership required

use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};

use crate::database::models::{User, UserChanges};
use crate::error::ApiError;
use crate::handlers::public::users::remove_account;
use crate::handlers::requests::{JsonBody, UserBody};
use crate::middleware::ValidatedUser;
use crate::state::AppState;
use crate::types::Operation;
use crate::validation::check_user_body;

fn not_found(name: &str) -> ApiError {
    ApiError::not_found(format!("{} was not found", name))
}

/// PUT /users/:Name - update any subset of Name, Password, Email, Birthday
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<ValidatedUser>,
    Path(name): Path<String>,
    JsonBody(body): JsonBody<UserBody>,
) -> Result<Json<User>, ApiError> {
    identity.ensure_owner(&name)?;
    check_user_body(&body, Operation::Update, state.policy.strict_update)?;

    let birthday = body.birthday();
    let password_hash = match body.password.as_deref() {
        Some(password) => Some(state.passwords.hash(password).await?),
        None => None,
    };

    let changes = UserChanges {
        name: body.name,
        password_hash,
        email: body.email,
        birthday,
    };

    let user = state
        .store
        .users
        .update(&name, changes)
        .await?
        .ok_or_else(|| not_found(&name))?;

    tracing::info!("Updated user '{}' ({})", user.name, user.id);
    Ok(Json(user))
}

/// POST /users/:Name/:movieID
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(identity): Extension<ValidatedUser>,
    Path((name, movie_id)): Path<(String, String)>,
) -> Result<Json<User>, ApiError> {
    identity.ensure_owner(&name)?;

    state
        .store
        .users
        .add_favorite(&name, &movie_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&name))
}

/// DELETE /users/:Name/:movieID
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(identity): Extension<ValidatedUser>,
    Path((name, movie_id)): Path<(String, String)>,
) -> Result<Json<User>, ApiError> {
    identity.ensure_owner(&name)?;

    state
        .store
        .users
        .remove_favorite(&name, &movie_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&name))
}

/// DELETE /users/:Name when user routes are protected
pub async fn deregister(
    State(state): State<AppState>,
    Extension(identity): Extension<ValidatedUser>,
    Path(name): Path<String>,
) -> Result<String, ApiError> {
    identity.ensure_owner(&name)?;
    remove_account(&state, &name).await
}
