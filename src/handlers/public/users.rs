// handlers/public/users.rs - account routes reachable without a token

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::handlers::requests::{JsonBody, UserBody};
use crate::state::AppState;
use crate::types::Operation;
use crate::validation::check_user_body;

/// POST /users - register a new account
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UserBody>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    check_user_body(&body, Operation::Create, false)?;

    let birthday = body.birthday();
    let (Some(name), Some(password), Some(email)) = (body.name, body.password, body.email) else {
        return Err(ApiError::bad_request("Name, Password and Email are required"));
    };

    if state.store.users.find_by_name(&name).await?.is_some() {
        return Err(ApiError::conflict(format!("{} already exists", name)));
    }

    let password_hash = state.passwords.hash(&password).await?;
    let user = state
        .store
        .users
        .insert(NewUser {
            name,
            password_hash,
            email,
            birthday,
        })
        .await?;

    tracing::info!("Registered user '{}' ({})", user.name, user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users/:Name
pub async fn show(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<User>, ApiError> {
    state
        .store
        .users
        .find_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("{} was not found", name)))
}

/// DELETE /users/:Name - open deregistration
pub async fn deregister(State(state): State<AppState>, Path(name): Path<String>) -> Result<String, ApiError> {
    remove_account(&state, &name).await
}

pub(crate) async fn remove_account(state: &AppState, name: &str) -> Result<String, ApiError> {
    match state.store.users.delete(name).await? {
        Some(user) => {
            tracing::info!("Deregistered user '{}' ({})", user.name, user.id);
            Ok(format!("{} was deleted.", name))
        }
        None => Err(ApiError::not_found(format!("{} was not found", name))),
    }
}
