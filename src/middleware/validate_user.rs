use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// The token subject, resolved against the user store
#[derive(Clone, Debug)]
pub struct ValidatedUser {
    pub id: String,
    pub name: String,
}

impl ValidatedUser {
    /// Mutations under /users/:Name are limited to the account owner
    pub fn ensure_owner(&self, name: &str) -> Result<(), ApiError> {
        if self.name == name {
            Ok(())
        } else {
            tracing::warn!("User '{}' attempted to modify account '{}'", self.name, name);
            Err(ApiError::forbidden("You may only modify your own account"))
        }
    }
}

/// Middleware that resolves the JWT subject to an existing user.
/// Must run after `jwt_auth_middleware`.
pub async fn validate_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Get AuthUser from JWT middleware
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let user = state
        .store
        .users
        .find_by_name(&auth_user.name)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User validation failed: user '{}' not found", auth_user.name);
            ApiError::unauthorized(format!("User '{}' no longer exists", auth_user.name))
        })?;

    tracing::debug!("User validation successful: {} ({})", user.name, user.id);

    // Inject validated user into request
    request.extensions_mut().insert(ValidatedUser {
        id: user.id,
        name: user.name,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_owner_passes() {
        let user = ValidatedUser {
            id: "u1".to_string(),
            name: "johnd1".to_string(),
        };
        assert!(user.ensure_owner("johnd1").is_ok());
        assert!(matches!(user.ensure_owner("janed1"), Err(ApiError::Forbidden(_))));
    }
}
