use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::Datastore;

/// Route-level policy decided by configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy {
    /// GET/DELETE /users/:Name require a token (and ownership for DELETE)
    pub protect_user_routes: bool,
    /// Profile updates are validated with the registration rules
    pub strict_update: bool,
}

/// Shared handler state: stores, token service, hasher and policy
#[derive(Clone)]
pub struct AppState {
    pub store: Datastore,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
    pub policy: AccessPolicy,
}

impl AppState {
    pub fn new(store: Datastore, tokens: TokenService, passwords: PasswordHasher, policy: AccessPolicy) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            passwords,
            policy,
        }
    }

    /// Build state for `config` around an already connected store
    pub fn from_config(config: &AppConfig, store: Datastore) -> anyhow::Result<Self> {
        config.validate()?;
        let tokens = TokenService::from_config(&config.security)?;

        Ok(Self::new(
            store,
            tokens,
            PasswordHasher::new(config.security.bcrypt_cost),
            AccessPolicy {
                protect_user_routes: config.security.protect_user_routes,
                strict_update: config.validation.strict_update,
            },
        ))
    }
}
