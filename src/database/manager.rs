use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseConfig, StoreBackend};

use super::memory::MemoryStore;
use super::mongo::MongoStore;
use super::store::{MovieStore, UserStore};
use super::timeout::Timed;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0} already exists")]
    Duplicate(String),

    #[error("Failed to map document: {0}")]
    Serialization(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// The movie and user stores the API is wired to.
///
/// Both handles usually point at the same backend; every call through them is
/// bounded by the configured operation timeout.
#[derive(Clone)]
pub struct Datastore {
    pub movies: Arc<dyn MovieStore>,
    pub users: Arc<dyn UserStore>,
}

impl Datastore {
    /// Wrap a backend implementing both stores with the operation timeout
    pub fn new<S>(store: S, operation_timeout: Duration) -> Self
    where
        S: MovieStore + UserStore + 'static,
    {
        let store = Arc::new(Timed::new(store, operation_timeout));
        Self {
            movies: store.clone(),
            users: store,
        }
    }

    pub fn in_memory(operation_timeout: Duration) -> Self {
        Self::new(MemoryStore::new(), operation_timeout)
    }

    /// Connect to the backend selected by configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        match config.backend {
            StoreBackend::Memory => {
                info!("Using in-memory store");
                Ok(Self::in_memory(config.operation_timeout()))
            }
            StoreBackend::MongoDb => {
                let store = MongoStore::connect(config).await?;
                store.ensure_indexes().await?;
                info!("Connected to MongoDB database: {}", config.name);
                Ok(Self::new(store, config.operation_timeout()))
            }
        }
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.users.ping().await
    }
}
