//! In-memory store for tests and local development

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::StoreError;
use super::models::{Movie, MovieDetails, NewUser, User, UserChanges};
use super::store::{MovieStore, StoreResult, UserStore};

/// Movies keep insertion order; users are keyed by name.
#[derive(Clone, Default)]
pub struct MemoryStore {
    movies: Arc<RwLock<Vec<Movie>>>,
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Mutate the named user under the write lock and hand back a copy
    async fn modify<F>(&self, name: &str, f: F) -> StoreResult<Option<User>>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write().await;
        Ok(users.get_mut(name).map(|user| {
            f(user);
            user.clone()
        }))
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Movie>> {
        Ok(self.movies.read().await.clone())
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.details.title == title).cloned())
    }

    async fn find_by_genre(&self, name: &str) -> StoreResult<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.details.genre.name == name).cloned())
    }

    async fn find_by_director(&self, name: &str) -> StoreResult<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.details.director.name == name).cloned())
    }

    async fn insert(&self, details: MovieDetails) -> StoreResult<Movie> {
        let movie = Movie::new(Self::next_id(), details);
        self.movies.write().await.push(movie.clone());
        Ok(movie)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(name).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&new_user.name) {
            return Err(StoreError::Duplicate(new_user.name));
        }

        let user = User::from_new(Self::next_id(), new_user);
        users.insert(user.name.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, name: &str, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;

        // Renaming re-keys the map, so the target name must be free
        if let Some(new_name) = changes.name.as_deref() {
            if new_name != name && users.contains_key(name) && users.contains_key(new_name) {
                return Err(StoreError::Duplicate(new_name.to_string()));
            }
        }

        let Some(mut user) = users.remove(name) else {
            return Ok(None);
        };
        user.apply(changes);
        users.insert(user.name.clone(), user.clone());
        Ok(Some(user))
    }

    async fn add_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>> {
        self.modify(name, |user| {
            user.add_favorite(movie_id);
        })
        .await
    }

    async fn remove_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>> {
        self.modify(name, |user| {
            user.remove_favorite(movie_id);
        })
        .await
    }

    async fn delete(&self, name: &str) -> StoreResult<Option<User>> {
        Ok(self.users.write().await.remove(name))
    }
}
