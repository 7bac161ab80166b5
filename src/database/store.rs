//! Store traits the handler layer talks to.
//!
//! Each method is a single atomic operation against the backing store. Lookups
//! return `Ok(None)` when nothing matches; mutations keyed by user name return
//! the post-update record, or `Ok(None)` when no user has that name.

use async_trait::async_trait;

use super::manager::StoreError;
use super::models::{Movie, MovieDetails, NewUser, User, UserChanges};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Movie>>;

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Movie>>;

    /// First movie whose `Genre.Name` matches
    async fn find_by_genre(&self, name: &str) -> StoreResult<Option<Movie>>;

    /// First movie whose `Director.Name` matches
    async fn find_by_director(&self, name: &str) -> StoreResult<Option<Movie>>;

    /// Used by seeding; titles are not checked for uniqueness here
    async fn insert(&self, details: MovieDetails) -> StoreResult<Movie>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>>;

    /// Fails with `StoreError::Duplicate` if the name is already taken
    async fn insert(&self, user: NewUser) -> StoreResult<User>;

    async fn update(&self, name: &str, changes: UserChanges) -> StoreResult<Option<User>>;

    async fn add_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>>;

    async fn remove_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>>;

    /// Returns the removed user
    async fn delete(&self, name: &str) -> StoreResult<Option<User>>;

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
