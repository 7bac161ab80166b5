use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use super::manager::StoreError;
use super::models::{Movie, MovieDetails, NewUser, User, UserChanges};
use super::store::{MovieStore, StoreResult, UserStore};

/// Bounds every call on the wrapped store by a fixed timeout.
pub struct Timed<S> {
    inner: S,
    limit: Duration,
}

impl<S> Timed<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn run<T>(&self, op: &'static str, fut: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("Store operation '{}' timed out after {:?}", op, self.limit);
                Err(StoreError::Timeout(self.limit))
            }
        }
    }
}

#[async_trait]
impl<S: MovieStore> MovieStore for Timed<S> {
    async fn list(&self) -> StoreResult<Vec<Movie>> {
        self.run("movies.list", self.inner.list()).await
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Movie>> {
        self.run("movies.find_by_title", self.inner.find_by_title(title)).await
    }

    async fn find_by_genre(&self, name: &str) -> StoreResult<Option<Movie>> {
        self.run("movies.find_by_genre", self.inner.find_by_genre(name)).await
    }

    async fn find_by_director(&self, name: &str) -> StoreResult<Option<Movie>> {
        self.run("movies.find_by_director", self.inner.find_by_director(name)).await
    }

    async fn insert(&self, details: MovieDetails) -> StoreResult<Movie> {
        self.run("movies.insert", MovieStore::insert(&self.inner, details)).await
    }
}

#[async_trait]
impl<S: UserStore> UserStore for Timed<S> {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        self.run("users.find_by_name", self.inner.find_by_name(name)).await
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        self.run("users.insert", UserStore::insert(&self.inner, user)).await
    }

    async fn update(&self, name: &str, changes: UserChanges) -> StoreResult<Option<User>> {
        self.run("users.update", self.inner.update(name, changes)).await
    }

    async fn add_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>> {
        self.run("users.add_favorite", self.inner.add_favorite(name, movie_id)).await
    }

    async fn remove_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>> {
        self.run("users.remove_favorite", self.inner.remove_favorite(name, movie_id)).await
    }

    async fn delete(&self, name: &str) -> StoreResult<Option<User>> {
        self.run("users.delete", self.inner.delete(name)).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.run("users.ping", self.inner.ping()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    /// Never answers lookups
    struct Hung;

    #[async_trait]
    impl UserStore for Hung {
        async fn find_by_name(&self, _name: &str) -> StoreResult<Option<User>> {
            std::future::pending().await
        }

        async fn insert(&self, _user: NewUser) -> StoreResult<User> {
            std::future::pending().await
        }

        async fn update(&self, _name: &str, _changes: UserChanges) -> StoreResult<Option<User>> {
            std::future::pending().await
        }

        async fn add_favorite(&self, _name: &str, _movie_id: &str) -> StoreResult<Option<User>> {
            std::future::pending().await
        }

        async fn remove_favorite(&self, _name: &str, _movie_id: &str) -> StoreResult<Option<User>> {
            std::future::pending().await
        }

        async fn delete(&self, _name: &str) -> StoreResult<Option<User>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn hung_store_call_times_out() {
        let store = Timed::new(Hung, Duration::from_millis(20));
        let err = store.find_by_name("johnd1").await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(limit) if limit == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let store = Timed::new(MemoryStore::new(), Duration::from_secs(1));
        assert!(store.find_by_name("johnd1").await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }
}
