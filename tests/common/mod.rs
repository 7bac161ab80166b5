#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};

use myflix_api::auth::{PasswordHasher, TokenService};
use myflix_api::config::AppConfig;
use myflix_api::database::models::{Movie, MovieDetails, NewUser, User, UserChanges};
use myflix_api::database::{Datastore, MemoryStore, MovieStore, StoreResult, UserStore};
use myflix_api::{fixtures, routes, AccessPolicy, AppState};

pub const PASSWORD: &str = "Secr3t!";

/// Counts every call that reaches the backing store
pub struct CountingStore {
    inner: MemoryStore,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MovieStore for CountingStore {
    async fn list(&self) -> StoreResult<Vec<Movie>> {
        self.hit();
        self.inner.list().await
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Movie>> {
        self.hit();
        self.inner.find_by_title(title).await
    }

    async fn find_by_genre(&self, name: &str) -> StoreResult<Option<Movie>> {
        self.hit();
        self.inner.find_by_genre(name).await
    }

    async fn find_by_director(&self, name: &str) -> StoreResult<Option<Movie>> {
        self.hit();
        self.inner.find_by_director(name).await
    }

    async fn insert(&self, details: MovieDetails) -> StoreResult<Movie> {
        self.hit();
        MovieStore::insert(&self.inner, details).await
    }
}

#[async_trait]
impl UserStore for CountingStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        self.hit();
        self.inner.find_by_name(name).await
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        self.hit();
        UserStore::insert(&self.inner, user).await
    }

    async fn update(&self, name: &str, changes: UserChanges) -> StoreResult<Option<User>> {
        self.hit();
        self.inner.update(name, changes).await
    }

    async fn add_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>> {
        self.hit();
        self.inner.add_favorite(name, movie_id).await
    }

    async fn remove_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>> {
        self.hit();
        self.inner.remove_favorite(name, movie_id).await
    }

    async fn delete(&self, name: &str) -> StoreResult<Option<User>> {
        self.hit();
        self.inner.delete(name).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.hit();
        self.inner.ping().await
    }
}

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: Datastore,
    pub tokens: Arc<TokenService>,
    calls: Arc<AtomicUsize>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Number of store calls made so far
    pub fn store_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn authed(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", token))
    }

    /// POST /users with the shared test password
    pub async fn register(&self, name: &str, email: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/users"))
            .json(&json!({ "Name": name, "Password": PASSWORD, "Email": email }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register {} failed: {}", name, res.status());
        Ok(res.json().await?)
    }

    /// POST /login and return the bearer token
    pub async fn login(&self, name: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "Name": name, "Password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login {} failed: {}", name, res.status());
        let body: Value = res.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    /// Register `name` and log in, returning the token
    pub async fn account(&self, name: &str) -> Result<String> {
        self.register(name, &format!("{}@example.com", name)).await?;
        self.login(name, PASSWORD).await
    }

    pub async fn seed_movies(&self) -> Result<()> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/movies.yaml");
        let movies = fixtures::load_movies(std::path::Path::new(path))?;
        fixtures::seed(self.store.movies.as_ref(), movies).await?;
        Ok(())
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(AccessPolicy::default()).await
}

/// Serve the full router on a free port over a fresh in-memory store
pub async fn spawn_server_with(policy: AccessPolicy) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let calls = Arc::new(AtomicUsize::new(0));
    let store = Datastore::new(
        CountingStore {
            inner: MemoryStore::new(),
            calls: calls.clone(),
        },
        Duration::from_secs(5),
    );

    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;

    let tokens = TokenService::new("myflix_test_secret", "myflix-api", 1)?;
    let state = AppState::new(store.clone(), tokens, PasswordHasher::new(4), policy);
    let tokens = state.tokens.clone();
    let app = routes::app(state, &config);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        base_url,
        client: reqwest::Client::new(),
        store,
        tokens,
        calls,
    })
}
