//! MongoDB backend using the official async driver.
//!
//! Movies live in the `movies` collection and users in `users`, with the
//! document field names the API exposes (`Title`, `Genre.Name`, `Name`,
//! `FavoriteMovies`, ...). Identifiers are native ObjectIds in the database and
//! hex strings everywhere else.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use crate::config::DatabaseConfig;

use super::manager::StoreError;
use super::models::{Movie, MovieDetails, NewUser, User, UserChanges};
use super::store::{MovieStore, StoreResult, UserStore};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
struct MovieDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(flatten)]
    details: MovieDetails,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Password")]
    password: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Birthday", default, skip_serializing_if = "Option::is_none")]
    birthday: Option<NaiveDate>,
    #[serde(rename = "FavoriteMovies", default)]
    favorite_movies: Vec<String>,
}

impl From<MovieDocument> for Movie {
    fn from(doc: MovieDocument) -> Self {
        Movie::new(doc.id.to_hex(), doc.details)
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id.to_hex(),
            name: doc.name,
            password: doc.password,
            email: doc.email,
            birthday: doc.birthday,
            favorite_movies: doc.favorite_movies,
        }
    }
}

/// Map a duplicate-key failure on the unique `Name` index to `StoreError::Duplicate`
fn map_write_error(err: mongodb::error::Error, name: &str) -> StoreError {
    let duplicate = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    };

    if duplicate {
        StoreError::Duplicate(name.to_string())
    } else {
        StoreError::from(err)
    }
}

/// `$set` document for the fields present in `changes`
fn set_document(changes: &UserChanges) -> Document {
    let mut set = Document::new();
    if let Some(name) = &changes.name {
        set.insert("Name", name.as_str());
    }
    if let Some(hash) = &changes.password_hash {
        set.insert("Password", hash.as_str());
    }
    if let Some(email) = &changes.email {
        set.insert("Email", email.as_str());
    }
    if let Some(birthday) = &changes.birthday {
        set.insert("Birthday", birthday.format("%Y-%m-%d").to_string());
    }
    set
}

#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.url).await?;
        options.app_name = Some("myflix-api".to_string());
        options.connect_timeout = Some(config.connect_timeout());
        options.server_selection_timeout = Some(config.connect_timeout());

        let client = Client::with_options(options)?;
        Ok(Self::new(client.database(&config.name)))
    }

    /// Unique index on user names; safe to call on every startup
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_name = IndexModel::builder()
            .keys(doc! { "Name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(unique_name).await?;

        let title = IndexModel::builder().keys(doc! { "Title": 1 }).build();
        self.movies().create_index(title).await?;
        Ok(())
    }

    fn movies(&self) -> Collection<MovieDocument> {
        self.database.collection("movies")
    }

    fn users(&self) -> Collection<UserDocument> {
        self.database.collection("users")
    }

    async fn find_movie(&self, filter: Document) -> StoreResult<Option<Movie>> {
        let doc = self.movies().find_one(filter).await?;
        Ok(doc.map(Movie::from))
    }

    async fn update_user(&self, name: &str, update: Document) -> StoreResult<Option<User>> {
        let doc = self
            .users()
            .find_one_and_update(doc! { "Name": name }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(doc.map(User::from))
    }
}

#[async_trait]
impl MovieStore for MongoStore {
    async fn list(&self) -> StoreResult<Vec<Movie>> {
        let cursor = self.movies().find(doc! {}).await?;
        let docs: Vec<MovieDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Movie::from).collect())
    }

    async fn find_by_title(&self, title: &str) -> StoreResult<Option<Movie>> {
        self.find_movie(doc! { "Title": title }).await
    }

    async fn find_by_genre(&self, name: &str) -> StoreResult<Option<Movie>> {
        self.find_movie(doc! { "Genre.Name": name }).await
    }

    async fn find_by_director(&self, name: &str) -> StoreResult<Option<Movie>> {
        self.find_movie(doc! { "Director.Name": name }).await
    }

    async fn insert(&self, details: MovieDetails) -> StoreResult<Movie> {
        let doc = MovieDocument {
            id: ObjectId::new(),
            details,
        };
        self.movies().insert_one(&doc).await?;
        Ok(doc.into())
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        let doc = self.users().find_one(doc! { "Name": name }).await?;
        Ok(doc.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let doc = UserDocument {
            id: ObjectId::new(),
            name: user.name,
            password: user.password_hash,
            email: user.email,
            birthday: user.birthday,
            favorite_movies: Vec::new(),
        };
        self.users()
            .insert_one(&doc)
            .await
            .map_err(|e| map_write_error(e, &doc.name))?;
        Ok(doc.into())
    }

    async fn update(&self, name: &str, changes: UserChanges) -> StoreResult<Option<User>> {
        let set = set_document(&changes);
        if set.is_empty() {
            return self.find_by_name(name).await;
        }

        let target = changes.name.as_deref().unwrap_or(name);
        self.users()
            .find_one_and_update(doc! { "Name": name }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map(|doc| doc.map(User::from))
            .map_err(|e| map_write_error(e, target))
    }

    async fn add_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>> {
        self.update_user(name, doc! { "$addToSet": { "FavoriteMovies": movie_id } })
            .await
    }

    async fn remove_favorite(&self, name: &str, movie_id: &str) -> StoreResult<Option<User>> {
        self.update_user(name, doc! { "$pull": { "FavoriteMovies": movie_id } })
            .await
    }

    async fn delete(&self, name: &str) -> StoreResult<Option<User>> {
        let doc = self.users().find_one_and_delete(doc! { "Name": name }).await?;
        Ok(doc.map(User::from))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_document_only_carries_present_fields() {
        let changes = UserChanges {
            email: Some("new@x.com".to_string()),
            birthday: NaiveDate::from_ymd_opt(1990, 4, 2),
            ..Default::default()
        };
        let set = set_document(&changes);

        assert_eq!(set.len(), 2);
        assert_eq!(set.get_str("Email").unwrap(), "new@x.com");
        assert_eq!(set.get_str("Birthday").unwrap(), "1990-04-02");
        assert!(set_document(&UserChanges::default()).is_empty());
    }

    #[test]
    fn documents_map_object_ids_to_hex() {
        let id = ObjectId::new();
        let user: User = UserDocument {
            id,
            name: "johnd1".to_string(),
            password: "hash".to_string(),
            email: "john@x.com".to_string(),
            birthday: None,
            favorite_movies: vec!["m1".to_string()],
        }
        .into();

        assert_eq!(user.id, id.to_hex());
        assert_eq!(user.favorite_movies, vec!["m1".to_string()]);
    }
}
