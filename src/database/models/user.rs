use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered account. `password` always holds a bcrypt hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Birthday", default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(rename = "FavoriteMovies", default)]
    pub favorite_movies: Vec<String>,
}

/// Input for creating a user; the store assigns the identifier
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

/// Field-level changes for a profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl User {
    pub fn from_new(id: impl Into<String>, new_user: NewUser) -> Self {
        Self {
            id: id.into(),
            name: new_user.name,
            password: new_user.password_hash,
            email: new_user.email,
            birthday: new_user.birthday,
            favorite_movies: Vec::new(),
        }
    }

    /// Apply changes in place, keeping the identifier and favorites
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(hash) = changes.password_hash {
            self.password = hash;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(birthday) = changes.birthday {
            self.birthday = Some(birthday);
        }
    }

    /// Set-insert: returns false when the movie was already a favorite
    pub fn add_favorite(&mut self, movie_id: &str) -> bool {
        if self.favorite_movies.iter().any(|m| m == movie_id) {
            return false;
        }
        self.favorite_movies.push(movie_id.to_string());
        true
    }

    pub fn remove_favorite(&mut self, movie_id: &str) -> bool {
        let before = self.favorite_movies.len();
        self.favorite_movies.retain(|m| m != movie_id);
        before != self.favorite_movies.len()
    }
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.password_hash.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
    }
}
