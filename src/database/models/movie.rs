use serde::{Deserialize, Serialize};

/// A catalog entry as stored and returned by the API.
///
/// Field names follow the document layout (`Title`, `Genre.Name`, ...) so the
/// same shape is used for fixtures, the database and response bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub details: MovieDetails,
}

/// Everything about a movie except its store-assigned identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Genre")]
    pub genre: Genre,
    #[serde(rename = "Director")]
    pub director: Director,
    #[serde(rename = "Featured", default)]
    pub featured: bool,
    #[serde(rename = "ImagePath", default)]
    pub image_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Bio", default)]
    pub bio: String,
    #[serde(rename = "Birth", default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
    #[serde(rename = "Death", default, skip_serializing_if = "Option::is_none")]
    pub death: Option<String>,
}

impl Movie {
    pub fn new(id: impl Into<String>, details: MovieDetails) -> Self {
        Self {
            id: id.into(),
            details,
        }
    }

    pub fn title(&self) -> &str {
        &self.details.title
    }
}
