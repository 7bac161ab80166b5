// handlers/protected/movies.rs - catalog reads, token required

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::database::models::{Director, Genre, Movie};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /movies
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, ApiError> {
    let movies = state.store.movies.list().await?;
    tracing::debug!("Listing {} movies", movies.len());
    Ok(Json(movies))
}

/// GET /movies/:Title
pub async fn by_title(State(state): State<AppState>, Path(title): Path<String>) -> Result<Json<Movie>, ApiError> {
    state
        .store
        .movies
        .find_by_title(&title)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("{} was not found", title)))
}

/// GET /movies/genre/:Name - the Genre sub-document only
pub async fn genre(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<Genre>, ApiError> {
    state
        .store
        .movies
        .find_by_genre(&name)
        .await?
        .map(|movie| Json(movie.details.genre))
        .ok_or_else(|| ApiError::not_found(format!("Genre {} was not found", name)))
}

/// GET /movies/director/:Name - the Director sub-document only
pub async fn director(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<Director>, ApiError> {
    state
        .store
        .movies
        .find_by_director(&name)
        .await?
        .map(|movie| Json(movie.details.director))
        .ok_or_else(|| ApiError::not_found(format!("Director {} was not found", name)))
}
