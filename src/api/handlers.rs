use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{Movie, MovieReview};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistMembership {
    pub movie_id: u64,
    pub in_watchlist: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub rating: i64,
    pub review_text: String,
}

impl ReviewRequest {
    /// Review form rules: 1-5 stars and some text
    fn validate(&self) -> AppResult<u8> {
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::InvalidInput(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        if self.review_text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Review text cannot be empty".to_string(),
            ));
        }
        Ok(self.rating as u8)
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub loading: bool,
    pub error: Option<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Title search; provider failures yield an empty list and set the status error
pub async fn search_titles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<Movie>> {
    Json(state.store.search_movies(&params.q).await)
}

pub async fn latest_titles(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.store.latest_movies().await)
}

pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Movie>> {
    state
        .store
        .movie_details(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))
}

pub async fn get_watchlist(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.store.watchlist())
}

/// Adds a movie to the watchlist and returns the updated list
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Json(movie): Json<Movie>,
) -> Json<Vec<Movie>> {
    state.store.add_to_watchlist(&movie);
    Json(state.store.watchlist())
}

pub async fn watchlist_membership(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<WatchlistMembership> {
    Json(WatchlistMembership {
        movie_id: id,
        in_watchlist: state.store.is_in_watchlist(id),
    })
}

pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> StatusCode {
    state.store.remove_from_watchlist(id);
    StatusCode::NO_CONTENT
}

pub async fn get_reviews(State(state): State<AppState>) -> Json<Vec<MovieReview>> {
    Json(state.store.reviews())
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> AppResult<Json<MovieReview>> {
    state
        .store
        .review_for_movie(movie_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No review for movie {}", movie_id)))
}

/// Creates or replaces the review for a movie
pub async fn put_review(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
    Json(request): Json<ReviewRequest>,
) -> AppResult<Json<MovieReview>> {
    let rating = request.validate()?;
    let review = MovieReview::new(movie_id, rating, request.review_text);
    Ok(Json(state.store.add_review(review)))
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        loading: state.store.is_loading(),
        error: state.store.last_error(),
    })
}

pub async fn clear_error(State(state): State<AppState>) -> StatusCode {
    state.store.clear_error();
    StatusCode::NO_CONTENT
}
