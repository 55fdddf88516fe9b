//! Watchmode client against a local stand-in for the Watchmode API.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use cinelog::error::FailureKind;
use cinelog::services::{MetadataProvider, WatchmodeProvider};

const API_KEY: &str = "test_key";

async fn spawn_fake_watchmode(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("apiKey").map(String::as_str) == Some(API_KEY)
}

async fn autocomplete(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !authorized(&params) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "success": false })));
    }
    assert_eq!(params.get("search_type").map(String::as_str), Some("2"));
    assert_eq!(params.get("search_value").map(String::as_str), Some("Matrix"));

    (
        StatusCode::OK,
        Json(json!({
            "results": [
                {
                    "name": "The Matrix",
                    "relevance": 200.5,
                    "type": "movie",
                    "id": 1295258,
                    "year": 1999,
                    "result_type": "title",
                    "imdb_id": "tt0133093",
                    "tmdb_id": 603,
                    "tmdb_type": "movie",
                    "image_url": "https://cdn.watchmode.com/posters/01295258_poster_w185.jpg"
                },
                {
                    "name": "The Matrix Reloaded",
                    "relevance": 180.0,
                    "type": "movie",
                    "id": 1295259,
                    "year": 2003,
                    "result_type": "title",
                    "imdb_id": "tt0234215",
                    "tmdb_id": 604,
                    "tmdb_type": "movie",
                    "image_url": "https://cdn.watchmode.com/posters/01295259_poster_w185.jpg"
                }
            ]
        })),
    )
}

async fn releases(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !authorized(&params) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "success": false })));
    }

    (
        StatusCode::OK,
        Json(json!({
            "releases": [
                {
                    "id": 3173903,
                    "title": "Black Widow",
                    "type": "movie",
                    "imdb_id": "tt3480822",
                    "tmdb_id": 497698,
                    "tmdb_type": "movie",
                    "season_number": null,
                    "poster_url": "https://cdn.watchmode.com/posters/03173903_poster_w185.jpg",
                    "source_release_date": "2021-07-04",
                    "source_id": 372,
                    "source_name": "Disney+",
                    "is_original": 0
                },
                {
                    "id": 3180000,
                    "title": "Untitled Pilot",
                    "type": "tv_series",
                    "season_number": 1,
                    "source_id": 203,
                    "source_name": "Netflix",
                    "is_original": 1
                }
            ]
        })),
    )
}

async fn details(Path(id): Path<u64>) -> impl IntoResponse {
    if id != 345534 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "statusCode": 404, "statusMessage": "Title not found" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": 345534,
            "title": "Breaking Bad",
            "type": "tv_series",
            "year": 2008,
            "imdb_id": "tt0903747",
            "tmdb_id": 1396,
            "poster": "https://cdn.watchmode.com/posters/0345534_poster_w342.jpg",
            "genre_names": ["Drama"]
        })),
    )
}

fn fake_watchmode() -> Router {
    Router::new()
        .route("/v1/autocomplete-search/", get(autocomplete))
        .route("/v1/releases/", get(releases))
        .route("/v1/title/:id/details/", get(details))
}

#[tokio::test]
async fn test_search_maps_results() {
    let api_url = spawn_fake_watchmode(fake_watchmode()).await;
    let provider = WatchmodeProvider::new(API_KEY.to_string(), api_url);

    let movies = provider.search("Matrix").await.unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].title, "The Matrix");
    assert_eq!(movies[0].content_type, "movie");
    assert_eq!(movies[0].year, Some(1999));
    assert_eq!(
        movies[0].poster_url.as_deref(),
        Some("https://cdn.watchmode.com/posters/01295258_poster_w185.jpg")
    );
    assert_eq!(movies[1].title, "The Matrix Reloaded");
    assert_eq!(movies[1].year, Some(2003));
    assert_eq!(movies[1].tmdb_id, Some(604));
}

#[tokio::test]
async fn test_latest_derives_year_from_release_date() {
    let api_url = spawn_fake_watchmode(fake_watchmode()).await;
    let provider = WatchmodeProvider::new(API_KEY.to_string(), api_url);

    let movies = provider.fetch_latest().await.unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].title, "Black Widow");
    assert_eq!(movies[0].year, Some(2021));
    assert_eq!(movies[1].year, None);
    assert_eq!(movies[1].content_type, "tv_series");
}

#[tokio::test]
async fn test_details_found_and_missing() {
    let api_url = spawn_fake_watchmode(fake_watchmode()).await;
    let provider = WatchmodeProvider::new(API_KEY.to_string(), api_url);

    let movie = provider.fetch_details(345534).await.unwrap().unwrap();
    assert_eq!(movie.title, "Breaking Bad");
    assert_eq!(movie.year, Some(2008));
    assert_eq!(movie.imdb_id.as_deref(), Some("tt0903747"));

    assert!(provider.fetch_details(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_bad_api_key_is_invalid_request() {
    let api_url = spawn_fake_watchmode(fake_watchmode()).await;
    let provider = WatchmodeProvider::new("wrong".to_string(), api_url);

    let err = provider.fetch_latest().await.unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::InvalidRequest);
}

#[tokio::test]
async fn test_server_error_is_classified() {
    let router = Router::new().route(
        "/v1/releases/",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let api_url = spawn_fake_watchmode(router).await;
    let provider = WatchmodeProvider::new(API_KEY.to_string(), api_url);

    let err = provider.fetch_latest().await.unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::Server);
}

#[tokio::test]
async fn test_malformed_body_is_unexpected() {
    let router = Router::new().route(
        "/v1/releases/",
        get(|| async { (StatusCode::OK, "<html>maintenance</html>") }),
    );
    let api_url = spawn_fake_watchmode(router).await;
    let provider = WatchmodeProvider::new(API_KEY.to_string(), api_url);

    let err = provider.fetch_latest().await.unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::Unexpected);
}
