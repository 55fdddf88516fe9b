use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Provider lookups
        .route("/titles/search", get(handlers::search_titles))
        .route("/titles/latest", get(handlers::latest_titles))
        .route("/titles/:id", get(handlers::get_title))
        // Watchlist
        .route(
            "/watchlist",
            get(handlers::get_watchlist).post(handlers::add_to_watchlist),
        )
        .route(
            "/watchlist/:id",
            get(handlers::watchlist_membership).delete(handlers::remove_from_watchlist),
        )
        // Reviews
        .route("/reviews", get(handlers::get_reviews))
        .route(
            "/reviews/:movie_id",
            get(handlers::get_review).put(handlers::put_review),
        )
        // Loading / last error
        .route("/status", get(handlers::get_status))
        .route("/status/clear-error", post(handlers::clear_error))
}
