use axum::{
    middleware,
    routing::{delete, get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{propagate_request_id, span_for_request};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Films
        .route("/films/popular", get(handlers::popular_films))
        .route("/films/:id", get(handlers::film_by_id))
        .route("/films/:id/like/:user_id", put(handlers::like_film))
        .route("/films/:id/like/:user_id", delete(handlers::unlike_film))
        // Users
        .route(
            "/users/:id/recommendations",
            get(handlers::recommendations),
        )
        .route("/users/:id/feed", get(handlers::user_feed))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(propagate_request_id))
                .layer(TraceLayer::new_for_http().make_span_with(span_for_request))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
