use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog and metadata
        .route("/movies/search", get(handlers::search_movies))
        .route("/movies/feed", get(handlers::discovery_feed))
        .route("/movies/:id", get(handlers::movie_details))
        .route("/recommendations", get(handlers::recommendations))
        // Browsing
        .route("/genres", get(handlers::list_genres))
        .route("/genres/:name", get(handlers::browse_genre))
        .route("/actors/search", get(handlers::search_actor))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/:id/browse", post(handlers::browse_session))
        .route("/sessions/:id/select", post(handlers::select_movie))
        .route("/sessions/:id/back", post(handlers::go_back))
}
