//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Knowledge endpoints
        .route("/knowledge", get(handlers::list_knowledge))
        .route("/search", post(handlers::search_knowledge))
        // Chat endpoint
        .route("/chat", post(handlers::chat))
        .with_state(state)
}
