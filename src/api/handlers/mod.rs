/// API request handlers
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::types::ErrorResponse;
use crate::api::types::HealthResponse;
use crate::api::types::SearchResponse;
use crate::llm::GatewayClient;
use crate::rag::RagService;

// Re-export sub-modules
pub mod chat;
pub mod search;

// Re-export handlers
pub use chat::*;
pub use search::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rag: Arc<RagService>,
    pub gateway: Arc<GatewayClient>,
}

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// List the full knowledge base (GET /api/knowledge)
pub async fn list_knowledge(
    State(state): State<AppState>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!("GET /api/knowledge");

    match state.rag.list_knowledge().await {
        Ok(results) => Ok(Json(SearchResponse { results })),
        Err(e) => {
            error!("Failed to list knowledge base: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to list knowledge base")),
            ))
        }
    }
}
