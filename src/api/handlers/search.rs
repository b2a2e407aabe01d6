//! Knowledge search handler

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::ErrorResponse;
use crate::api::types::SearchResponse;

const QUERY_REQUIRED: &str = "Query is required";
const SEARCH_FAILED: &str = "Failed to search knowledge base";

/// Search the knowledge base (POST /api/search)
///
/// The body is inspected by hand rather than deserialized into a typed
/// request: a missing, non-string, or empty `query` must answer 400
/// with `{"error": "Query is required"}` before any retrieval runs.
pub async fn search_knowledge(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let query = match body.get("query").and_then(|q| q.as_str()) {
        Some(query) if !query.is_empty() => query,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(QUERY_REQUIRED)),
            ));
        }
    };

    info!("POST /api/search: \"{}\"", query);

    match state.rag.search(query).await {
        Ok(results) => {
            info!("Search returned {} results", results.len());
            Ok(Json(SearchResponse { results }))
        }
        Err(e) => {
            error!("Knowledge search failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(SEARCH_FAILED)),
            ))
        }
    }
}
