//! Streaming chat handler with knowledge enrichment

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tracing::error;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::api::types::ChatRequest;
use crate::api::types::ErrorResponse;
use crate::errors::HajjRagError;
use crate::llm::prompts;
use crate::models::ChatMessage;
use crate::models::ChatRole;

const RATE_LIMITED: &str = "Rate limits exceeded, please try again later.";
const QUOTA_EXHAUSTED: &str = "Payment required, please add credits to your AI gateway workspace.";
const GATEWAY_ERROR: &str = "AI gateway error";

/// Streaming chat completion (POST /api/chat)
///
/// Enriches the system prompt with knowledge matched against the last
/// user message, then forwards the gateway's SSE stream verbatim.
pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    let chat_id = Uuid::new_v4();
    info!(
        "POST /api/chat [{}]: {} messages",
        chat_id,
        req.messages.len()
    );

    let enrichment = match last_user_content(&req.messages) {
        Some(content) => state.rag.prompt_enrichment(content).await,
        None => None,
    };
    let system_prompt = prompts::build_system_prompt(enrichment.as_deref());

    let mut messages = Vec::with_capacity(req.messages.len() + 1);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(req.messages);

    match state.gateway.stream_chat(&messages).await {
        Ok(upstream) => {
            info!("Streaming gateway response [{}]", chat_id);
            stream_response(upstream)
        }
        Err(HajjRagError::RateLimited) => {
            error_response(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED)
        }
        Err(HajjRagError::QuotaExhausted) => {
            error_response(StatusCode::PAYMENT_REQUIRED, QUOTA_EXHAUSTED)
        }
        Err(e) => {
            error!("Chat request failed [{}]: {}", chat_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, GATEWAY_ERROR)
        }
    }
}

/// The most recent user turn drives retrieval; assistant and system
/// turns never do.
fn last_user_content(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == ChatRole::User)
        .map(|m| m.content.as_str())
}

/// Forward the upstream body without buffering it.
fn stream_response(upstream: reqwest::Response) -> Response {
    let body = Body::from_stream(upstream.bytes_stream());
    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(body)
    {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to assemble streaming response: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, GATEWAY_ERROR)
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_user_content_picks_latest_user_turn() {
        let messages = vec![
            ChatMessage::user("first question"),
            ChatMessage::assistant("an answer"),
            ChatMessage::user("second question"),
        ];
        assert_eq!(last_user_content(&messages), Some("second question"));
    }

    #[test]
    fn test_last_user_content_ignores_non_user_turns() {
        let messages = vec![
            ChatMessage::system("instructions"),
            ChatMessage::assistant("greeting"),
        ];
        assert_eq!(last_user_content(&messages), None);
    }

    #[test]
    fn test_last_user_content_empty() {
        assert_eq!(last_user_content(&[]), None);
    }
}
