//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::models::ChatMessage;
use crate::models::KnowledgeItem;

/// Body for `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Result list returned by `POST /api/search` and `GET /api/knowledge`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<KnowledgeItem>,
}

/// Error payload, always `{"error": "..."}` on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let err = ErrorResponse::new("Query is required");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Query is required"}));
    }

    #[test]
    fn test_chat_request_parses_messages() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"messages": [{"role": "user", "content": "What is Tawaf?"}]}"#,
        )
        .unwrap();
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].content, "What is Tawaf?");
    }
}
