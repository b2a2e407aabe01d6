//! AI gateway client
//!
//! OpenAI-style chat-completions over HTTP. Status mapping happens here,
//! before any body is consumed: 429 and 402 become their own error
//! variants so the API layer can answer with distinct user messages.

use tracing::error;

use crate::config::AppConfig;
use crate::errors::HajjRagError;
use crate::models::ChatMessage;
use crate::Result;

const NO_RESPONSE_FALLBACK: &str = "No response from LLM.";

/// Client for the hosted LLM gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
}

impl GatewayClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
        }
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    /// - Missing API key (neither `[llm] api_key` nor the
    ///   `AI_GATEWAY_API_KEY` environment variable is set)
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config.llm_api_key().ok_or_else(|| {
            HajjRagError::Config(
                "AI gateway API key is not configured (set [llm] api_key or AI_GATEWAY_API_KEY)"
                    .to_string(),
            )
        })?;

        let mut client = Self::new(config.llm_endpoint(), api_key, config.llm_model());
        client.temperature = config.llm.temperature;
        Ok(client)
    }

    /// Request a complete (non-streaming) chat completion.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages, false))
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let body: serde_json::Value = response.json().await?;

        Ok(content_from_body(&body))
    }

    /// Start a streaming chat completion.
    ///
    /// Returns the live gateway response after the status check, so the
    /// caller can forward the SSE body chunk by chunk. Dropping the
    /// response releases the upstream connection.
    pub async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages, true))
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Model identifier requests are sent with
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, messages: &[ChatMessage], stream: bool) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": stream,
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        body
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                error!("Rate limit exceeded");
                Err(HajjRagError::RateLimited)
            }
            reqwest::StatusCode::PAYMENT_REQUIRED => {
                error!("Payment required");
                Err(HajjRagError::QuotaExhausted)
            }
            status => {
                // Body text goes to the log only, never to users
                let message = response.text().await.unwrap_or_default();
                error!("AI gateway error: {} {}", status, message);
                Err(HajjRagError::Gateway {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Pull the assistant text out of a non-streaming completion body. A body
/// with no usable `choices[0].message.content` answers with a visible
/// fallback message rather than an empty string.
fn content_from_body(body: &serde_json::Value) -> String {
    body.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .filter(|content| !content.is_empty())
        .unwrap_or(NO_RESPONSE_FALLBACK)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let client = GatewayClient::new("http://localhost/v1/chat/completions", "key", "test-model");
        let messages = vec![ChatMessage::user("What is tawaf?")];

        let body = client.request_body(&messages, true);
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "What is tawaf?");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_request_body_includes_temperature_when_set() {
        let mut client = GatewayClient::new("http://localhost", "key", "test-model");
        client.temperature = Some(0.2);

        let body = client.request_body(&[], false);
        assert_eq!(body["stream"], false);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_content_extracted_from_completion_body() {
        let body = serde_json::json!({
            "choices": [{"message": {"content": "Seven circuits."}}]
        });
        assert_eq!(content_from_body(&body), "Seven circuits.");
    }

    #[test]
    fn test_missing_content_yields_fallback_message() {
        assert_eq!(
            content_from_body(&serde_json::json!({"choices": []})),
            "No response from LLM."
        );
        assert_eq!(
            content_from_body(&serde_json::json!({"choices": [{"message": {"content": ""}}]})),
            "No response from LLM."
        );
    }
}
