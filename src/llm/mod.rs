//! LLM gateway integration
//!
//! Speaks the OpenAI-style chat-completions protocol of the hosted AI
//! gateway, both streaming (chat endpoint pass-through) and non-streaming
//! (CLI ask flow), plus the zero-shot intent classifier.

pub mod gateway;
pub mod intent;
pub mod prompts;
pub mod streaming;

pub use gateway::GatewayClient;
pub use intent::Classification;
pub use intent::IntentClassifier;
pub use streaming::StreamingResponse;
