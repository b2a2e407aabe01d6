use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One entry of the Hajj/Umrah knowledge base.
///
/// The same shape serves the in-memory corpus, the PostgreSQL
/// `hajj_knowledge` table and the JSON API responses. JSON field names
/// follow the public API (`createdAt`), column names stay snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct KnowledgeItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    /// Lowercase search terms; matched per term by the lexical scorer
    pub keywords: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Role of a chat message at the gateway boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
