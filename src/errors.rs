use thiserror::Error;

#[derive(Error, Debug)]
pub enum HajjRagError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate knowledge id: {0}")]
    DuplicateKnowledgeId(String),

    #[error("Rate limits exceeded")]
    RateLimited,

    #[error("Payment required")]
    QuotaExhausted,

    #[error("AI gateway error: status {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HajjRagError>;
