//! RAG (Retrieval-Augmented Generation) module
//!
//! End-to-end retrieval for the Hajj/Umrah assistant:
//! - Keyword-overlap relevance scoring over the in-memory corpus
//! - Ranking (filter, stable sort, truncate)
//! - Context assembly into prompt-ready text
//! - An alternate PostgreSQL-backed retrieval backend
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use hajjrag::config::AppConfig;
//! use hajjrag::knowledge::KnowledgeBase;
//! use hajjrag::rag::RagService;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let corpus = Arc::new(KnowledgeBase::builtin()?);
//!     let service = RagService::local(corpus, &config);
//!
//!     let context = futures::executor::block_on(service.retrieve_context("What is tawaf?"));
//!     println!("{context}");
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;
pub mod ranker;
pub mod retriever;
pub mod scorer;

pub use context::ContextAssembler;
pub use context::NO_MATCH_MESSAGE;
pub use pipeline::RagService;
pub use ranker::Ranker;
pub use retriever::RetrievalBackend;
pub use retriever::tokenize_query;
pub use scorer::LexicalScorer;
pub use scorer::ScoringWeights;

use crate::models::KnowledgeItem;

/// A knowledge item paired with its relevance score for one query.
///
/// Ephemeral: recomputed per query, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub item: KnowledgeItem,
    pub score: u32,
}
