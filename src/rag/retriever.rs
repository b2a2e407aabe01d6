//! Retrieval backends
//!
//! Two interchangeable ways to fetch candidate knowledge items for a
//! query: the in-memory corpus scored by the lexical heuristic, and a
//! PostgreSQL token filter. Both sit behind [`Retriever`]; deployment
//! config decides which one runs.

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::database::Database;
use crate::knowledge::KnowledgeBase;
use crate::models::KnowledgeItem;
use crate::rag::LexicalScorer;
use crate::rag::Ranker;
use crate::rag::ScoringWeights;
use crate::Result;

/// The chat enrichment path only submits the first few query tokens to
/// the datastore; long questions otherwise balloon the filter clause.
const ENRICHMENT_TOKEN_CAP: usize = 5;

/// Split a query into lowercase search tokens.
///
/// Words must be strictly longer than `min_len` characters; short filler
/// words ("the", "is", "how") never reach the datastore filter.
pub fn tokenize_query(query: &str, min_len: usize) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > min_len)
        .map(ToString::to_string)
        .collect()
}

/// Where candidate items come from.
#[derive(Debug, Clone)]
pub enum RetrievalBackend {
    /// Score the shared in-memory corpus
    Local(Arc<KnowledgeBase>),
    /// Filter rows in PostgreSQL, storage order, no scoring
    Datastore(Database),
}

/// Backend-dispatching retrieval front end.
#[derive(Debug, Clone)]
pub struct Retriever {
    backend: RetrievalBackend,
    ranker: Ranker,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(backend: RetrievalBackend, config: &RetrievalConfig) -> Self {
        let scorer = LexicalScorer::new(ScoringWeights::from(config));
        Self {
            backend,
            ranker: Ranker::new(scorer),
            config: config.clone(),
        }
    }

    /// Full search, as served by the search endpoint.
    ///
    /// Local backend: ranked by relevance, capped at the retrieval limit.
    /// Datastore backend: any matching rows in storage order, capped at
    /// the datastore row limit.
    pub async fn search(&self, query: &str) -> Result<Vec<KnowledgeItem>> {
        match &self.backend {
            RetrievalBackend::Local(corpus) => Ok(self
                .ranker
                .rank(query, corpus.items(), self.config.limit)
                .into_iter()
                .map(|scored| scored.item)
                .collect()),
            RetrievalBackend::Datastore(database) => {
                let tokens = tokenize_query(query, self.config.min_token_len);
                database
                    .search_knowledge(&tokens, self.config.datastore_limit)
                    .await
            }
        }
    }

    /// Capped retrieval feeding the chat prompt enrichment.
    ///
    /// Both backends cap results at the retrieval limit here; the
    /// datastore additionally caps the token list.
    pub async fn retrieve_for_enrichment(&self, query: &str) -> Result<Vec<KnowledgeItem>> {
        match &self.backend {
            RetrievalBackend::Local(corpus) => Ok(self
                .ranker
                .rank(query, corpus.items(), self.config.limit)
                .into_iter()
                .map(|scored| scored.item)
                .collect()),
            RetrievalBackend::Datastore(database) => {
                let mut tokens = tokenize_query(query, self.config.min_token_len);
                tokens.truncate(ENRICHMENT_TOKEN_CAP);
                database.search_knowledge(&tokens, self.config.limit).await
            }
        }
    }

    /// All items the backend can serve, for corpus inspection
    pub async fn list_all(&self) -> Result<Vec<KnowledgeItem>> {
        match &self.backend {
            RetrievalBackend::Local(corpus) => Ok(corpus.items().to_vec()),
            RetrievalBackend::Datastore(database) => database.list_knowledge().await,
        }
    }

    #[must_use]
    pub const fn backend(&self) -> &RetrievalBackend {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_short_words() {
        let tokens = tokenize_query("What is the Tawaf ritual", 3);
        assert_eq!(tokens, vec!["what", "tawaf", "ritual"]);
    }

    #[test]
    fn test_tokenize_lowercases() {
        let tokens = tokenize_query("IHRAM Requirements", 3);
        assert_eq!(tokens, vec!["ihram", "requirements"]);
    }

    #[test]
    fn test_tokenize_empty_and_whitespace() {
        assert!(tokenize_query("", 3).is_empty());
        assert!(tokenize_query("   \t  ", 3).is_empty());
    }

    #[test]
    fn test_tokenize_all_short_words() {
        assert!(tokenize_query("is it ok to go", 3).is_empty());
    }

    #[test]
    fn test_tokenize_length_boundary_is_strict() {
        // exactly min_len characters is dropped, min_len + 1 is kept
        let tokens = tokenize_query("hajj day", 3);
        assert_eq!(tokens, vec!["hajj"]);
    }

    #[test]
    fn test_tokenize_counts_characters_not_bytes() {
        let tokens = tokenize_query("مناسك الحج", 3);
        assert_eq!(tokens, vec!["مناسك", "الحج"]);
    }
}
