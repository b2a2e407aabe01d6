//! Complete retrieval pipeline: retrieve -> rank -> assemble

use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::config::BackendKind;
use crate::database::Database;
use crate::knowledge::KnowledgeBase;
use crate::models::KnowledgeItem;
use crate::rag::ContextAssembler;
use crate::rag::RetrievalBackend;
use crate::rag::retriever::Retriever;
use crate::Result;

/// Query-to-context retrieval service.
///
/// One instance serves the whole process; all state is read-only after
/// construction.
#[derive(Debug, Clone)]
pub struct RagService {
    retriever: Retriever,
    assembler: ContextAssembler,
}

impl RagService {
    /// Create a service over an explicit backend
    pub fn new(backend: RetrievalBackend, config: &AppConfig) -> Self {
        Self {
            retriever: Retriever::new(backend, &config.retrieval),
            assembler: ContextAssembler::new(),
        }
    }

    /// Create a service over an in-memory corpus
    pub fn local(corpus: Arc<KnowledgeBase>, config: &AppConfig) -> Self {
        Self::new(RetrievalBackend::Local(corpus), config)
    }

    /// Create a service over a connected database
    pub fn datastore(database: Database, config: &AppConfig) -> Self {
        Self::new(RetrievalBackend::Datastore(database), config)
    }

    /// Build the backend selected by configuration.
    ///
    /// # Errors
    /// - Corpus file errors (missing file, malformed JSON, duplicate ids)
    /// - Database connection errors for the datastore backend
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let backend = match config.retrieval.backend {
            BackendKind::Local => {
                let corpus = match config.corpus_path() {
                    Some(path) => {
                        info!("Loading knowledge corpus from {path}");
                        KnowledgeBase::from_json_file(path)?
                    }
                    None => KnowledgeBase::builtin()?,
                };
                info!("Knowledge base ready: {} items", corpus.len());
                RetrievalBackend::Local(Arc::new(corpus))
            }
            BackendKind::Datastore => {
                let database = Database::from_config(config).await?;
                RetrievalBackend::Datastore(database)
            }
        };

        Ok(Self::new(backend, config))
    }

    /// Retrieve and format context for a query.
    ///
    /// Always returns a usable string: matched items render as heading
    /// blocks, no match renders the fixed sentinel, and a failed datastore
    /// lookup is logged and degrades to the no-match path rather than
    /// propagating. The enclosing chat flow must still reach the model
    /// gateway when retrieval breaks.
    pub async fn retrieve_context(&self, query: &str) -> String {
        debug!("Retrieving context for query: {query}");

        let items = match self.retriever.search(query).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Knowledge retrieval failed, continuing without context: {e}");
                Vec::new()
            }
        };

        debug!("Retrieved {} items", items.len());
        self.assembler.assemble(&items)
    }

    /// Render the knowledge block appended to the chat system prompt.
    ///
    /// `None` when nothing matched or retrieval degraded; absence of
    /// enrichment is not an error state.
    pub async fn prompt_enrichment(&self, query: &str) -> Option<String> {
        let items = match self.retriever.retrieve_for_enrichment(query).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Knowledge retrieval failed, continuing without enrichment: {e}");
                Vec::new()
            }
        };

        if !items.is_empty() {
            info!("Found {} relevant documents", items.len());
        }
        self.assembler.assemble_enrichment(&items)
    }

    /// Raw search, as served by the search endpoint.
    ///
    /// Unlike [`Self::retrieve_context`] this propagates datastore
    /// failures; the endpoint layer turns them into a 500.
    pub async fn search(&self, query: &str) -> Result<Vec<KnowledgeItem>> {
        self.retriever.search(query).await
    }

    /// Everything the backend can serve, for corpus inspection
    pub async fn list_knowledge(&self) -> Result<Vec<KnowledgeItem>> {
        self.retriever.list_all().await
    }

    /// Get retriever reference
    #[must_use]
    pub const fn retriever(&self) -> &Retriever {
        &self.retriever
    }
}
