//! In-memory Hajj/Umrah knowledge base
//!
//! The corpus is loaded once at startup and read-only afterwards. Handlers
//! share it through an `Arc`, so retrieval stays lock-free.

use std::collections::HashSet;
use std::path::Path;

use crate::errors::HajjRagError;
use crate::models::KnowledgeItem;
use crate::Result;

/// The builtin corpus, exported from the production knowledge table.
const BUILTIN_CORPUS: &str = include_str!("hajj_corpus.json");

/// Ordered, immutable collection of knowledge items.
///
/// Item order is load order and is observable: the ranker keeps it for
/// equal-score results.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    items: Vec<KnowledgeItem>,
}

impl KnowledgeBase {
    /// Build a knowledge base from explicit items.
    ///
    /// Rejects duplicate ids; every other invariant (lowercase keywords,
    /// non-empty content) is the corpus author's responsibility.
    pub fn new(items: Vec<KnowledgeItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(HajjRagError::DuplicateKnowledgeId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Load the builtin Hajj corpus shipped with the binary
    pub fn builtin() -> Result<Self> {
        let items: Vec<KnowledgeItem> = serde_json::from_str(BUILTIN_CORPUS)?;
        Self::new(items)
    }

    /// Load a corpus from a JSON file (array of knowledge items)
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let items: Vec<KnowledgeItem> = serde_json::from_str(&content)?;
        Self::new(items)
    }

    /// All items in corpus order
    pub fn items(&self) -> &[KnowledgeItem] {
        &self.items
    }

    /// Look up a single item by id
    pub fn get(&self, id: &str) -> Option<&KnowledgeItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::io::Write;

    fn sample_item(id: &str) -> KnowledgeItem {
        KnowledgeItem {
            id: id.to_string(),
            title: format!("Item {id}"),
            content: "Some content.".to_string(),
            category: "rituals".to_string(),
            keywords: vec!["sample".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_builtin_corpus_loads() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert_eq!(kb.len(), 5);
        assert_eq!(kb.items()[0].title, "Tawaf Ritual");
        assert_eq!(kb.items()[4].category, "rules");
    }

    #[test]
    fn test_builtin_corpus_keywords_are_lowercase() {
        let kb = KnowledgeBase::builtin().unwrap();
        for item in kb.items() {
            assert!(!item.keywords.is_empty(), "item {} has no keywords", item.id);
            for keyword in &item.keywords {
                assert_eq!(keyword, &keyword.to_lowercase());
            }
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let items = vec![sample_item("a"), sample_item("b"), sample_item("a")];
        let err = KnowledgeBase::new(items).unwrap_err();
        assert!(matches!(err, HajjRagError::DuplicateKnowledgeId(id) if id == "a"));
    }

    #[test]
    fn test_get_by_id() {
        let kb = KnowledgeBase::new(vec![sample_item("a"), sample_item("b")]).unwrap();
        assert_eq!(kb.get("b").map(|i| i.title.as_str()), Some("Item b"));
        assert!(kb.get("missing").is_none());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let items = vec![sample_item("x"), sample_item("y")];
        write!(file, "{}", serde_json::to_string(&items).unwrap()).unwrap();

        let kb = KnowledgeBase::from_json_file(file.path()).unwrap();
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.items()[0].id, "x");
    }
}
