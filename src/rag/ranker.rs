//! Ranking: score all items, drop non-matches, order by relevance

use crate::models::KnowledgeItem;
use crate::rag::LexicalScorer;
use crate::rag::ScoredItem;

/// Orders knowledge items by lexical relevance to a query.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    scorer: LexicalScorer,
}

impl Ranker {
    pub const fn new(scorer: LexicalScorer) -> Self {
        Self { scorer }
    }

    /// Rank items against a query; at most `limit` results.
    ///
    /// Zero-score items are never returned, even when `limit` is not
    /// reached. Ties keep corpus order: `sort_by` is stable and the
    /// comparator looks at the score only. An empty result is a normal
    /// outcome, not an error.
    pub fn rank(&self, query: &str, items: &[KnowledgeItem], limit: usize) -> Vec<ScoredItem> {
        let mut scored: Vec<ScoredItem> = items
            .iter()
            .map(|item| ScoredItem {
                item: item.clone(),
                score: self.scorer.score(query, item),
            })
            .filter(|scored| scored.score > 0)
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit);
        scored
    }
}
