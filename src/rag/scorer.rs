//! Keyword-overlap relevance scoring
//!
//! A deliberately simple, explainable heuristic: no embeddings, no learned
//! weights. An item is relevant when the user's question literally contains
//! its search vocabulary. Scoring is a full scan, O(corpus size × query
//! length) per query; fine at this corpus scale, an inverted keyword index
//! would be needed well before the corpus grows past a few hundred entries.

use crate::config::RetrievalConfig;
use crate::models::KnowledgeItem;

/// Contribution weights for the lexical score.
///
/// The exact values are tuning constants; only their relative order
/// (keyword >= title > content) is intentional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Added once per keyword term the query contains
    pub keyword: u32,
    /// Added when the query contains the whole title
    pub title: u32,
    /// Added when the query contains the whole content
    pub content: u32,
}

impl ScoringWeights {
    pub const fn new(keyword: u32, title: u32, content: u32) -> Self {
        Self {
            keyword,
            title,
            content,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::new(2, 2, 1)
    }
}

impl From<&RetrievalConfig> for ScoringWeights {
    fn from(config: &RetrievalConfig) -> Self {
        Self::new(
            config.keyword_weight,
            config.title_weight,
            config.content_weight,
        )
    }
}

/// Pure relevance scorer: `(query, item) -> u32`.
///
/// Case-insensitive throughout. Deterministic and stateless, safe to call
/// concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer {
    weights: ScoringWeights,
}

impl LexicalScorer {
    pub const fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Score one item against a query.
    ///
    /// Each keyword term contributes once, whether the query contains it
    /// once or ten times. Title and content contribute flat bonuses when
    /// the query contains them whole.
    pub fn score(&self, query: &str, item: &KnowledgeItem) -> u32 {
        let query = query.to_lowercase();
        let mut score = 0;

        for keyword in &item.keywords {
            if query_contains(&query, &keyword.to_lowercase()) {
                score += self.weights.keyword;
            }
        }

        if query_contains(&query, &item.title.to_lowercase()) {
            score += self.weights.title;
        }
        if query_contains(&query, &item.content.to_lowercase()) {
            score += self.weights.content;
        }

        score
    }
}

// Empty needles never match, so an empty query scores 0 everywhere even
// for a corpus entry with an empty keyword slot.
fn query_contains(query: &str, needle: &str) -> bool {
    !needle.is_empty() && query.contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tawaf_item() -> KnowledgeItem {
        KnowledgeItem {
            id: "tawaf".to_string(),
            title: "Tawaf Ritual".to_string(),
            content: "Tawaf is the act of circumambulating the Kaaba seven times.".to_string(),
            category: "rituals".to_string(),
            keywords: vec![
                "tawaf".to_string(),
                "kaaba".to_string(),
                "seven circuits".to_string(),
            ],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_keyword_match_scores_two_per_term() {
        let scorer = LexicalScorer::default();
        let item = tawaf_item();

        assert_eq!(scorer.score("what is tawaf?", &item), 2);
        assert_eq!(scorer.score("tawaf around the kaaba", &item), 4);
    }

    #[test]
    fn test_keyword_counts_once_regardless_of_occurrences() {
        let scorer = LexicalScorer::default();
        let item = tawaf_item();

        assert_eq!(scorer.score("tawaf tawaf tawaf", &item), 2);
    }

    #[test]
    fn test_title_containment_adds_flat_bonus() {
        let scorer = LexicalScorer::default();
        let item = tawaf_item();

        // "tawaf ritual" carries the keyword (2) plus the whole title (2)
        assert_eq!(scorer.score("explain the tawaf ritual to me", &item), 4);
    }

    #[test]
    fn test_content_containment_adds_one() {
        let scorer = LexicalScorer::default();
        let mut item = tawaf_item();
        item.keywords.clear();
        item.title = "Short".to_string();
        item.content = "seven times".to_string();

        assert_eq!(scorer.score("walk seven times around", &item), 1);
    }

    #[test]
    fn test_case_insensitive() {
        let scorer = LexicalScorer::default();
        let item = tawaf_item();

        assert_eq!(scorer.score("WHAT IS TAWAF?", &item), 2);
    }

    #[test]
    fn test_empty_query_scores_zero() {
        let scorer = LexicalScorer::default();
        let item = tawaf_item();

        assert_eq!(scorer.score("", &item), 0);
    }

    #[test]
    fn test_empty_needles_never_match() {
        let scorer = LexicalScorer::default();
        let mut item = tawaf_item();
        item.keywords = vec![String::new()];
        item.title = String::new();
        item.content = String::new();

        assert_eq!(scorer.score("", &item), 0);
        assert_eq!(scorer.score("anything at all", &item), 0);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let scorer = LexicalScorer::default();
        let item = tawaf_item();

        assert_eq!(scorer.score("xyzzy_unrelated_term", &item), 0);
    }

    #[test]
    fn test_custom_weights() {
        let scorer = LexicalScorer::new(ScoringWeights::new(5, 3, 2));
        let item = tawaf_item();

        assert_eq!(scorer.score("tawaf", &item), 5);
        assert_eq!(scorer.score("the tawaf ritual", &item), 8);
    }

    #[test]
    fn test_determinism() {
        let scorer = LexicalScorer::default();
        let item = tawaf_item();

        let first = scorer.score("tawaf at the kaaba", &item);
        let second = scorer.score("tawaf at the kaaba", &item);
        assert_eq!(first, second);
    }
}
