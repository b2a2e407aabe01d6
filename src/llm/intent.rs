//! Zero-shot intent classification
//!
//! Classifies pilgrim messages against a fixed label set through the
//! Hugging Face inference API. Classification is advisory: without an API
//! key a deterministic mock distribution is returned, and a failed call
//! falls back to all-zero scores instead of erroring.

use serde::Deserialize;
use serde::Serialize;
use tracing::error;
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::HajjRagError;
use crate::Result;

/// Intent labels the assistant distinguishes.
pub const HAJJ_INTENT_LABELS: [&str; 4] = [
    "ritual_question",
    "rules_violation",
    "logistics",
    "emotional_support",
];

/// One candidate label with its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f64,
}

/// Zero-shot classification outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub sequence: String,
    pub labels: Vec<ScoredLabel>,
}

impl Classification {
    /// Deterministic stand-in when no inference key is configured: the
    /// first candidate dominates, the rest split a small remainder.
    fn mock(text: &str, labels: &[&str]) -> Self {
        let spread_over = labels.len().saturating_sub(1).max(1) as f64;
        Self {
            sequence: text.to_string(),
            labels: labels
                .iter()
                .enumerate()
                .map(|(idx, label)| ScoredLabel {
                    label: (*label).to_string(),
                    score: if idx == 0 { 0.85 } else { 0.15 / spread_over },
                })
                .collect(),
        }
    }

    /// All-zero fallback after a failed inference call
    fn zeroed(text: &str, labels: &[&str]) -> Self {
        Self {
            sequence: text.to_string(),
            labels: labels
                .iter()
                .map(|label| ScoredLabel {
                    label: (*label).to_string(),
                    score: 0.0,
                })
                .collect(),
        }
    }

    /// Highest-scoring label, if any
    #[must_use]
    pub fn top(&self) -> Option<&ScoredLabel> {
        self.labels.iter().max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

#[derive(Debug, Deserialize)]
struct ZeroShotApiResponse {
    sequence: String,
    labels: Vec<String>,
    scores: Vec<f64>,
}

/// Zero-shot classifier over the Hugging Face inference API.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl IntentClassifier {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.intent.endpoint.clone(),
            api_key: config.intent_api_key(),
            model: config.intent.model.clone(),
        }
    }

    /// Classify text against candidate labels.
    ///
    /// Never fails: no key yields the mock distribution, a failed call
    /// yields zero scores.
    pub async fn classify(&self, text: &str, labels: &[&str], multi_label: bool) -> Classification {
        let Some(api_key) = self.api_key.clone() else {
            warn!("No inference API key configured, returning mock classification");
            return Classification::mock(text, labels);
        };

        match self.request(text, labels, multi_label, &api_key).await {
            Ok(classification) => classification,
            Err(e) => {
                error!("Zero-shot classification failed: {e}");
                Classification::zeroed(text, labels)
            }
        }
    }

    /// Classify a pilgrim message into the assistant's intent labels
    pub async fn classify_intent(&self, message: &str) -> Classification {
        self.classify(message, &HAJJ_INTENT_LABELS, true).await
    }

    async fn request(
        &self,
        text: &str,
        labels: &[&str],
        multi_label: bool,
        api_key: &str,
    ) -> Result<Classification> {
        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&serde_json::json!({
                "inputs": text,
                "parameters": {
                    "candidate_labels": labels,
                    "multi_label": multi_label,
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(HajjRagError::Gateway { status, message });
        }

        let body: ZeroShotApiResponse = response.json().await?;
        let labels = body
            .labels
            .into_iter()
            .zip(body.scores)
            .map(|(label, score)| ScoredLabel { label, score })
            .collect();

        Ok(Classification {
            sequence: body.sequence,
            labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_distribution() {
        let classification = Classification::mock("message", &HAJJ_INTENT_LABELS);

        assert_eq!(classification.labels.len(), 4);
        assert!((classification.labels[0].score - 0.85).abs() < 1e-9);
        for scored in &classification.labels[1..] {
            assert!((scored.score - 0.05).abs() < 1e-9);
        }
    }

    #[test]
    fn test_mock_single_label_does_not_divide_by_zero() {
        let classification = Classification::mock("message", &["only"]);
        assert_eq!(classification.labels.len(), 1);
        assert!((classification.labels[0].score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_zeroed_scores() {
        let classification = Classification::zeroed("message", &HAJJ_INTENT_LABELS);
        assert!(classification.labels.iter().all(|l| l.score == 0.0));
    }

    #[test]
    fn test_top_label() {
        let classification = Classification {
            sequence: "q".to_string(),
            labels: vec![
                ScoredLabel {
                    label: "low".to_string(),
                    score: 0.1,
                },
                ScoredLabel {
                    label: "high".to_string(),
                    score: 0.8,
                },
            ],
        };
        assert_eq!(classification.top().map(|l| l.label.as_str()), Some("high"));
    }

    #[tokio::test]
    async fn test_classify_without_key_uses_mock() {
        let classifier = IntentClassifier {
            client: reqwest::Client::new(),
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            api_key: None,
            model: "facebook/bart-large-mnli".to_string(),
        };

        let classification = classifier.classify_intent("What is tawaf?").await;
        assert_eq!(classification.sequence, "What is tawaf?");
        assert_eq!(
            classification.top().map(|l| l.label.as_str()),
            Some("ritual_question")
        );
    }
}
