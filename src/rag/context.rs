//! Context assembly from retrieved knowledge items

use crate::models::KnowledgeItem;

/// Sentinel returned when nothing in the corpus matched the query.
///
/// A normal no-match outcome, not a failure; callers must not treat it as
/// an error.
pub const NO_MATCH_MESSAGE: &str = "No relevant knowledge found in the local Hajj database.";

/// Renders retrieved items into prompt-ready text blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    pub const fn new() -> Self {
        Self
    }

    /// Assemble the retrieval context string.
    ///
    /// Each item renders as a `###` heading with its content below; blocks
    /// are joined by blank lines. An empty input yields the fixed no-match
    /// sentinel.
    pub fn assemble(&self, items: &[KnowledgeItem]) -> String {
        if items.is_empty() {
            return NO_MATCH_MESSAGE.to_string();
        }

        let blocks: Vec<String> = items
            .iter()
            .map(|item| format!("### {}\n{}", item.title, item.content))
            .collect();

        format!("Using the retrieved knowledge:\n\n{}", blocks.join("\n\n"))
    }

    /// Assemble the knowledge block appended to the chat system prompt.
    ///
    /// `None` when nothing matched; the chat flow then sends the system
    /// prompt unmodified instead of advertising an empty knowledge section.
    pub fn assemble_enrichment(&self, items: &[KnowledgeItem]) -> Option<String> {
        if items.is_empty() {
            return None;
        }

        let entries: Vec<String> = items
            .iter()
            .map(|item| format!("\n### {} ({})\n{}", item.title, item.category, item.content))
            .collect();

        Some(format!(
            "\n\n**Relevant Knowledge Base Information:**\n{}",
            entries.join("\n")
        ))
    }
}
