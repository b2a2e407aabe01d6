//! Prompt construction for the Hajj assistant

/// System prompt sent with every chat conversation.
pub const HAJJ_SYSTEM_PROMPT: &str = r"You are an AI assistant specializing in Hajj and Umrah guidance with access to a knowledge base. Your role is to help pilgrims navigate their spiritual journey with accurate, compassionate, and practical advice.

Core Responsibilities:
- Provide accurate information about Hajj and Umrah rituals, steps, and requirements
- Offer practical guidance on logistics, preparation, and common challenges
- Answer questions about Islamic practices related to pilgrimage
- Give respectful spiritual guidance while maintaining Islamic authenticity
- Help with planning, packing lists, health precautions, and travel tips
- When relevant knowledge base information is provided, use it to enhance your responses
- Cite the knowledge base when using specific information from it

Guidelines:
- Always be respectful and compassionate
- Base answers on authentic Islamic sources and the provided knowledge base
- Provide practical, actionable advice
- If unsure about religious rulings, recommend consulting with a local scholar
- Keep responses clear, concise, and helpful
- Use simple language that pilgrims can easily understand
- When knowledge base context is available, integrate it naturally into your response

Remember: You're helping people prepare for one of the most important spiritual journeys of their lives. Be supportive, informative, and encouraging.";

/// Compose the chat system prompt, appending the retrieved knowledge
/// block when there is one.
pub fn build_system_prompt(enrichment: Option<&str>) -> String {
    match enrichment {
        Some(block) => format!("{HAJJ_SYSTEM_PROMPT}{block}"),
        None => HAJJ_SYSTEM_PROMPT.to_string(),
    }
}

/// Prompt for the one-shot CLI ask flow.
///
/// `context` is the output of the retrieval pipeline, including the
/// no-match sentinel when nothing was found; the model is told to fall
/// back to general guidance in that case.
pub fn build_ask_prompt(question: &str, context: &str) -> String {
    format!(
        r"You are an expert assistant helping pilgrims prepare for Hajj and Umrah.

{context}

Question: {question}

Instructions:
1. Answer based on the retrieved knowledge above when it is relevant
2. If the knowledge does not cover the question, say so and answer from general pilgrimage guidance
3. Recommend consulting a local scholar for religious rulings you are unsure about
4. Be concise, practical and respectful

Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_without_enrichment_is_unchanged() {
        assert_eq!(build_system_prompt(None), HAJJ_SYSTEM_PROMPT);
    }

    #[test]
    fn test_system_prompt_appends_enrichment_verbatim() {
        let block = "\n\n**Relevant Knowledge Base Information:**\n\n### Tawaf Ritual (rituals)\nCircle the Kaaba.";
        let prompt = build_system_prompt(Some(block));

        assert!(prompt.starts_with(HAJJ_SYSTEM_PROMPT));
        assert!(prompt.ends_with(block));
        assert_eq!(prompt.len(), HAJJ_SYSTEM_PROMPT.len() + block.len());
    }

    #[test]
    fn test_ask_prompt_embeds_question_and_context() {
        let prompt = build_ask_prompt("What is tawaf?", "Using the retrieved knowledge:\n\n### Tawaf Ritual\nCircle the Kaaba.");

        assert!(prompt.contains("Question: What is tawaf?"));
        assert!(prompt.contains("### Tawaf Ritual"));
    }
}
