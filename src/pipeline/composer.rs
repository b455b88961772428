use std::time::Duration;

use crate::catalog::{CatalogItem, RetrievalCandidate};
use crate::llm::{ChatClient, ChatMessage};

pub const NO_MATCH_REPLY: &str = "I'm sorry, we currently don't have that product in our \
    store. Can I help you find something else?";

const GENERATION_FALLBACK_REPLY: &str = "Here are the products I found for you.";

const GROUNDING_PROMPT: &str = "You are 'NeuSearch', a professional, concise, and smart \
    Shopping Assistant for an e-commerce store.\n\n\
    Your behavior must follow these strict rules:\n\n\
    1. SEARCH & CONTEXT:\n\
    - You will be provided with a 'Context' containing product details from our database.\n\
    - ONLY recommend products that are present in the provided Context.\n\
    - IF the user asks for a specific category and the Context contains irrelevant items, \
    IGNORE the irrelevant items.\n\
    - IF the Context is empty or none of the products match the user's request, strictly \
    say: 'I'm sorry, we currently don't have that product in our store. Can I help you find \
    something else?'\n\n\
    2. NO HALLUCINATION:\n\
    - Never invent products, prices, or features that are not in the Context.\n\
    - If you are unsure, admit it.\n\n\
    3. RESPONSE STYLE:\n\
    - Keep answers short and scannable.\n\
    - Use bullet points for product features.\n\
    - Always mention the Price if available.";

const GENERATE_MAX_TOKENS: u32 = 500;
const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ResponseComposer {
    llm: ChatClient,
}

impl ResponseComposer {
    pub fn new(llm: ChatClient) -> Self {
        Self { llm }
    }

    /// Phrase the final answer from validated candidates.
    ///
    /// Empty input short-circuits to the fixed refusal without any remote
    /// call. A generation failure falls back to a generic acknowledgement
    /// but keeps the retrieved items: retrieval success is never discarded
    /// by a downstream failure.
    pub async fn compose(
        &self,
        query: &str,
        candidates: &[RetrievalCandidate],
    ) -> (String, Vec<CatalogItem>) {
        if candidates.is_empty() {
            return (NO_MATCH_REPLY.to_string(), Vec::new());
        }

        let context = build_context(candidates);
        let items = dedupe_items(candidates);

        let messages = [
            ChatMessage::system(GROUNDING_PROMPT),
            ChatMessage::user(format!("User Query: {query}\n\nContext: {context}")),
        ];

        match self
            .llm
            .complete(&messages, GENERATE_MAX_TOKENS, GENERATE_TIMEOUT)
            .await
        {
            Ok(text) if !text.is_empty() => (text, items),
            Ok(_) => (GENERATION_FALLBACK_REPLY.to_string(), items),
            Err(err) => {
                tracing::warn!("Response generation failed, using fallback text: {}", err);
                (GENERATION_FALLBACK_REPLY.to_string(), items)
            }
        }
    }
}

/// One context line per candidate occurrence; an item retrieved through
/// several chunks appears once per chunk.
fn build_context(candidates: &[RetrievalCandidate]) -> String {
    candidates
        .iter()
        .map(|c| format!("- {} (${}) - {}", c.item.name, c.item.price, c.item.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Unique items by id, first-seen order preserved.
fn dedupe_items(candidates: &[RetrievalCandidate]) -> Vec<CatalogItem> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .iter()
        .filter(|c| seen.insert(c.item.id))
        .map(|c| c.item.clone())
        .collect()
}
