use std::time::Duration;

use crate::core::config::IntentConfig;
use crate::llm::{ChatClient, ChatMessage};

const CLASSIFY_PROMPT: &str = "Classify this user message as either 'PRODUCT_QUERY' or \
    'GENERAL_QUERY'. PRODUCT_QUERY means they want to find/buy products. GENERAL_QUERY means \
    greetings, questions about you, or general chat. Reply with only one word: PRODUCT_QUERY \
    or GENERAL_QUERY";

const CLASSIFY_MAX_TOKENS: u32 = 10;
const CLASSIFY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Product,
    General,
}

pub struct IntentClassifier {
    llm: ChatClient,
    greetings: Vec<String>,
    general_questions: Vec<String>,
}

impl IntentClassifier {
    pub fn new(llm: ChatClient, config: &IntentConfig) -> Self {
        Self {
            llm,
            greetings: config.greetings.clone(),
            general_questions: config.general_questions.clone(),
        }
    }

    /// Exact-match lexical fast path: greetings and questions about the
    /// assistant are answered without touching the remote classifier.
    pub fn shortcut(&self, query: &str) -> bool {
        let normalized = query.trim().to_lowercase();
        self.greetings.iter().any(|g| *g == normalized)
            || self.general_questions.iter().any(|q| *q == normalized)
    }

    /// Remote classification with a one-word label; any failure defaults to
    /// `Product` so the query still gets a search attempt.
    pub async fn classify(&self, query: &str) -> Intent {
        let messages = [
            ChatMessage::system(CLASSIFY_PROMPT),
            ChatMessage::user(query),
        ];

        match self
            .llm
            .complete(&messages, CLASSIFY_MAX_TOKENS, CLASSIFY_TIMEOUT)
            .await
        {
            Ok(label) if label.to_uppercase().contains("GENERAL") => Intent::General,
            Ok(_) => Intent::Product,
            Err(err) => {
                tracing::warn!("Intent classification failed, assuming product query: {}", err);
                Intent::Product
            }
        }
    }
}
