//! Chat request state machine.
//!
//! A request either takes the greeting shortcut, resolves as general
//! conversation, or runs the full product pipeline: embed, retrieve,
//! validate, compose. Remote failures degrade inside each stage; only
//! store errors bubble out, and the HTTP boundary maps those to a fixed
//! apology so the endpoint always answers.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::composer::ResponseComposer;
use super::guard::KeywordGuard;
use super::intent::{Intent, IntentClassifier};
use super::retriever::VectorRetriever;
use crate::catalog::{CatalogItem, CatalogStore};
use crate::core::config::AppConfig;
use crate::core::errors::ApiError;
use crate::embedding::EmbeddingProvider;
use crate::llm::{ChatClient, ChatMessage};

pub const GREETING_REPLY: &str = "Hello! I'm NeuSearch, your shopping assistant. I help you \
    find the best products using AI search. What are you looking for today?";

pub const EMPTY_CATALOG_REPLY: &str =
    "I'm sorry, we don't have any products in our store right now.";

pub const ERROR_REPLY: &str = "I'm sorry, I encountered an error. Please try again.";

const GENERAL_FALLBACK_REPLY: &str =
    "Hello! I'm NeuSearch. How can I help you find products today?";

const GENERAL_PROMPT: &str = "You are 'NeuSearch', a professional Shopping Assistant. Handle \
    general queries warmly:\n\
    - For greetings: Welcome them and ask how you can help find products\n\
    - For questions about you: Explain you help find products using AI search\n\
    - Keep responses short and friendly";

const GENERAL_MAX_TOKENS: u32 = 150;
const GENERAL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub products: Vec<CatalogItem>,
}

impl ChatReply {
    fn text_only(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            products: Vec::new(),
        }
    }
}

pub struct Assistant {
    store: Arc<dyn CatalogStore>,
    embedder: EmbeddingProvider,
    classifier: IntentClassifier,
    retriever: VectorRetriever,
    guard: KeywordGuard,
    composer: ResponseComposer,
    llm: ChatClient,
}

impl Assistant {
    pub fn new(store: Arc<dyn CatalogStore>, config: &AppConfig) -> Self {
        let llm = ChatClient::new(&config.chat);
        Self {
            embedder: EmbeddingProvider::new(&config.embedding),
            classifier: IntentClassifier::new(llm.clone(), &config.intent),
            retriever: VectorRetriever::new(store.clone(), &config.retrieval),
            guard: KeywordGuard::new(&config.guard),
            composer: ResponseComposer::new(llm.clone()),
            store,
            llm,
        }
    }

    /// Handle one chat query. `Err` means the backing store failed; every
    /// remote-service problem is already degraded to fallback text inside
    /// the pipeline.
    pub async fn handle(&self, query: &str) -> Result<ChatReply, ApiError> {
        if self.classifier.shortcut(query) {
            return Ok(ChatReply::text_only(GREETING_REPLY));
        }

        if self.classifier.classify(query).await == Intent::General {
            return Ok(self.general_reply(query).await);
        }

        if self.store.count_items().await? == 0 {
            return Ok(ChatReply::text_only(EMPTY_CATALOG_REPLY));
        }

        if self.retriever.is_list_all(query) {
            let (total, items) = self.retriever.list_all().await?;
            return Ok(ChatReply {
                response: format!("Here are all our products ({total} total):"),
                products: items,
            });
        }

        let query_embedding = self.embedder.embed(query).await.into_vector();
        let candidates = self.retriever.retrieve(&query_embedding).await?;
        tracing::debug!("Retrieved {} candidates for query", candidates.len());

        let validated = self.guard.validate(query, candidates);
        let (response, products) = self.composer.compose(query, &validated).await;

        Ok(ChatReply { response, products })
    }

    async fn general_reply(&self, query: &str) -> ChatReply {
        let messages = [ChatMessage::system(GENERAL_PROMPT), ChatMessage::user(query)];

        match self
            .llm
            .complete(&messages, GENERAL_MAX_TOKENS, GENERAL_TIMEOUT)
            .await
        {
            Ok(text) if !text.is_empty() => ChatReply::text_only(text),
            Ok(_) => ChatReply::text_only(GENERAL_FALLBACK_REPLY),
            Err(err) => {
                tracing::warn!("General reply generation failed: {}", err);
                ChatReply::text_only(GENERAL_FALLBACK_REPLY)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NewCatalogItem, SqliteCatalogStore};
    use crate::embedding::hashed_embedding;

    /// Config whose remote endpoints refuse connections immediately, so the
    /// classifier defaults to product intent and embedding/generation take
    /// their deterministic fallbacks.
    fn offline_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.chat.base_url = "http://127.0.0.1:9".to_string();
        config.embedding.base_url = "http://127.0.0.1:9".to_string();
        config.embedding.timeout_secs = 1;
        config
    }

    async fn offline_assistant() -> (Assistant, Arc<dyn CatalogStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store: Arc<dyn CatalogStore> = Arc::new(
            SqliteCatalogStore::with_path(dir.path().join("catalog.db"))
                .await
                .expect("store init"),
        );
        let assistant = Assistant::new(store.clone(), &offline_config());
        (assistant, store, dir)
    }

    fn product(name: &str, price: f64, description: &str) -> NewCatalogItem {
        NewCatalogItem {
            name: name.to_string(),
            price,
            description: description.to_string(),
            category: "Misc".to_string(),
        }
    }

    #[tokio::test]
    async fn greeting_takes_the_shortcut() {
        let (assistant, _store, _dir) = offline_assistant().await;

        for greeting in ["hi", "hello", "hey"] {
            let reply = assistant.handle(greeting).await.unwrap();
            assert_eq!(reply.response, GREETING_REPLY);
            assert!(reply.products.is_empty());
        }
    }

    #[tokio::test]
    async fn empty_catalog_answers_before_embedding() {
        let (assistant, _store, _dir) = offline_assistant().await;

        let reply = assistant.handle("show me sneakers").await.unwrap();
        assert_eq!(reply.response, EMPTY_CATALOG_REPLY);
        assert!(reply.products.is_empty());
    }

    #[tokio::test]
    async fn list_all_returns_ten_of_fifteen_with_count_header() {
        let (assistant, store, _dir) = offline_assistant().await;

        for i in 0..15 {
            store
                .insert_item(product(&format!("Item {i}"), 9.99, "generic"))
                .await
                .unwrap();
        }

        let reply = assistant.handle("list all products").await.unwrap();
        assert!(reply.response.contains("15 total"));
        assert_eq!(reply.products.len(), 10);
    }

    #[tokio::test]
    async fn sneaker_query_survives_the_guard_and_laptop_does_not() {
        let (assistant, store, _dir) = offline_assistant().await;

        let sneaker = store
            .insert_item(product("Red Sneaker", 59.99, "running sneaker"))
            .await
            .unwrap();
        let laptop = store
            .insert_item(product("Gaming Laptop", 1299.0, "fast machine"))
            .await
            .unwrap();

        // Both chunks share the query's fallback vector, so both retrieve at
        // distance ~0 and the keyword guard does the separating.
        let query_vector = hashed_embedding("Show me sneakers", 384);
        store
            .insert_chunk(sneaker.id, &sneaker.composed_text(), &query_vector)
            .await
            .unwrap();
        store
            .insert_chunk(laptop.id, &laptop.composed_text(), &query_vector)
            .await
            .unwrap();

        let reply = assistant.handle("Show me sneakers").await.unwrap();

        assert_eq!(reply.products.len(), 1);
        assert_eq!(reply.products[0].name, "Red Sneaker");
        assert_eq!(reply.products[0].price, 59.99);
        assert!(!reply.response.is_empty());
    }

    #[tokio::test]
    async fn guarded_out_query_gets_the_refusal() {
        let (assistant, store, _dir) = offline_assistant().await;

        let laptop = store
            .insert_item(product("Gaming Laptop", 1299.0, "fast machine"))
            .await
            .unwrap();
        let query_vector = hashed_embedding("got any coffee?", 384);
        store
            .insert_chunk(laptop.id, &laptop.composed_text(), &query_vector)
            .await
            .unwrap();

        let reply = assistant.handle("got any coffee?").await.unwrap();

        assert_eq!(reply.response, super::super::composer::NO_MATCH_REPLY);
        assert!(reply.products.is_empty());
    }
}
