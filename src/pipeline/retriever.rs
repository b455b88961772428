use std::sync::Arc;

use crate::catalog::{CatalogItem, CatalogStore, RetrievalCandidate};
use crate::core::config::RetrievalConfig;
use crate::core::errors::ApiError;

pub struct VectorRetriever {
    store: Arc<dyn CatalogStore>,
    distance_threshold: f32,
    limit: usize,
    list_all_phrases: Vec<String>,
}

impl VectorRetriever {
    pub fn new(store: Arc<dyn CatalogStore>, config: &RetrievalConfig) -> Self {
        Self {
            store,
            distance_threshold: config.distance_threshold,
            limit: config.limit,
            list_all_phrases: config.list_all_phrases.clone(),
        }
    }

    /// True when the query asks for the whole catalog rather than a search.
    pub fn is_list_all(&self, query: &str) -> bool {
        let lowered = query.to_lowercase();
        self.list_all_phrases
            .iter()
            .any(|phrase| lowered.contains(phrase.as_str()))
    }

    /// Similarity search: candidates strictly under the distance threshold,
    /// ascending, capped at the configured limit.
    pub async fn retrieve(
        &self,
        query_embedding: &[f32],
    ) -> Result<Vec<RetrievalCandidate>, ApiError> {
        self.store
            .search_chunks(query_embedding, self.distance_threshold, self.limit)
            .await
    }

    /// List-all shortcut: total count plus the first `limit` items in
    /// stable order, no distance filtering involved.
    pub async fn list_all(&self) -> Result<(usize, Vec<CatalogItem>), ApiError> {
        let items = self.store.list_items().await?;
        let total = items.len();
        Ok((total, items.into_iter().take(self.limit).collect()))
    }
}
