use async_trait::async_trait;

use super::types::{CatalogItem, NewCatalogItem, RetrievalCandidate};
use crate::core::errors::ApiError;

/// Abstract interface to the catalog store.
///
/// The query path only reads; ingestion clears and regenerates chunk rows
/// wholesale and never mutates an existing chunk in place.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_item(&self, item: NewCatalogItem) -> Result<CatalogItem, ApiError>;

    /// All products in stable insertion order.
    async fn list_items(&self) -> Result<Vec<CatalogItem>, ApiError>;

    async fn count_items(&self) -> Result<usize, ApiError>;

    /// Chunks within `threshold` cosine distance of the query vector, each
    /// joined back to its owning item, ascending by distance, at most
    /// `limit` rows.
    async fn search_chunks(
        &self,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<RetrievalCandidate>, ApiError>;

    async fn insert_chunk(
        &self,
        item_id: i64,
        content: &str,
        embedding: &[f32],
    ) -> Result<(), ApiError>;

    /// Delete every chunk row; returns how many were removed.
    async fn clear_chunks(&self) -> Result<usize, ApiError>;

    async fn count_chunks(&self) -> Result<usize, ApiError>;
}
