use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::core::config::AppConfig;
use crate::core::errors::ApiError;
use crate::embedding::{Chunker, EmbeddingProvider};

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub processed_products: usize,
    pub total_embeddings: usize,
}

/// Full catalog re-embedding: clears every chunk row, then re-chunks and
/// re-embeds each product. An administrative maintenance operation, assumed
/// single-writer; it is not designed to run concurrently with itself.
pub struct Ingestor {
    store: Arc<dyn CatalogStore>,
    embedder: EmbeddingProvider,
    chunker: Chunker,
}

impl Ingestor {
    pub fn new(store: Arc<dyn CatalogStore>, config: &AppConfig) -> Self {
        Self {
            store,
            embedder: EmbeddingProvider::new(&config.embedding),
            chunker: Chunker::new(&config.ingest),
        }
    }

    pub async fn run(&self) -> Result<IngestReport, ApiError> {
        let items = self.store.list_items().await?;
        if items.is_empty() {
            return Err(ApiError::NotFound("No products found".to_string()));
        }

        let cleared = self.store.clear_chunks().await?;
        tracing::info!("Cleared {} existing chunks before re-embedding", cleared);

        let mut total_embeddings = 0;
        for item in &items {
            for chunk in self.chunker.split(&item.composed_text()) {
                let embedding = self.embedder.embed(&chunk).await.into_vector();
                self.store
                    .insert_chunk(item.id, &chunk, &embedding)
                    .await?;
                total_embeddings += 1;
            }
        }

        tracing::info!(
            "Ingested {} products into {} embedded chunks",
            items.len(),
            total_embeddings
        );

        Ok(IngestReport {
            processed_products: items.len(),
            total_embeddings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NewCatalogItem, SqliteCatalogStore};

    fn offline_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.embedding.base_url = "http://127.0.0.1:9".to_string();
        config.embedding.timeout_secs = 1;
        config
    }

    async fn ingestor_with_store() -> (Ingestor, Arc<dyn CatalogStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store: Arc<dyn CatalogStore> = Arc::new(
            SqliteCatalogStore::with_path(dir.path().join("catalog.db"))
                .await
                .expect("store init"),
        );
        let ingestor = Ingestor::new(store.clone(), &offline_config());
        (ingestor, store, dir)
    }

    fn product(name: &str) -> NewCatalogItem {
        NewCatalogItem {
            name: name.to_string(),
            price: 15.0,
            description: "plain".to_string(),
            category: "Misc".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_catalog_is_a_not_found_error() {
        let (ingestor, _store, _dir) = ingestor_with_store().await;

        let err = ingestor.run().await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn run_embeds_every_product_and_reports_counts() {
        let (ingestor, store, _dir) = ingestor_with_store().await;

        store.insert_item(product("Moka Pot")).await.unwrap();
        store.insert_item(product("Desk Lamp")).await.unwrap();

        let report = ingestor.run().await.unwrap();
        assert_eq!(report.processed_products, 2);
        assert!(report.total_embeddings >= 2);
        assert_eq!(store.count_chunks().await.unwrap(), report.total_embeddings);
    }

    #[tokio::test]
    async fn rerun_replaces_stale_chunks() {
        let (ingestor, store, _dir) = ingestor_with_store().await;

        store.insert_item(product("Moka Pot")).await.unwrap();

        let first = ingestor.run().await.unwrap();
        let second = ingestor.run().await.unwrap();

        // A rerun regenerates from scratch rather than accumulating.
        assert_eq!(first.total_embeddings, second.total_embeddings);
        assert_eq!(store.count_chunks().await.unwrap(), second.total_embeddings);
    }
}
