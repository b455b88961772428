use std::sync::Arc;

use crate::catalog::{CatalogStore, SqliteCatalogStore};
use crate::core::config::AppConfig;
use crate::core::paths::AppPaths;
use crate::pipeline::{Assistant, Ingestor};

/// Shared application state: configuration, the catalog store, and the two
/// pipeline entry points (query-time assistant, admin-time ingestor).
pub struct AppState {
    pub config: AppConfig,
    pub paths: Arc<AppPaths>,
    pub store: Arc<dyn CatalogStore>,
    pub assistant: Assistant,
    pub ingestor: Ingestor,
}

impl AppState {
    pub async fn initialize(paths: Arc<AppPaths>, config: AppConfig) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn CatalogStore> =
            Arc::new(SqliteCatalogStore::new(paths.as_ref()).await?);

        let assistant = Assistant::new(store.clone(), &config);
        let ingestor = Ingestor::new(store.clone(), &config);

        Ok(Arc::new(AppState {
            config,
            paths,
            store,
            assistant,
            ingestor,
        }))
    }
}
