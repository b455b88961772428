//! SQLite-backed catalog store.
//!
//! Products and embedded chunks live in SQLite; similarity search loads the
//! chunk vectors and scores cosine distance in-process. Fine for a modest
//! catalog served by a single process.

use std::path::PathBuf;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::store::CatalogStore;
use super::types::{CatalogItem, NewCatalogItem, RetrievalCandidate};
use crate::core::errors::ApiError;
use crate::core::paths::AppPaths;

pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub async fn new(paths: &AppPaths) -> Result<Self, ApiError> {
        Self::with_path(paths.db_path.clone()).await
    }

    pub async fn with_path(db_path: PathBuf) -> Result<Self, ApiError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(ApiError::internal)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), ApiError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS product_chunks (
                chunk_id TEXT PRIMARY KEY,
                product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_product ON product_chunks(product_id)")
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(())
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Cosine distance (1 - similarity); mismatched or degenerate vectors
    /// score as maximally distant.
    fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 1.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let denom = norm_a * norm_b;

        if denom <= f32::EPSILON {
            1.0
        } else {
            1.0 - dot / denom
        }
    }

    fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> CatalogItem {
        CatalogItem {
            id: row.get("id"),
            name: row.get("name"),
            price: row.get("price"),
            description: row.get("description"),
            category: row.get("category"),
        }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn insert_item(&self, item: NewCatalogItem) -> Result<CatalogItem, ApiError> {
        let result = sqlx::query(
            "INSERT INTO products (name, price, description, category)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.description)
        .bind(&item.category)
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(CatalogItem {
            id: result.last_insert_rowid(),
            name: item.name,
            price: item.price,
            description: item.description,
            category: item.category,
        })
    }

    async fn list_items(&self) -> Result<Vec<CatalogItem>, ApiError> {
        let rows = sqlx::query(
            "SELECT id, name, price, description, category FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(rows.iter().map(Self::row_to_item).collect())
    }

    async fn count_items(&self) -> Result<usize, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(count as usize)
    }

    async fn search_chunks(
        &self,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<RetrievalCandidate>, ApiError> {
        let rows = sqlx::query(
            "SELECT p.id, p.name, p.price, p.description, p.category, c.embedding
             FROM product_chunks c
             JOIN products p ON p.id = c.product_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        let mut scored: Vec<RetrievalCandidate> = rows
            .iter()
            .map(|row| {
                let embedding_bytes: Vec<u8> = row.get("embedding");
                let stored = Self::deserialize_embedding(&embedding_bytes);
                RetrievalCandidate {
                    item: Self::row_to_item(row),
                    distance: Self::cosine_distance(query_embedding, &stored),
                }
            })
            .filter(|candidate| candidate.distance < threshold)
            .collect();

        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);

        Ok(scored)
    }

    async fn insert_chunk(
        &self,
        item_id: i64,
        content: &str,
        embedding: &[f32],
    ) -> Result<(), ApiError> {
        let blob = Self::serialize_embedding(embedding);

        sqlx::query(
            "INSERT INTO product_chunks (chunk_id, product_id, content, embedding)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(item_id)
        .bind(content)
        .bind(&blob)
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(())
    }

    async fn clear_chunks(&self) -> Result<usize, ApiError> {
        let result = sqlx::query("DELETE FROM product_chunks")
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(result.rows_affected() as usize)
    }

    async fn count_chunks(&self) -> Result<usize, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_chunks")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(count as usize)
    }
}
