use serde::{Deserialize, Serialize};

/// A catalog product. Immutable to the query path; only the admin ingestion
/// path creates products and (re)generates their chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
}

impl CatalogItem {
    /// Composed text that gets chunked and embedded for this item.
    pub fn composed_text(&self) -> String {
        format!(
            "Product: {}\nCategory: {}\nPrice: ${}\nDescription: {}",
            self.name, self.category, self.price, self.description
        )
    }
}

/// Payload for creating a product via the admin endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCatalogItem {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
}

/// One similarity hit: an item reached through one of its chunks, with the
/// cosine distance of that chunk. An item can appear once per matching
/// chunk; deduplication happens at response composition.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalCandidate {
    pub item: CatalogItem,
    pub distance: f32,
}
