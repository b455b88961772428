use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::catalog::NewCatalogItem;
use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCatalogItem>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if payload.price < 0.0 {
        return Err(ApiError::BadRequest(
            "price must be non-negative".to_string(),
        ));
    }

    let item = state.store.insert_item(payload).await?;
    Ok(Json(item))
}

/// Full catalog re-embedding. Failures surface as an error payload here,
/// unlike the chat path which degrades to canned text.
pub async fn ingest_all(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.ingestor.run().await?;

    Ok(Json(json!({
        "message": "Successfully ingested all products",
        "processed_products": report.processed_products,
        "total_embeddings": report.total_embeddings,
    })))
}
