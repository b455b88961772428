use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{admin, chat, health};
use crate::state::AppState;

/// Main application router: chat, admin, and health endpoints behind
/// permissive CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/chat", post(chat::chat))
        .route("/admin/products", post(admin::create_product))
        .route("/admin/ingest", post(admin::ingest_all))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}
