use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::pipeline::{ChatReply, ERROR_REPLY};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatQueryRequest {
    pub query: String,
}

/// The chat endpoint always answers with a well-formed reply: a failing
/// store (or anything else unhandled) degrades to the fixed apology rather
/// than an error status.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatQueryRequest>,
) -> impl IntoResponse {
    let reply = match state.assistant.handle(&payload.query).await {
        Ok(reply) => reply,
        Err(err) => {
            tracing::error!("Chat pipeline failed: {}", err);
            ChatReply {
                response: ERROR_REPLY.to_string(),
                products: Vec::new(),
            }
        }
    };

    Json(reply)
}
