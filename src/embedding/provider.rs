use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::core::config::EmbeddingConfig;
use crate::core::errors::ApiError;

/// How a vector was produced. The fallback variant is an explicit outcome
/// rather than an error: callers always get a usable vector.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingOutcome {
    Remote(Vec<f32>),
    Fallback(Vec<f32>),
}

impl EmbeddingOutcome {
    pub fn into_vector(self) -> Vec<f32> {
        match self {
            EmbeddingOutcome::Remote(vector) | EmbeddingOutcome::Fallback(vector) => vector,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, EmbeddingOutcome::Fallback(_))
    }
}

#[derive(Clone)]
pub struct EmbeddingProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    dimensions: usize,
}

impl EmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            dimensions: config.dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed `text`, never failing the caller. Any remote problem (timeout,
    /// error status, malformed or truncated payload) degrades to the
    /// deterministic hash-derived vector.
    pub async fn embed(&self, text: &str) -> EmbeddingOutcome {
        match self.embed_remote(text).await {
            Ok(vector) => EmbeddingOutcome::Remote(vector),
            Err(err) => {
                tracing::warn!("Remote embedding unavailable, using hashed fallback: {}", err);
                EmbeddingOutcome::Fallback(hashed_embedding(text, self.dimensions))
            }
        }
    }

    async fn embed_remote(&self, text: &str) -> Result<Vec<f32>, ApiError> {
        let url = format!("{}/{}", self.base_url, self.model);

        let mut request = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&json!({ "inputs": text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await.map_err(ApiError::internal)?;

        if !res.status().is_success() {
            return Err(ApiError::Internal(format!(
                "embedding service error: {}",
                res.status()
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        let mut values = parse_embedding_payload(&payload)
            .ok_or_else(|| ApiError::Internal("malformed embedding payload".to_string()))?;

        // Shorter than the model dimensionality means a truncated or wrong
        // payload; the length invariant routes it to the fallback.
        if values.len() < self.dimensions {
            return Err(ApiError::Internal(format!(
                "embedding payload too short: {} values",
                values.len()
            )));
        }

        values.truncate(self.dimensions);
        Ok(values)
    }
}

/// Extract a numeric vector from either response shape: a flat array, or an
/// array of arrays (first row wins).
fn parse_embedding_payload(payload: &Value) -> Option<Vec<f32>> {
    let outer = payload.as_array()?;
    let row = match outer.first() {
        Some(Value::Array(inner)) => inner,
        _ => outer,
    };
    row.iter().map(|v| v.as_f64().map(|f| f as f32)).collect()
}

/// Deterministic local embedding: SHA-256 of the lower-cased text yields 32
/// bytes, each normalized to [0, 1], cycled out to `dimensions` values.
/// Same text always produces the same vector.
pub fn hashed_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    let digest = Sha256::digest(text.to_lowercase().as_bytes());
    let seed: Vec<f32> = digest.iter().map(|byte| *byte as f32 / 255.0).collect();

    (0..dimensions).map(|i| seed[i % seed.len()]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_embedding_is_deterministic() {
        let a = hashed_embedding("wireless headphones", 384);
        let b = hashed_embedding("wireless headphones", 384);
        assert_eq!(a, b);
        assert_eq!(a.len(), 384);
    }

    #[test]
    fn hashed_embedding_is_case_insensitive() {
        assert_eq!(
            hashed_embedding("Running Shoes", 384),
            hashed_embedding("running shoes", 384)
        );
    }

    #[test]
    fn hashed_embedding_cycles_its_seed() {
        let vector = hashed_embedding("espresso machine", 384);
        // SHA-256 yields a 32-value seed, so the vector repeats every 32 slots.
        assert_eq!(vector[0], vector[32]);
        assert_eq!(vector[5], vector[37]);
        assert!(vector.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn hashed_embedding_differs_across_texts() {
        assert_ne!(
            hashed_embedding("laptop", 384),
            hashed_embedding("coffee", 384)
        );
    }

    #[test]
    fn parses_flat_payload() {
        let payload = json!([0.1, 0.2, 0.3]);
        assert_eq!(
            parse_embedding_payload(&payload),
            Some(vec![0.1, 0.2, 0.3])
        );
    }

    #[test]
    fn parses_nested_payload_taking_first_row() {
        let payload = json!([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(parse_embedding_payload(&payload), Some(vec![1.0, 2.0]));
    }

    #[test]
    fn rejects_non_numeric_payload() {
        assert_eq!(parse_embedding_payload(&json!({"error": "loading"})), None);
        assert_eq!(parse_embedding_payload(&json!(["a", "b"])), None);
    }

    #[tokio::test]
    async fn unreachable_service_falls_back_deterministically() {
        let config = EmbeddingConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..EmbeddingConfig::default()
        };
        let provider = EmbeddingProvider::new(&config);

        let first = provider.embed("gaming laptop").await;
        let second = provider.embed("gaming laptop").await;

        assert!(first.is_fallback());
        let first = first.into_vector();
        assert_eq!(first.len(), 384);
        assert_eq!(first, second.into_vector());
    }
}
