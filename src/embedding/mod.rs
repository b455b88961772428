//! Embedding generation.
//!
//! `EmbeddingProvider` turns text into fixed-length vectors, preferring a
//! remote feature-extraction service and degrading to a deterministic
//! hash-derived vector when the service is unavailable. `Chunker` splits
//! composed catalog text into the overlapping fragments that get embedded.

mod chunker;
mod provider;

pub use chunker::Chunker;
pub use provider::{hashed_embedding, EmbeddingOutcome, EmbeddingProvider};
