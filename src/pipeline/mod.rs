//! The retrieval-and-validation pipeline.
//!
//! One chat request flows query -> intent -> embedding -> retrieval ->
//! keyword validation -> composition. `Assistant` drives the state machine;
//! `Ingestor` is the separate admin path that (re)embeds the catalog.

mod assistant;
mod composer;
mod guard;
mod ingest;
mod intent;
mod retriever;

pub use assistant::{Assistant, ChatReply, ERROR_REPLY};
pub use composer::ResponseComposer;
pub use guard::KeywordGuard;
pub use ingest::{IngestReport, Ingestor};
pub use intent::{Intent, IntentClassifier};
pub use retriever::VectorRetriever;
