//! Typed application configuration.
//!
//! Loaded from `config.yml` in the data directory (path overridable via
//! `NEUSEARCH_CONFIG_PATH`), with environment variables supplying the
//! secrets and deployment overrides. Every section falls back to defaults
//! matching the production deployment, so a missing file is not an error.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::AppPaths;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub embedding: EmbeddingConfig,
    pub chat: ChatConfig,
    pub retrieval: RetrievalConfig,
    pub intent: IntentConfig,
    pub guard: GuardConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Feature-extraction endpoint prefix; the model name is appended.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co/pipeline/feature-extraction"
                .to_string(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            api_key: None,
            timeout_secs: 30,
            dimensions: 384,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// OpenAI-compatible API root (`{base_url}/chat/completions`).
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-8b-8192".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum cosine distance for a chunk to count as similar.
    pub distance_threshold: f32,
    /// Maximum number of candidates returned per query.
    pub limit: usize,
    /// Phrases that request a full catalog listing instead of a search.
    pub list_all_phrases: Vec<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 0.5,
            limit: 10,
            list_all_phrases: vec![
                "list all".to_string(),
                "show all".to_string(),
                "all products".to_string(),
                "what do you have".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Exact-match greetings answered without any remote call.
    pub greetings: Vec<String>,
    /// Exact-match questions about the assistant itself.
    pub general_questions: Vec<String>,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            greetings: vec!["hi".to_string(), "hello".to_string(), "hey".to_string()],
            general_questions: vec![
                "who are you".to_string(),
                "what are you".to_string(),
                "what do you do".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Controlled vocabulary scanned in priority order.
    pub keywords: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            keywords: vec![
                "shoe".to_string(),
                "sneaker".to_string(),
                "footwear".to_string(),
                "laptop".to_string(),
                "playstation".to_string(),
                "coffee".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

impl AppConfig {
    pub fn load(paths: &AppPaths) -> Self {
        let path = config_path(paths);
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_yaml::from_str::<AppConfig>(&contents) {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::warn!(
                        "Invalid config at {}: {}; using defaults",
                        path.display(),
                        err
                    );
                    AppConfig::default()
                }
            },
            Err(_) => AppConfig::default(),
        };
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = env::var("HF_API_TOKEN") {
            self.embedding.api_key = Some(token);
        }
        if let Ok(key) = env::var("GROQ_API_KEY") {
            self.chat.api_key = Some(key);
        }
        if let Ok(model) = env::var("EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Ok(model) = env::var("CHAT_MODEL") {
            self.chat.model = model;
        }
        if let Ok(port) = env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }
}

fn config_path(paths: &AppPaths) -> PathBuf {
    if let Ok(path) = env::var("NEUSEARCH_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    paths.data_dir.join("config.yml")
}
