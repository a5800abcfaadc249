//! Pipeline configuration and environment-supplied settings.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Tunable parameters for chunking and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Preferred split boundary within a chunk window.
    pub separator: String,
    /// Number of top results to retrieve per query.
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 30, separator: "\n".to_string(), top_k: 4 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the preferred split boundary.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.config.separator = separator.into();
        self
    }

    /// Set the number of top results to retrieve per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size`
    /// - `separator` is empty
    /// - `top_k == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.separator.is_empty() {
            return Err(RagError::Config("separator must not be empty".to_string()));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

/// Process-wide settings resolved from the environment.
///
/// Loaded once at startup and passed into construction; nothing reads the
/// environment mid-pipeline. The binaries call `dotenvy::dotenv()` first so
/// a local `.env` file is honored.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Name of the hosted index (`INDEX_NAME`).
    pub index_name: String,
    /// Credential for the hosted index service (`PINECONE_API_KEY`).
    pub pinecone_api_key: String,
    /// Base URL of the Ollama server (`OLLAMA_BASE_URL`).
    pub ollama_base_url: String,
    /// Embedding model identifier (`EMBED_MODEL`).
    pub embed_model: String,
    /// Generation model identifier (`CHAT_MODEL`).
    pub chat_model: String,
}

/// Default Ollama server address.
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default embedding model.
const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text:latest";

/// Default generation model.
const DEFAULT_CHAT_MODEL: &str = "gemma3:1b";

impl Settings {
    /// Resolve settings from the environment.
    ///
    /// `INDEX_NAME` and `PINECONE_API_KEY` are required; the Ollama base URL
    /// and model names fall back to local defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required variable is not set.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            index_name: require_env("INDEX_NAME")?,
            pinecone_api_key: require_env("PINECONE_API_KEY")?,
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OLLAMA_BASE_URL.to_string()),
            embed_model: std::env::var("EMBED_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBED_MODEL.to_string()),
            chat_model: std::env::var("CHAT_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| RagError::Config(format!("{name} environment variable not set")))
}
