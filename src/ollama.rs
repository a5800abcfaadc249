//! Ollama-backed embedder and generator.
//!
//! Both clients talk to an Ollama server over its HTTP API with `reqwest`:
//! [`OllamaEmbedder`] calls `/api/embed`, [`OllamaGenerator`] calls
//! `/api/generate` with streaming disabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::generation::Generator;

/// The default dimensionality for `nomic-embed-text`.
const DEFAULT_EMBED_DIMENSIONS: usize = 768;

/// Decode the `error` field Ollama returns on failed requests, falling back
/// to the raw body.
fn error_detail(body: String) -> String {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: String,
    }
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body)
}

// ── Embedder ───────────────────────────────────────────────────────

/// An [`Embedder`] backed by an Ollama server's `/api/embed` endpoint.
///
/// # Configuration
///
/// - `base_url` – the server address, e.g. `http://localhost:11434`.
/// - `model` – a pulled embedding model, e.g. `nomic-embed-text:latest`.
/// - `dimensions` – defaults to 768 (`nomic-embed-text`); override with
///   [`with_dimensions`](OllamaEmbedder::with_dimensions) for other models.
///
/// # Example
///
/// ```rust,ignore
/// use ragline::OllamaEmbedder;
///
/// let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text:latest");
/// let embedding = embedder.embed("hello world").await?;
/// ```
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Create a new embedder for the given server and model.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimensions: DEFAULT_EMBED_DIMENSIONS,
        }
    }

    /// Set the dimensionality reported for this embedder's model.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::Embedding {
            provider: "Ollama".into(),
            message: "server returned no embeddings".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "Ollama", batch_size = texts.len(), model = %self.model, "embedding batch");

        let request_body = EmbedRequest { model: &self.model, input: texts.to_vec() };

        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Ollama", error = %e, "embed request failed");
                RagError::Embedding {
                    provider: "Ollama".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = "Ollama", %status, "embed API error");
            return Err(RagError::Embedding {
                provider: "Ollama".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = "Ollama", error = %e, "failed to parse embed response");
            RagError::Embedding {
                provider: "Ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(RagError::Embedding {
                provider: "Ollama".into(),
                message: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    embed_response.embeddings.len()
                ),
            });
        }

        Ok(embed_response.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Generator ──────────────────────────────────────────────────────

/// A [`Generator`] backed by an Ollama server's `/api/generate` endpoint.
///
/// Requests are sent with `stream: false`, so the server replies with one
/// complete answer.
///
/// # Example
///
/// ```rust,ignore
/// use ragline::OllamaGenerator;
///
/// let generator = OllamaGenerator::new("http://localhost:11434", "gemma3:1b");
/// let answer = generator.generate(&prompt).await?;
/// ```
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// Create a new generator for the given server and model.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "generating answer");

        let request_body = GenerateRequest { model: &self.model, prompt, stream: false };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "generate request failed");
                RagError::Generation {
                    model: self.model.clone(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(model = %self.model, %status, "generate API error");
            return Err(RagError::Generation {
                model: self.model.clone(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "failed to parse generate response");
            RagError::Generation {
                model: self.model.clone(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if generate_response.response.trim().is_empty() {
            return Err(RagError::Generation {
                model: self.model.clone(),
                message: "model returned empty output".into(),
            });
        }

        Ok(generate_response.response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
