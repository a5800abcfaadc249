//! Pinecone-hosted vector index.
//!
//! [`PineconeIndex`] implements [`VectorIndex`] over the Pinecone HTTP API.
//! The index is addressed by name: [`connect`](PineconeIndex::connect) asks
//! the control plane for the index host once, then all data traffic goes to
//! that host. Credentials come from the environment via
//! [`Settings`](crate::config::Settings).

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::document::{Chunk, ScoredChunk};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Pinecone control-plane address, used to resolve an index name to a host.
const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

/// Backend label used in error messages.
const BACKEND: &str = "pinecone";

/// A [`VectorIndex`] backed by a hosted Pinecone index.
///
/// Chunk text, parent document id, and metadata travel as the flat metadata
/// payload Pinecone stores next to each vector, so query responses can be
/// mapped back into [`Chunk`]s without a second lookup.
///
/// # Example
///
/// ```rust,ignore
/// use ragline::PineconeIndex;
///
/// let index = PineconeIndex::connect(&settings.pinecone_api_key, &settings.index_name).await?;
/// index.upsert(&chunks).await?;
/// let ranked = index.similarity_query(&query_embedding, 4).await?;
/// ```
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl PineconeIndex {
    /// Connect to a named index, resolving its data-plane host through the
    /// control plane.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexQuery`] if the control plane is unreachable
    /// or does not know the index.
    pub async fn connect(api_key: impl Into<String>, index_name: &str) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Config("Pinecone API key must not be empty".to_string()));
        }

        let client = reqwest::Client::new();
        let url = format!("{CONTROL_PLANE_URL}/indexes/{index_name}");

        let response =
            client.get(&url).header("Api-Key", &api_key).send().await.map_err(|e| {
                error!(backend = BACKEND, index = index_name, error = %e, "describe index failed");
                RagError::IndexQuery {
                    backend: BACKEND.to_string(),
                    message: format!("failed to describe index '{index_name}': {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(backend = BACKEND, index = index_name, %status, "describe index rejected");
            return Err(RagError::IndexQuery {
                backend: BACKEND.to_string(),
                message: format!("index '{index_name}' lookup returned {status}: {body}"),
            });
        }

        let described: DescribeIndexResponse = response.json().await.map_err(|e| {
            RagError::IndexQuery {
                backend: BACKEND.to_string(),
                message: format!("failed to parse describe response: {e}"),
            }
        })?;

        debug!(backend = BACKEND, index = index_name, host = %described.host, "resolved index host");

        Ok(Self { client, api_key, endpoint: format!("https://{}", described.host) })
    }

    /// Create an index handle for a known data-plane endpoint, skipping host
    /// resolution. The endpoint is a full URL including the scheme.
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// Flatten a chunk into the metadata payload stored next to its vector.
    fn vector_metadata(chunk: &Chunk) -> Map<String, Value> {
        let mut metadata = Map::new();
        metadata.insert("text".to_string(), Value::String(chunk.text.clone()));
        metadata.insert("document_id".to_string(), Value::String(chunk.document_id.clone()));
        for (key, value) in &chunk.metadata {
            metadata.insert(key.clone(), Value::String(value.clone()));
        }
        metadata
    }
}

// ── Pinecone API request/response types ────────────────────────────

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Serialize)]
struct UpsertRequest {
    vectors: Vec<UpsertVector>,
}

#[derive(Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
    metadata: Map<String, Value>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    score: f32,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl QueryMatch {
    /// Map a scored match back into a [`Chunk`]. The stored embedding is not
    /// returned by queries and stays empty.
    fn into_scored_chunk(mut self) -> ScoredChunk {
        let text = take_string(&mut self.metadata, "text");
        let document_id = take_string(&mut self.metadata, "document_id");
        let metadata: HashMap<String, String> = self
            .metadata
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();

        ScoredChunk {
            chunk: Chunk { id: self.id, text, embedding: Vec::new(), metadata, document_id },
            score: self.score,
        }
    }
}

fn take_string(metadata: &mut Map<String, Value>, key: &str) -> String {
    match metadata.remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

// ── VectorIndex implementation ─────────────────────────────────────

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let vectors = chunks
            .iter()
            .map(|chunk| UpsertVector {
                id: chunk.id.clone(),
                values: chunk.embedding.clone(),
                metadata: Self::vector_metadata(chunk),
            })
            .collect();

        let response = self
            .client
            .post(format!("{}/vectors/upsert", self.endpoint))
            .header("Api-Key", &self.api_key)
            .json(&UpsertRequest { vectors })
            .send()
            .await
            .map_err(|e| {
                error!(backend = BACKEND, error = %e, "upsert request failed");
                RagError::IndexWrite {
                    backend: BACKEND.to_string(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(backend = BACKEND, %status, "upsert rejected");
            return Err(RagError::IndexWrite {
                backend: BACKEND.to_string(),
                message: format!("upsert returned {status}: {body}"),
            });
        }

        debug!(backend = BACKEND, count = chunks.len(), "upserted chunks");
        Ok(())
    }

    async fn similarity_query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        let request_body =
            QueryRequest { vector: embedding, top_k, include_metadata: true };

        let response = self
            .client
            .post(format!("{}/query", self.endpoint))
            .header("Api-Key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(backend = BACKEND, error = %e, "query request failed");
                RagError::IndexQuery {
                    backend: BACKEND.to_string(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(backend = BACKEND, %status, "query rejected");
            return Err(RagError::IndexQuery {
                backend: BACKEND.to_string(),
                message: format!("query returned {status}: {body}"),
            });
        }

        let query_response: QueryResponse = response.json().await.map_err(|e| {
            RagError::IndexQuery {
                backend: BACKEND.to_string(),
                message: format!("failed to parse query response: {e}"),
            }
        })?;

        Ok(query_response.matches.into_iter().map(QueryMatch::into_scored_chunk).collect())
    }
}
