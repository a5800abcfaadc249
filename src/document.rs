//! Data types for documents, chunks, and retrieval results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A loaded source document.
///
/// Created by a [`DocumentLoader`](crate::loader::DocumentLoader) and treated
/// as immutable afterwards. Paginated sources (PDF) produce one `Document`
/// per page with a `page` metadata key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
    /// Optional path or URI of the original source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

impl Document {
    /// Create a document with empty metadata and no source URI.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new(), source_uri: None }
    }
}

/// A bounded contiguous segment of a [`Document`]'s text.
///
/// Chunk ids are `{document_id}_{chunk_index}`. The embedding vector is empty
/// until the pipeline attaches one at ingestion time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Metadata inherited from the parent document plus a `chunk_index` field.
    pub metadata: HashMap<String, String>,
    /// The id of the parent [`Document`].
    pub document_id: String,
}

/// A retrieved [`Chunk`] paired with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Similarity score as reported by the index (higher is more relevant).
    pub score: f32,
}
