//! Local vector index with cosine similarity and disk persistence.
//!
//! [`LocalIndex`] keeps entries in memory behind a `tokio::sync::RwLock` and
//! can snapshot them to a named directory on disk, to be reopened later with
//! [`LocalIndex::open`]. No network dependency.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{Chunk, ScoredChunk};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// File name of the snapshot inside the index directory.
const SNAPSHOT_FILE: &str = "index.json";

/// Backend label used in error messages.
const BACKEND: &str = "local";

/// An in-process vector index using cosine similarity, persisted as a JSON
/// snapshot in a named directory.
///
/// Entries are keyed by chunk id, so upserting a chunk with an existing id
/// replaces it rather than duplicating it.
///
/// # Example
///
/// ```rust,ignore
/// use ragline::LocalIndex;
///
/// let index = LocalIndex::new();
/// index.upsert(&chunks).await?;
/// index.persist("my_index").await?;
///
/// let reopened = LocalIndex::open("my_index").await?;
/// let ranked = reopened.similarity_query(&query_embedding, 4).await?;
/// ```
#[derive(Debug, Default)]
pub struct LocalIndex {
    entries: RwLock<HashMap<String, Chunk>>,
}

impl LocalIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an index previously written with [`persist`](LocalIndex::persist).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexQuery`] if the directory has no snapshot or
    /// the snapshot cannot be decoded.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(SNAPSHOT_FILE);
        let bytes = tokio::fs::read(&path).await.map_err(|e| RagError::IndexQuery {
            backend: BACKEND.to_string(),
            message: format!("no index snapshot at {}: {e}", path.display()),
        })?;

        let chunks: Vec<Chunk> = serde_json::from_slice(&bytes).map_err(|e| {
            RagError::IndexQuery {
                backend: BACKEND.to_string(),
                message: format!("corrupt index snapshot at {}: {e}", path.display()),
            }
        })?;

        debug!(dir = %dir.as_ref().display(), entries = chunks.len(), "opened local index");

        let entries = chunks.into_iter().map(|c| (c.id.clone(), c)).collect();
        Ok(Self { entries: RwLock::new(entries) })
    }

    /// Write the current entries as a snapshot into `dir`, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexWrite`] if the directory or snapshot cannot
    /// be written.
    pub async fn persist(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| RagError::IndexWrite {
            backend: BACKEND.to_string(),
            message: format!("failed to create {}: {e}", dir.display()),
        })?;

        let entries = self.entries.read().await;
        let chunks: Vec<&Chunk> = entries.values().collect();
        let bytes = serde_json::to_vec(&chunks).map_err(|e| RagError::IndexWrite {
            backend: BACKEND.to_string(),
            message: format!("failed to encode snapshot: {e}"),
        })?;

        let path = dir.join(SNAPSHOT_FILE);
        tokio::fs::write(&path, bytes).await.map_err(|e| RagError::IndexWrite {
            backend: BACKEND.to_string(),
            message: format!("failed to write {}: {e}", path.display()),
        })?;

        debug!(dir = %dir.display(), entries = chunks.len(), "persisted local index");
        Ok(())
    }

    /// Number of entries currently held by the index.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the index holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for LocalIndex {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for chunk in chunks {
            entries.insert(chunk.id.clone(), chunk.clone());
        }
        debug!(count = chunks.len(), total = entries.len(), "upserted chunks to local index");
        Ok(())
    }

    async fn similarity_query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        let entries = self.entries.read().await;

        let mut scored: Vec<ScoredChunk> = entries
            .values()
            .map(|chunk| ScoredChunk {
                score: cosine_similarity(&chunk.embedding, embedding),
                chunk: chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}
