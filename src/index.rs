//! Vector index trait for storing and searching embedded chunks.

use async_trait::async_trait;

use crate::document::{Chunk, ScoredChunk};
use crate::error::Result;

/// A store supporting nearest-neighbor similarity search over embeddings.
///
/// An index handle is bound to one named index at construction; the two
/// deployment variants are [`LocalIndex`](crate::local::LocalIndex) (disk
/// persisted, no network) and [`PineconeIndex`](crate::pinecone::PineconeIndex)
/// (hosted service). The similarity metric is index-defined and treated as a
/// black box that returns a ranked sequence.
///
/// # Example
///
/// ```rust,ignore
/// use ragline::{LocalIndex, VectorIndex};
///
/// let index = LocalIndex::new();
/// index.upsert(&chunks).await?;
/// let ranked = index.similarity_query(&query_embedding, 4).await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Upsert chunks into the index. Chunks must have embeddings attached.
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()>;

    /// Return the `top_k` entries nearest to `embedding`, ranked by
    /// descending similarity score.
    async fn similarity_query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>>;
}
