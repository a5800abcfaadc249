//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`CharacterChunker`], which
//! splits text into overlapping fixed-size segments, preferring to cut on a
//! separator boundary.

use crate::config::RagConfig;
use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings; embeddings are attached later by the pipeline. Chunking is a
/// pure function of the document and the chunker's parameters.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks in document order.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into overlapping segments of at most `chunk_size` characters,
/// cutting at the last separator boundary inside each window when one exists.
///
/// From each cursor position the next cut is the end of the last `separator`
/// occurrence at or before `chunk_size` characters ahead, provided the cut
/// makes progress past the overlap region; otherwise the cut falls at exactly
/// `chunk_size` characters. The cursor then moves to `cut - chunk_overlap`,
/// so consecutive chunks always share exactly `chunk_overlap` characters.
///
/// All positions are character offsets; multi-byte text never splits inside
/// a character.
///
/// # Example
///
/// ```rust,ignore
/// use ragline::CharacterChunker;
///
/// let chunker = CharacterChunker::new(1000, 30, "\n")?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct CharacterChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separator: String,
}

impl CharacterChunker {
    /// Create a new `CharacterChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero, `chunk_overlap`
    /// is not strictly less than `chunk_size`, or `separator` is empty.
    pub fn new(
        chunk_size: usize,
        chunk_overlap: usize,
        separator: impl Into<String>,
    ) -> Result<Self> {
        let separator = separator.into();
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        if separator.is_empty() {
            return Err(RagError::Config("separator must not be empty".to_string()));
        }
        Ok(Self { chunk_size, chunk_overlap, separator })
    }

    /// Create a chunker from the chunking fields of a [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap, config.separator.clone())
    }

    /// Find the cut position for the window starting at char `start`.
    ///
    /// Returns the char index of the end of the last separator occurrence
    /// inside the window, if that end lies past the overlap region.
    fn separator_cut(
        &self,
        text: &str,
        bounds: &[usize],
        start: usize,
        window_end: usize,
    ) -> Option<usize> {
        let window = &text[bounds[start]..bounds[window_end]];
        let pos = window.rfind(&self.separator)?;
        let end_byte = bounds[start] + pos + self.separator.len();
        // bounds is strictly increasing and end_byte is a char boundary, so
        // this recovers the char index of the separator's end.
        let end_char = bounds.partition_point(|&b| b < end_byte);
        (end_char > start + self.chunk_overlap).then_some(end_char)
    }
}

impl Chunker for CharacterChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let text = &document.text;
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every char boundary; bounds[i] is the offset of the
        // i-th character and bounds[char_count] == text.len().
        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        bounds.push(text.len());
        let char_count = bounds.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        loop {
            let window_end = (start + self.chunk_size).min(char_count);
            let cut = if window_end == char_count {
                char_count
            } else {
                self.separator_cut(text, &bounds, start, window_end).unwrap_or(window_end)
            };

            let mut metadata = document.metadata.clone();
            metadata.insert("chunk_index".to_string(), chunk_index.to_string());

            chunks.push(Chunk {
                id: format!("{}_{chunk_index}", document.id),
                text: text[bounds[start]..bounds[cut]].to_string(),
                embedding: Vec::new(),
                metadata,
                document_id: document.id.clone(),
            });

            if cut == char_count {
                break;
            }
            start = cut - self.chunk_overlap;
            chunk_index += 1;
        }

        chunks
    }
}
