//! # ragline
//!
//! A minimal retrieval-augmented-generation pipeline: load a document, split
//! it into overlapping chunks, embed the chunks, store them in a vector
//! index, retrieve relevant chunks for a question, and feed them to a
//! language model through a prompt template.
//!
//! ## Overview
//!
//! The pipeline composes five seams, each behind a trait so backends can be
//! swapped or mocked:
//!
//! - [`DocumentLoader`] — [`TextLoader`] (explicit encoding) and [`PdfLoader`]
//!   (one document per page)
//! - [`Chunker`] — [`CharacterChunker`], separator-preferring overlapping splits
//! - [`Embedder`] — [`OllamaEmbedder`] over `/api/embed`
//! - [`VectorIndex`] — [`LocalIndex`] (disk persisted) and [`PineconeIndex`]
//!   (hosted service)
//! - [`Generator`] — [`OllamaGenerator`] over `/api/generate`
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragline::{
//!     CharacterChunker, LocalIndex, OllamaEmbedder, OllamaGenerator, RagConfig, RagPipeline,
//!     TextLoader,
//! };
//!
//! let config = RagConfig::default();
//! let pipeline = RagPipeline::builder()
//!     .config(config.clone())
//!     .chunker(Arc::new(CharacterChunker::from_config(&config)?))
//!     .embedder(Arc::new(OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text:latest")))
//!     .index(Arc::new(LocalIndex::new()))
//!     .generator(Arc::new(OllamaGenerator::new("http://localhost:11434", "gemma3:1b")))
//!     .build()?;
//!
//! let written = pipeline.ingest_path(&TextLoader::default(), "notes.txt").await?;
//! println!("wrote {written} chunks");
//!
//! let answer = pipeline.answer("what are the notes about?").await?;
//! println!("{answer}");
//! ```
//!
//! Ingestion and querying are independent linear flows; run them from the
//! same process or from separate ones sharing an index.

pub mod assembler;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod loader;
pub mod local;
pub mod ollama;
pub mod pinecone;
pub mod pipeline;
pub mod prompt;

pub use assembler::assemble;
pub use chunking::{CharacterChunker, Chunker};
pub use config::{RagConfig, RagConfigBuilder, Settings};
pub use document::{Chunk, Document, ScoredChunk};
pub use embedding::Embedder;
pub use error::{RagError, Result};
pub use generation::Generator;
pub use index::VectorIndex;
pub use loader::{DocumentLoader, PdfLoader, TextEncoding, TextLoader};
pub use local::LocalIndex;
pub use ollama::{OllamaEmbedder, OllamaGenerator};
pub use pinecone::PineconeIndex;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use prompt::PromptTemplate;
