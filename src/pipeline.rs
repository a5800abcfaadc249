//! Pipeline orchestrator for the ingest and query flows.
//!
//! [`RagPipeline`] wires a [`Chunker`], an [`Embedder`], a [`VectorIndex`],
//! a [`PromptTemplate`], and a [`Generator`] into two linear flows:
//!
//! - *ingest*: document → chunks → embeddings → batch upsert
//! - *query*: question → retrieved chunks → assembled context → prompt → answer
//!
//! Both flows are sequences of awaited calls with no branching on
//! intermediate results and no retry logic; any stage failure aborts the
//! flow and propagates its typed error.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragline::{CharacterChunker, LocalIndex, OllamaEmbedder, OllamaGenerator, RagConfig, RagPipeline};
//!
//! let config = RagConfig::default();
//! let pipeline = RagPipeline::builder()
//!     .config(config.clone())
//!     .chunker(Arc::new(CharacterChunker::from_config(&config)?))
//!     .embedder(Arc::new(OllamaEmbedder::new(base_url, embed_model)))
//!     .index(Arc::new(LocalIndex::new()))
//!     .generator(Arc::new(OllamaGenerator::new(base_url, chat_model)))
//!     .build()?;
//!
//! let written = pipeline.ingest_path(&TextLoader::default(), path).await?;
//! let answer = pipeline.answer("what does the document say?").await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::assembler::assemble;
use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Chunk, Document, ScoredChunk};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::generation::Generator;
use crate::index::VectorIndex;
use crate::loader::DocumentLoader;
use crate::prompt::PromptTemplate;

/// The pipeline orchestrator.
///
/// Construct one via [`RagPipeline::builder()`]. Each instance is immutable
/// after construction; every `ingest_*` or `answer` invocation is an
/// independent linear run.
pub struct RagPipeline {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn Generator>,
    prompt: PromptTemplate,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Load a source and run it through the ingest flow.
    ///
    /// Returns the number of chunks written to the index.
    ///
    /// # Errors
    ///
    /// [`RagError::Load`] if the source cannot be read, then the same
    /// failure modes as [`ingest_documents`](RagPipeline::ingest_documents).
    pub async fn ingest_path(
        &self,
        loader: &dyn DocumentLoader,
        path: impl AsRef<Path>,
    ) -> Result<usize> {
        let path = path.as_ref();
        let documents = loader.load(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "document load failed");
        })?;
        self.ingest_documents(&documents).await
    }

    /// Ingest a single already-loaded document.
    pub async fn ingest(&self, document: &Document) -> Result<usize> {
        self.ingest_documents(std::slice::from_ref(document)).await
    }

    /// Ingest documents: chunk → embed → single batch upsert.
    ///
    /// All chunks across all documents are embedded before anything is
    /// written, and the write is one batch upsert — a failure at the
    /// embedding stage leaves the index untouched by this call. Returns the
    /// number of chunks written.
    ///
    /// # Errors
    ///
    /// [`RagError::Embedding`] if the embedder fails on any chunk;
    /// [`RagError::IndexWrite`] if the batch upsert is rejected. Neither is
    /// retried here.
    pub async fn ingest_documents(&self, documents: &[Document]) -> Result<usize> {
        let mut chunks: Vec<Chunk> =
            documents.iter().flat_map(|d| self.chunker.chunk(d)).collect();
        if chunks.is_empty() {
            info!(documents = documents.len(), chunk_count = 0, "nothing to ingest");
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.inspect_err(|e| {
            error!(chunk_count = chunks.len(), error = %e, "embedding failed during ingest");
        })?;

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.index.upsert(&chunks).await.inspect_err(|e| {
            error!(chunk_count = chunks.len(), error = %e, "upsert failed during ingest");
        })?;

        let written = chunks.len();
        info!(documents = documents.len(), chunk_count = written, "ingested documents");
        Ok(written)
    }

    /// Retrieve the `top_k` chunks most relevant to `query`, ranked by
    /// descending score.
    ///
    /// # Errors
    ///
    /// [`RagError::Embedding`] if the query cannot be embedded;
    /// [`RagError::IndexQuery`] if the index is unreachable or returns no
    /// results — an empty index is an explicit error, not an empty answer.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(query).await.inspect_err(|e| {
            error!(error = %e, "query embedding failed");
        })?;

        let ranked = self
            .index
            .similarity_query(&query_embedding, self.config.top_k)
            .await
            .inspect_err(|e| {
                error!(error = %e, "similarity query failed");
            })?;

        if ranked.is_empty() {
            return Err(RagError::IndexQuery {
                backend: "index".to_string(),
                message: "no results for query; has anything been ingested?".to_string(),
            });
        }

        Ok(ranked)
    }

    /// Answer a question: retrieve → assemble → render → generate.
    ///
    /// The generator's output is returned verbatim; no post-processing,
    /// citation extraction, or validation.
    ///
    /// # Errors
    ///
    /// The failure modes of [`retrieve`](RagPipeline::retrieve), then
    /// [`RagError::Generation`] if the model is unreachable or returns no
    /// output.
    pub async fn answer(&self, query: &str) -> Result<String> {
        let ranked = self.retrieve(query).await?;
        let context = assemble(&ranked);
        let prompt = self.prompt.render(&context, query);

        let answer = self.generator.generate(&prompt).await.inspect_err(|e| {
            error!(error = %e, "generation failed");
        })?;

        info!(retrieved = ranked.len(), answer_len = answer.len(), "answered query");
        Ok(answer)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `config`, `chunker`, `embedder`, `index`, and `generator` are required;
/// the prompt template defaults to [`PromptTemplate::default()`].
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn Embedder>>,
    index: Option<Arc<dyn VectorIndex>>,
    generator: Option<Arc<dyn Generator>>,
    prompt: Option<PromptTemplate>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedder.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the generator.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the prompt template (optional).
    pub fn prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Build the [`RagPipeline`], validating that all required parts are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required part is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let index = self.index.ok_or_else(|| RagError::Config("index is required".to_string()))?;
        let generator =
            self.generator.ok_or_else(|| RagError::Config("generator is required".to_string()))?;

        Ok(RagPipeline {
            config,
            chunker,
            embedder,
            index,
            generator,
            prompt: self.prompt.unwrap_or_default(),
        })
    }
}
