//! Integration tests for the pipeline flows, using mock collaborators.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ragline::{
    CharacterChunker, Chunk, Document, Embedder, Generator, RagConfig, RagError, RagPipeline,
    Result, ScoredChunk, VectorIndex,
};

/// Deterministic embedder that can be told to fail on the n-th call.
struct StubEmbedder {
    fail_on_call: Option<usize>,
    calls: AtomicUsize,
}

impl StubEmbedder {
    fn new() -> Self {
        Self { fail_on_call: None, calls: AtomicUsize::new(0) }
    }

    fn failing_on(call: usize) -> Self {
        Self { fail_on_call: Some(call), calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(RagError::Embedding {
                provider: "stub".to_string(),
                message: format!("injected failure on call {call}"),
            });
        }
        let sum = text.bytes().map(f32::from).sum::<f32>();
        Ok(vec![text.len() as f32, sum % 17.0, 1.0])
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// Index mock that records upsert batch sizes and returns canned results.
struct RecordingIndex {
    upserts: Mutex<Vec<usize>>,
    results: Vec<ScoredChunk>,
}

impl RecordingIndex {
    fn with_results(results: Vec<ScoredChunk>) -> Self {
        Self { upserts: Mutex::new(Vec::new()), results }
    }

    fn empty() -> Self {
        Self::with_results(Vec::new())
    }

    fn upsert_batches(&self) -> Vec<usize> {
        self.upserts.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for RecordingIndex {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        self.upserts.lock().unwrap().push(chunks.len());
        Ok(())
    }

    async fn similarity_query(&self, _embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        Ok(self.results.iter().take(top_k).cloned().collect())
    }
}

/// Generator mock that records rendered prompts and returns a fixed reply.
struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
    reply: String,
}

impl RecordingGenerator {
    fn replying(reply: &str) -> Self {
        Self { prompts: Mutex::new(Vec::new()), reply: reply.to_string() }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "recording"
    }
}

fn scored(text: &str, score: f32) -> ScoredChunk {
    ScoredChunk {
        chunk: Chunk {
            id: text.to_string(),
            text: text.to_string(),
            embedding: Vec::new(),
            metadata: Default::default(),
            document_id: "doc".to_string(),
        },
        score,
    }
}

fn pipeline(
    embedder: Arc<StubEmbedder>,
    index: Arc<RecordingIndex>,
    generator: Arc<RecordingGenerator>,
) -> RagPipeline {
    let config = RagConfig::builder().chunk_size(5).chunk_overlap(0).separator("\n").build().unwrap();
    RagPipeline::builder()
        .config(config.clone())
        .chunker(Arc::new(CharacterChunker::from_config(&config).unwrap()))
        .embedder(embedder)
        .index(index)
        .generator(generator)
        .build()
        .unwrap()
}

#[tokio::test]
async fn ingest_writes_all_chunks_in_one_batch() {
    let index = Arc::new(RecordingIndex::empty());
    let pipeline = pipeline(
        Arc::new(StubEmbedder::new()),
        index.clone(),
        Arc::new(RecordingGenerator::replying("unused")),
    );

    // 25 chars with size 5 / overlap 0 → exactly 5 chunks.
    let written =
        pipeline.ingest(&Document::new("doc", "aaaaabbbbbcccccdddddeeeee")).await.unwrap();

    assert_eq!(written, 5);
    assert_eq!(index.upsert_batches(), vec![5]);
}

#[tokio::test]
async fn embedding_failure_mid_batch_leaves_index_untouched() {
    let index = Arc::new(RecordingIndex::empty());
    let pipeline = pipeline(
        Arc::new(StubEmbedder::failing_on(2)),
        index.clone(),
        Arc::new(RecordingGenerator::replying("unused")),
    );

    let err =
        pipeline.ingest(&Document::new("doc", "aaaaabbbbbcccccdddddeeeee")).await.unwrap_err();

    assert!(matches!(err, RagError::Embedding { .. }));
    assert!(index.upsert_batches().is_empty(), "no batch should reach the index");
}

#[tokio::test]
async fn ingest_of_empty_document_writes_nothing() {
    let index = Arc::new(RecordingIndex::empty());
    let pipeline = pipeline(
        Arc::new(StubEmbedder::new()),
        index.clone(),
        Arc::new(RecordingGenerator::replying("unused")),
    );

    let written = pipeline.ingest(&Document::new("doc", "")).await.unwrap();

    assert_eq!(written, 0);
    assert!(index.upsert_batches().is_empty());
}

#[tokio::test]
async fn query_against_empty_index_is_an_explicit_error() {
    let pipeline = pipeline(
        Arc::new(StubEmbedder::new()),
        Arc::new(RecordingIndex::empty()),
        Arc::new(RecordingGenerator::replying("unused")),
    );

    let err = pipeline.answer("anything there?").await.unwrap_err();
    assert!(matches!(err, RagError::IndexQuery { .. }));
}

#[tokio::test]
async fn answer_feeds_assembled_context_and_question_to_the_generator() {
    let generator = Arc::new(RecordingGenerator::replying("the answer"));
    let pipeline = pipeline(
        Arc::new(StubEmbedder::new()),
        Arc::new(RecordingIndex::with_results(vec![scored("alpha", 0.9), scored("beta", 0.5)])),
        generator.clone(),
    );

    let answer = pipeline.answer("which greek letters?").await.unwrap();

    assert_eq!(answer, "the answer");
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("alpha\n\nbeta"), "context block should keep ranked order");
    assert!(prompts[0].contains("Question: which greek letters?"));
}

#[tokio::test]
async fn unanswerable_context_reaches_the_generator_verbatim() {
    // The index only knows unrelated facts; the default template instructs
    // the model to admit not knowing rather than fabricate.
    let generator = Arc::new(RecordingGenerator::replying("I don't know, thanks for asking!"));
    let pipeline = pipeline(
        Arc::new(StubEmbedder::new()),
        Arc::new(RecordingIndex::with_results(vec![scored("the sky is blue today", 0.1)])),
        generator.clone(),
    );

    let answer = pipeline.answer("who won the 1966 world cup?").await.unwrap();

    assert_eq!(answer, "I don't know, thanks for asking!");
    let prompts = generator.prompts();
    assert!(prompts[0].contains("the sky is blue today"));
    assert!(prompts[0].contains("don't try to make up an answer"));
}

#[tokio::test]
async fn retrieve_honors_configured_top_k() {
    let results: Vec<ScoredChunk> =
        (0..10).map(|i| scored(&format!("chunk{i}"), 1.0 - i as f32 * 0.05)).collect();
    let config =
        RagConfig::builder().chunk_size(5).chunk_overlap(0).separator("\n").top_k(3).build().unwrap();
    let pipeline = RagPipeline::builder()
        .config(config.clone())
        .chunker(Arc::new(CharacterChunker::from_config(&config).unwrap()))
        .embedder(Arc::new(StubEmbedder::new()))
        .index(Arc::new(RecordingIndex::with_results(results)))
        .generator(Arc::new(RecordingGenerator::replying("unused")))
        .build()
        .unwrap();

    let ranked = pipeline.retrieve("query").await.unwrap();
    assert_eq!(ranked.len(), 3);
}

#[test]
fn builder_rejects_missing_parts() {
    let config = RagConfig::default();
    let err = RagPipeline::builder()
        .config(config.clone())
        .chunker(Arc::new(CharacterChunker::from_config(&config).unwrap()))
        .embedder(Arc::new(StubEmbedder::new()))
        .index(Arc::new(RecordingIndex::empty()))
        .build()
        .unwrap_err();
    assert!(matches!(err, RagError::Config(_)));
}
