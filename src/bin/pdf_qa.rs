//! End-to-end PDF flow against a local disk-persisted index.
//!
//! Ingests a PDF into a fresh local index, persists it to a directory,
//! reopens the snapshot, and answers a question against it — the full
//! round trip without any hosted index.
//!
//! Requires: an Ollama server for embeddings and generation. `OLLAMA_BASE_URL`,
//! `EMBED_MODEL`, and `CHAT_MODEL` are read from the environment with local
//! defaults.
//!
//! Run: `cargo run --bin pdf_qa -- paper.pdf "give me the gist in 3 sentences"`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use tracing_subscriber::EnvFilter;

use ragline::{
    CharacterChunker, LocalIndex, OllamaEmbedder, OllamaGenerator, PdfLoader, RagConfig,
    RagPipeline,
};

/// Directory the index snapshot is written to.
const INDEX_DIR: &str = "ragline_index";

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: pdf_qa <path-to-pdf> [question]");
    };
    let question =
        args.next().unwrap_or_else(|| "Give me the gist of this paper in 3 sentences".to_string());

    let base_url = env_or("OLLAMA_BASE_URL", "http://localhost:11434");
    let embed_model = env_or("EMBED_MODEL", "nomic-embed-text:latest");
    let chat_model = env_or("CHAT_MODEL", "gemma3:1b");

    let config = RagConfig::builder()
        .chunk_size(1000)
        .chunk_overlap(30)
        .separator("\n")
        .build()?;
    let embedder = Arc::new(OllamaEmbedder::new(&base_url, &embed_model));

    // Ingest into a fresh index and snapshot it.
    let index = Arc::new(LocalIndex::new());
    let pipeline = RagPipeline::builder()
        .config(config.clone())
        .chunker(Arc::new(CharacterChunker::from_config(&config)?))
        .embedder(embedder.clone())
        .index(index.clone())
        .generator(Arc::new(OllamaGenerator::new(&base_url, &chat_model)))
        .build()?;

    println!("Ingesting {}...", path.display());
    let written = pipeline.ingest_path(&PdfLoader::new(), &path).await?;
    println!("Created {written} chunks.");

    index.persist(INDEX_DIR).await?;
    println!("Persisted index to {INDEX_DIR}/.");

    // Reopen the snapshot and answer against it.
    let reopened = LocalIndex::open(INDEX_DIR).await?;
    let pipeline = RagPipeline::builder()
        .config(config.clone())
        .chunker(Arc::new(CharacterChunker::from_config(&config)?))
        .embedder(embedder)
        .index(Arc::new(reopened))
        .generator(Arc::new(OllamaGenerator::new(&base_url, &chat_model)))
        .build()?;

    let answer = pipeline.answer(&question).await?;
    println!("{answer}");

    Ok(())
}
