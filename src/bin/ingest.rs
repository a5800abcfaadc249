//! Ingest a plain-text file into the hosted Pinecone index.
//!
//! Requires: `PINECONE_API_KEY` and `INDEX_NAME` environment variables (a
//! local `.env` file is honored), and an Ollama server for embeddings.
//!
//! Run: `cargo run --bin ingest -- path/to/document.txt`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use tracing_subscriber::EnvFilter;

use ragline::{
    CharacterChunker, OllamaEmbedder, OllamaGenerator, PineconeIndex, RagConfig, RagPipeline,
    Settings, TextLoader,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        bail!("usage: ingest <path-to-text-file>");
    };

    let settings = Settings::from_env()?;

    let config = RagConfig::builder()
        .chunk_size(1000)
        .chunk_overlap(0)
        .separator("\n\n")
        .build()?;

    println!("Connecting to index '{}'...", settings.index_name);
    let index = PineconeIndex::connect(&settings.pinecone_api_key, &settings.index_name).await?;

    let pipeline = RagPipeline::builder()
        .config(config.clone())
        .chunker(Arc::new(CharacterChunker::from_config(&config)?))
        .embedder(Arc::new(OllamaEmbedder::new(&settings.ollama_base_url, &settings.embed_model)))
        .index(Arc::new(index))
        .generator(Arc::new(OllamaGenerator::new(
            &settings.ollama_base_url,
            &settings.chat_model,
        )))
        .build()?;

    println!("Ingesting {}...", path.display());
    let written = pipeline.ingest_path(&TextLoader::default(), &path).await?;
    println!("Finished: wrote {written} chunks.");

    Ok(())
}
