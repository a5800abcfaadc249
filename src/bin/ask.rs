//! Answer a question against the hosted Pinecone index.
//!
//! Requires: `PINECONE_API_KEY` and `INDEX_NAME` environment variables (a
//! local `.env` file is honored), and an Ollama server for embeddings and
//! generation.
//!
//! Run: `cargo run --bin ask -- "what is a vector index?"`

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ragline::{
    CharacterChunker, OllamaEmbedder, OllamaGenerator, PineconeIndex, RagConfig, RagPipeline,
    Settings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let question = if args.is_empty() {
        "what is Pinecone in machine learning?".to_string()
    } else {
        args.join(" ")
    };

    let settings = Settings::from_env()?;
    let config = RagConfig::default();

    println!("Retrieving...");
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

    let answer = pipeline.answer(&question).await?;
    println!("{answer}");

    Ok(())
}
