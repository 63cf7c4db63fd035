//! Index plain-text files into the hybrid search store.
//!
//! Each argument is a path; the file's contents are chunked, embedded, and
//! bulk-indexed under its file name. With no arguments, prints the
//! documents currently in the index.
//!
//! Running this demo (Ollama and OpenSearch must be up):
//! ```bash
//! cargo run --example ingest -- notes.txt report.txt
//! ```

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ragchat::config::RagConfig;
use ragchat::embeddings::OllamaEmbeddings;
use ragchat::generation::OllamaChat;
use ragchat::pipeline::RagPipeline;
use ragchat::search::OpenSearchBackend;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = RagConfig::default();
    let http = reqwest::Client::new();

    let pipeline = RagPipeline::builder(config.clone())
        .with_embedder(Arc::new(OllamaEmbeddings::new(
            http.clone(),
            &config.ollama_url,
            &config.embedding_model,
            config.embedding_dimension,
        )?))
        .with_search_backend(Arc::new(OpenSearchBackend::new(
            http.clone(),
            &config.search_url,
            &config.index,
            &config.search_pipeline,
        )?))
        .with_chat_model(Arc::new(OllamaChat::new(
            http,
            &config.ollama_url,
            &config.chat_model,
        )?))
        .build()?;

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        let names = pipeline.document_names().await?;
        if names.is_empty() {
            println!("index '{}' is empty", config.index);
        } else {
            println!("documents in '{}':", config.index);
            for name in names {
                println!("  {name}");
            }
        }
        return Ok(());
    }

    for path in &paths {
        let name = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path.as_str());
        let text = std::fs::read_to_string(path)?;

        let report = pipeline.ingest_document(name, &text).await?;
        println!(
            "{name}: {} chunks indexed, {} skipped",
            report.chunks_indexed, report.chunks_skipped
        );
        for error in &report.errors {
            eprintln!("  rejected: {error}");
        }
    }

    Ok(())
}
