//! Interactive terminal chat against a live Ollama + OpenSearch pair.
//!
//! Reads questions from stdin, retrieves context from the configured index,
//! and prints the answer fragment by fragment as it streams in. An empty
//! line exits.
//!
//! Running this demo (both services must be up):
//! ```bash
//! cargo run --example chat
//! ```

use std::error::Error;
use std::io::Write as _;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use ragchat::config::RagConfig;
use ragchat::embeddings::OllamaEmbeddings;
use ragchat::generation::{ChatModel, OllamaChat};
use ragchat::message::ChatMessage;
use ragchat::pipeline::{AnswerRequest, RagPipeline};
use ragchat::search::OpenSearchBackend;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let config = RagConfig::default();
    let http = reqwest::Client::new();

    let chat_model = Arc::new(OllamaChat::new(
        http.clone(),
        &config.ollama_url,
        &config.chat_model,
    )?);
    if !chat_model.ensure_available().await {
        eprintln!("chat model '{}' is not available; is Ollama running?", config.chat_model);
        return Ok(());
    }

    let pipeline = RagPipeline::builder(config.clone())
        .with_embedder(Arc::new(OllamaEmbeddings::new(
            http.clone(),
            &config.ollama_url,
            &config.embedding_model,
            config.embedding_dimension,
        )?))
        .with_search_backend(Arc::new(OpenSearchBackend::new(
            http,
            &config.search_url,
            &config.index,
            &config.search_pipeline,
        )?))
        .with_chat_model(chat_model)
        .build()?;

    println!("ragchat demo — ask a question (empty line to quit)\n");

    let mut history: Vec<ChatMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else { break };
        let query = line.trim().to_string();
        if query.is_empty() {
            break;
        }

        let request = AnswerRequest::new(&query).with_history(history.clone());
        let mut stream = pipeline.answer(request).await?;

        print!("bot> ");
        let mut answer = String::new();
        while let Some(fragment) = stream.next().await {
            match fragment {
                Ok(text) => {
                    print!("{text}");
                    std::io::stdout().flush()?;
                    answer.push_str(&text);
                }
                Err(err) => {
                    eprintln!("\n[generation failed: {err}]");
                    break;
                }
            }
        }
        println!("\n");

        history.push(ChatMessage::user(&query));
        history.push(ChatMessage::assistant(&answer));
    }

    Ok(())
}
