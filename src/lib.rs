//! # ragchat: Retrieval-Augmented Chat Pipeline
//!
//! `ragchat` turns extracted document text into a hybrid (lexical + vector)
//! search index and answers questions grounded in it, streaming the
//! response fragment by fragment.
//!
//! ```text
//! Ingest path:
//!   raw text ──► chunking::chunk_text ──► embeddings::EmbeddingProvider
//!                                               │
//!                                               ▼
//!                              search::SearchBackend::bulk_index
//!
//! Answer path:
//!   query ──► [embeddings] ──► search::SearchBackend::hybrid_search
//!                                               │
//!   history ──► prompt::build_prompt ◄──────────┘
//!                       │
//!                       ▼
//!        generation::ChatModel::stream_chat ──► TokenStream ──► caller
//! ```
//!
//! ## Core pieces
//!
//! - [`chunking`]: OCR-artifact normalization and overlapping word-window
//!   chunking.
//! - [`embeddings`]: the [`embeddings::EmbeddingProvider`] seam, passage
//!   prefixing for asymmetric models, and an Ollama-backed provider.
//! - [`search`]: the [`search::SearchBackend`] seam and an
//!   OpenSearch-compatible hybrid (BM25 + k-NN) client.
//! - [`prompt`]: context assembly with a bounded conversation history.
//! - [`generation`]: the [`generation::ChatModel`] seam and a streaming
//!   Ollama chat client; cancellation is dropping the stream.
//! - [`pipeline`]: the [`pipeline::RagPipeline`] orchestrator exposing
//!   `ingest_document` and `answer`.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use futures_util::StreamExt;
//! use ragchat::config::RagConfig;
//! use ragchat::embeddings::OllamaEmbeddings;
//! use ragchat::generation::OllamaChat;
//! use ragchat::pipeline::{AnswerRequest, RagPipeline};
//! use ragchat::search::OpenSearchBackend;
//!
//! # async fn run() -> Result<(), ragchat::error::RagError> {
//! let config = RagConfig::default();
//! let http = reqwest::Client::new();
//!
//! let pipeline = RagPipeline::builder(config.clone())
//!     .with_embedder(Arc::new(OllamaEmbeddings::new(
//!         http.clone(),
//!         &config.ollama_url,
//!         &config.embedding_model,
//!         config.embedding_dimension,
//!     )?))
//!     .with_search_backend(Arc::new(OpenSearchBackend::new(
//!         http.clone(),
//!         &config.search_url,
//!         &config.index,
//!         &config.search_pipeline,
//!     )?))
//!     .with_chat_model(Arc::new(OllamaChat::new(
//!         http,
//!         &config.ollama_url,
//!         &config.chat_model,
//!     )?))
//!     .build()?;
//!
//! pipeline.ingest_document("notes.pdf", "alpha beta gamma delta").await?;
//!
//! let mut answer = pipeline.answer(AnswerRequest::new("What is alpha?")).await?;
//! while let Some(fragment) = answer.next().await {
//!     print!("{}", fragment?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chunking;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod message;
pub mod pipeline;
pub mod prompt;
pub mod search;

pub use config::RagConfig;
pub use error::RagError;
pub use message::{ChatMessage, Role};
pub use pipeline::{AnswerRequest, IngestReport, RagPipeline};
