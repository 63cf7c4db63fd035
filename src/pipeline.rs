//! Pipeline orchestration: the `ingest` and `answer` operations.
//!
//! [`RagPipeline`] wires the chunker, embedding provider, search backend,
//! and chat model together behind two operations:
//!
//! - [`RagPipeline::ingest_document`]: chunk → embed → bulk index.
//! - [`RagPipeline::answer`]: optionally retrieve grounding passages, build
//!   the prompt, and hand back the generation stream.
//!
//! Retrieval is best-effort at answer time: if embedding the query or
//! querying the store fails, the pipeline logs a warning and answers
//! without context instead of aborting — the chatbot keeps answering even
//! when the store is down. Ingestion, by contrast, fails loudly and names
//! the document that could not be indexed.

use std::sync::Arc;

use crate::chunking::chunk_text;
use crate::config::RagConfig;
use crate::embeddings::{EmbeddingProvider, ensure_dimensions, passage_prefixed};
use crate::error::RagError;
use crate::generation::{ChatModel, TokenStream};
use crate::message::ChatMessage;
use crate::prompt::build_prompt;
use crate::search::{IndexedDocument, SearchBackend};

/// One answer request, as supplied by the caller (UI layer).
///
/// History is passed by value per call and never mutated by the pipeline.
#[derive(Clone, Debug)]
pub struct AnswerRequest {
    /// The user's question.
    pub query: String,
    /// Whether to ground the answer in retrieved passages.
    pub use_retrieval: bool,
    /// Maximum number of passages to retrieve.
    pub top_k: usize,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Conversation so far; only the trailing window is read.
    pub history: Vec<ChatMessage>,
}

impl AnswerRequest {
    /// Creates a request with retrieval enabled, `top_k = 5`, and
    /// `temperature = 0.7`.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            use_retrieval: true,
            top_k: 5,
            temperature: 0.7,
            history: Vec::new(),
        }
    }

    /// Toggles retrieval.
    #[must_use]
    pub fn with_retrieval(mut self, use_retrieval: bool) -> Self {
        self.use_retrieval = use_retrieval;
        self
    }

    /// Sets the number of passages to retrieve.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Supplies the conversation history.
    #[must_use]
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }
}

/// Outcome of ingesting one document.
#[derive(Clone, Debug)]
pub struct IngestReport {
    /// Name of the ingested document.
    pub document_name: String,
    /// Chunks written to the index.
    pub chunks_indexed: usize,
    /// Empty chunks skipped before embedding.
    pub chunks_skipped: usize,
    /// Per-chunk indexing failures reported by the backend.
    pub errors: Vec<String>,
}

/// The retrieval-augmented generation pipeline.
///
/// Holds shared, long-lived handles to the embedding provider, search
/// backend, and chat model; all are stateless per call, so one pipeline
/// serves any number of concurrent sessions.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use ragchat::config::RagConfig;
/// use ragchat::embeddings::MockEmbeddingProvider;
/// # use ragchat::pipeline::RagPipeline;
/// # fn collaborators() -> (Arc<dyn ragchat::search::SearchBackend>, Arc<dyn ragchat::generation::ChatModel>) { unimplemented!() }
///
/// # fn main() -> Result<(), ragchat::error::RagError> {
/// let (search, chat) = collaborators();
/// let pipeline = RagPipeline::builder(RagConfig::default())
///     .with_embedder(Arc::new(MockEmbeddingProvider::new(768)))
///     .with_search_backend(search)
///     .with_chat_model(chat)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct RagPipeline {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    search: Arc<dyn SearchBackend>,
    chat: Arc<dyn ChatModel>,
}

/// Builder for [`RagPipeline`]; validates the configuration at `build`.
pub struct RagPipelineBuilder {
    config: RagConfig,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    search: Option<Arc<dyn SearchBackend>>,
    chat: Option<Arc<dyn ChatModel>>,
}

impl RagPipelineBuilder {
    /// Supplies the embedding provider.
    #[must_use]
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Supplies the search backend.
    #[must_use]
    pub fn with_search_backend(mut self, search: Arc<dyn SearchBackend>) -> Self {
        self.search = Some(search);
        self
    }

    /// Supplies the chat model.
    #[must_use]
    pub fn with_chat_model(mut self, chat: Arc<dyn ChatModel>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Validates the configuration and assembles the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Configuration`] when the config is invalid, a
    /// collaborator is missing, or the embedder's dimension disagrees with
    /// the configured one.
    pub fn build(self) -> Result<RagPipeline, RagError> {
        self.config.validate()?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::configuration("missing embedding provider"))?;
        let search = self
            .search
            .ok_or_else(|| RagError::configuration("missing search backend"))?;
        let chat = self
            .chat
            .ok_or_else(|| RagError::configuration("missing chat model"))?;

        if embedder.dimension() != self.config.embedding_dimension {
            return Err(RagError::configuration(format!(
                "embedder dimension ({}) does not match configured dimension ({})",
                embedder.dimension(),
                self.config.embedding_dimension
            )));
        }

        Ok(RagPipeline {
            config: self.config,
            embedder,
            search,
            chat,
        })
    }
}

impl RagPipeline {
    /// Starts building a pipeline around `config`.
    #[must_use]
    pub fn builder(config: RagConfig) -> RagPipelineBuilder {
        RagPipelineBuilder {
            config,
            embedder: None,
            search: None,
            chat: None,
        }
    }

    /// The configuration this pipeline was built with.
    #[must_use]
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Chunks, embeds, and bulk-indexes one document's text.
    ///
    /// Empty chunks (a degenerate artifact of empty or whitespace-only
    /// documents) are skipped; chunk ids keep their original position so
    /// `doc_id` stays stable. A failure names this document and leaves
    /// previously ingested documents intact.
    ///
    /// # Errors
    ///
    /// [`RagError::Configuration`] for invalid chunking settings,
    /// [`RagError::Embedding`] / [`RagError::DimensionMismatch`] when the
    /// provider fails, and [`RagError::Indexing`] when the bulk write
    /// cannot be issued.
    pub async fn ingest_document(
        &self,
        document_name: &str,
        raw_text: &str,
    ) -> Result<IngestReport, RagError> {
        let chunks = chunk_text(raw_text, self.config.chunk_size, self.config.chunk_overlap)?;
        let total = chunks.len();

        let retained: Vec<(usize, String)> = chunks
            .into_iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(idx, chunk)| {
                (
                    idx,
                    passage_prefixed(self.config.asymmetric_embedding, &chunk),
                )
            })
            .collect();
        let skipped = total - retained.len();

        if retained.is_empty() {
            tracing::warn!(document_name, "document produced no indexable chunks");
            return Ok(IngestReport {
                document_name: document_name.to_string(),
                chunks_indexed: 0,
                chunks_skipped: skipped,
                errors: Vec::new(),
            });
        }

        let texts: Vec<String> = retained.iter().map(|(_, text)| text.clone()).collect();
        let embeddings = self.embedder.embed(&texts).await?;
        ensure_dimensions(&embeddings, self.config.embedding_dimension)?;

        let documents: Vec<IndexedDocument> = retained
            .into_iter()
            .zip(embeddings)
            .map(|((idx, text), embedding)| IndexedDocument {
                doc_id: format!("{document_name}_{idx}"),
                text,
                embedding,
                document_name: document_name.to_string(),
            })
            .collect();

        let report = self
            .search
            .bulk_index(documents)
            .await
            .map_err(|err| RagError::indexing(document_name, err.to_string()))?;

        if !report.errors.is_empty() {
            tracing::warn!(
                document_name,
                failed = report.errors.len(),
                "some chunks were rejected by the index"
            );
        }
        tracing::info!(
            document_name,
            chunks_indexed = report.indexed,
            chunks_skipped = skipped,
            "document ingested"
        );

        Ok(IngestReport {
            document_name: document_name.to_string(),
            chunks_indexed: report.indexed,
            chunks_skipped: skipped,
            errors: report.errors,
        })
    }

    /// Removes every chunk of `document_name` from the index.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Retrieval`] when the backend call fails.
    pub async fn delete_document(&self, document_name: &str) -> Result<u64, RagError> {
        self.search.delete_by_document(document_name).await
    }

    /// Lists the distinct document names currently indexed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Retrieval`] when the backend call fails.
    pub async fn document_names(&self) -> Result<Vec<String>, RagError> {
        self.search.document_names().await
    }

    /// Answers a query, returning the generation fragment stream.
    ///
    /// When retrieval is enabled the query is embedded (passage-prefixed
    /// if asymmetric embedding is configured) and the hybrid store is
    /// queried for `top_k` passages; a failure in either step degrades to
    /// an empty context with a warning rather than failing the answer.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Configuration`] for an out-of-range temperature
    /// and [`RagError::Generation`] when the backend rejects the request.
    pub async fn answer(&self, request: AnswerRequest) -> Result<TokenStream, RagError> {
        if !(0.0..=1.0).contains(&request.temperature) {
            return Err(RagError::configuration(format!(
                "temperature ({}) must be within [0, 1]",
                request.temperature
            )));
        }

        let passages = if request.use_retrieval {
            match self.retrieve_passages(&request.query, request.top_k).await {
                Ok(passages) => passages,
                Err(err) => {
                    tracing::warn!(error = %err, "retrieval failed, answering without context");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let prompt = build_prompt(&request.query, &passages, &request.history);
        tracing::debug!(
            passages = passages.len(),
            history = request.history.len(),
            "prompt constructed"
        );

        self.chat.stream_chat(&prompt, request.temperature).await
    }

    async fn retrieve_passages(&self, query: &str, top_k: usize) -> Result<Vec<String>, RagError> {
        let search_text = passage_prefixed(self.config.asymmetric_embedding, query);
        let vectors = self.embedder.embed(std::slice::from_ref(&search_text)).await?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| RagError::embedding("provider returned no vector for the query"))?;

        let results = self.search.hybrid_search(query, &vector, top_k).await?;
        tracing::info!(results = results.len(), top_k, "hybrid search completed");

        Ok(results.into_iter().map(|result| result.text).collect())
    }
}
