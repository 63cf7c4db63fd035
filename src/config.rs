//! Pipeline configuration.
//!
//! [`RagConfig`] gathers the knobs shared across the chunking, embedding,
//! retrieval, and generation stages. Defaults mirror a local single-node
//! deployment: OpenSearch on `localhost:9200`, Ollama on `localhost:11434`.
//!
//! Validation happens once, up front: an invalid combination (for example
//! an overlap as large as the chunk size, which would keep the chunker from
//! ever advancing) is rejected with [`RagError::Configuration`] before any
//! backend is contacted.

use serde::{Deserialize, Serialize};

use crate::error::RagError;

/// Settings for the retrieval-augmented chat pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RagConfig {
    /// Embedding model identifier passed to the embedding provider.
    pub embedding_model: String,
    /// Fixed dimensionality of every embedding vector. Must match the
    /// vector field of the search index exactly.
    pub embedding_dimension: usize,
    /// Whether to embed with the asymmetric `"passage: "` prefix. When
    /// enabled, the same prefix is applied to chunk text at ingestion and
    /// to query text at answer time so both live in one semantic space.
    pub asymmetric_embedding: bool,
    /// Maximum number of word tokens per chunk.
    pub chunk_size: usize,
    /// Word tokens shared between consecutive chunks. Strictly less than
    /// `chunk_size`.
    pub chunk_overlap: usize,
    /// Generation model name (checked/pulled via the backend's
    /// availability call).
    pub chat_model: String,
    /// Base URL of the search backend.
    pub search_url: String,
    /// Index that holds chunk documents.
    pub index: String,
    /// Search pipeline that fuses the lexical and k-NN signals. Backend
    /// policy; the pipeline only names it.
    pub search_pipeline: String,
    /// Base URL of the embedding/generation backend.
    pub ollama_url: String,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            embedding_model: "nomic-embed-text".to_string(),
            embedding_dimension: 768,
            asymmetric_embedding: false,
            chunk_size: 300,
            chunk_overlap: 100,
            chat_model: "llama3.2:1b".to_string(),
            search_url: "http://localhost:9200".to_string(),
            index: "documents".to_string(),
            search_pipeline: "nlp-search-pipeline".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
        }
    }
}

impl RagConfig {
    /// Checks the invariants the pipeline depends on.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Configuration`] when `chunk_size` is zero, the
    /// overlap is not strictly smaller than the chunk size, or the
    /// embedding dimension is zero.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.chunk_size == 0 {
            return Err(RagError::configuration("chunk_size must be greater than 0"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.embedding_dimension == 0 {
            return Err(RagError::configuration(
                "embedding_dimension must be greater than 0",
            ));
        }
        Ok(())
    }
}
