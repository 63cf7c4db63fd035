//! Hybrid search backend seam.
//!
//! [`SearchBackend`] abstracts the document/vector store the pipeline
//! writes chunks into and retrieves grounding passages from. The index
//! schema (field names `text`, `embedding`, `document_name`, and the
//! vector dimensionality) is a fixed external contract; implementations
//! construct documents and queries that match it exactly.
//!
//! The production implementation is [`opensearch::OpenSearchBackend`];
//! tests substitute scripted backends through the same trait.

pub mod opensearch;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RagError;

pub use opensearch::OpenSearchBackend;

/// A chunk document as written to the search index.
///
/// Owned by the backend once written; the pipeline does not retain it
/// after ingestion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Unique per chunk: `"{document_name}_{chunk_index}"`.
    pub doc_id: String,
    /// Chunk text (passage-prefixed when asymmetric embedding is enabled).
    pub text: String,
    /// Embedding of `text`, matching the index's vector dimension.
    pub embedding: Vec<f32>,
    /// Name of the source document the chunk came from.
    pub document_name: String,
}

/// One ranked hit from a hybrid search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Stored chunk text.
    pub text: String,
    /// Backend-fused relevance score; higher is more relevant.
    pub score: f32,
    /// Source document name, when the backend returns it.
    pub document_name: Option<String>,
}

/// Outcome of a bulk index write.
#[derive(Clone, Debug, Default)]
pub struct BulkReport {
    /// Number of documents successfully indexed.
    pub indexed: usize,
    /// Per-item failures, each naming the rejected doc id.
    pub errors: Vec<String>,
}

/// Store operations the pipeline depends on.
///
/// Implementations are long-lived, stateless per call, and safe for
/// concurrent use.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Writes chunk documents in one bulk request.
    ///
    /// Per-item rejections are reported in the [`BulkReport`] rather than
    /// failing the whole batch.
    async fn bulk_index(&self, documents: Vec<IndexedDocument>) -> Result<BulkReport, RagError>;

    /// Deletes every chunk belonging to `document_name`, returning the
    /// number of deleted documents.
    async fn delete_by_document(&self, document_name: &str) -> Result<u64, RagError>;

    /// Lists the distinct document names currently indexed.
    async fn document_names(&self) -> Result<Vec<String>, RagError>;

    /// Runs one combined lexical + k-NN query, returning at most `top_k`
    /// results in backend-fused descending rank order.
    ///
    /// The embedding field is excluded from returned payloads.
    async fn hybrid_search(
        &self,
        query_text: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RagError>;
}
