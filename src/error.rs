//! Error taxonomy for the retrieval-augmented chat pipeline.
//!
//! The variants map to how the pipeline reacts to each failure class:
//!
//! - [`RagError::Configuration`] is fatal and raised before any backend call.
//! - [`RagError::Embedding`] and [`RagError::DimensionMismatch`] are fatal
//!   for ingestion; at query time the orchestrator degrades to a
//!   context-free answer instead.
//! - [`RagError::Retrieval`] is recovered by the orchestrator: it logs a
//!   warning and answers without grounding context.
//! - [`RagError::Indexing`] names the document whose bulk write failed;
//!   previously ingested documents are unaffected.
//! - [`RagError::Generation`] is surfaced through the token stream, after
//!   any fragments that were already produced.

use thiserror::Error;

/// Errors produced by the chunking, embedding, retrieval, and generation
/// stages of the pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RagError {
    /// Invalid configuration (chunk/overlap arithmetic, embedding
    /// dimension, sampling temperature). Always raised before any
    /// backend is contacted.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Description of the rejected setting.
        message: String,
    },

    /// The embedding provider failed to produce vectors.
    #[error("embedding failed: {message}")]
    Embedding {
        /// Description of the provider failure.
        message: String,
    },

    /// An embedding vector did not match the configured dimension.
    ///
    /// The dimension is fixed process-wide and must match the vector field
    /// of the search index, so a mismatch is never recoverable.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension configured for the index.
        expected: usize,
        /// Dimension actually returned by the provider.
        actual: usize,
    },

    /// The search backend was unreachable or returned a malformed response.
    #[error("retrieval failed: {message}")]
    Retrieval {
        /// Description of the backend failure.
        message: String,
    },

    /// A bulk index write failed for a specific document.
    #[error("indexing '{document}' failed: {message}")]
    Indexing {
        /// Name of the document that could not be indexed.
        document: String,
        /// Description of the write failure.
        message: String,
    },

    /// The generation backend failed at start or mid-stream.
    #[error("generation failed: {message}")]
    Generation {
        /// Description of the generation failure.
        message: String,
    },
}

impl RagError {
    /// Construct a [`RagError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        RagError::Configuration {
            message: message.into(),
        }
    }

    /// Construct a [`RagError::Embedding`].
    pub fn embedding(message: impl Into<String>) -> Self {
        RagError::Embedding {
            message: message.into(),
        }
    }

    /// Construct a [`RagError::Retrieval`].
    pub fn retrieval(message: impl Into<String>) -> Self {
        RagError::Retrieval {
            message: message.into(),
        }
    }

    /// Construct a [`RagError::Indexing`] for a named document.
    pub fn indexing(document: impl Into<String>, message: impl Into<String>) -> Self {
        RagError::Indexing {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Construct a [`RagError::Generation`].
    pub fn generation(message: impl Into<String>) -> Self {
        RagError::Generation {
            message: message.into(),
        }
    }
}
