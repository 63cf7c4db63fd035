//! Embedding generation.
//!
//! [`EmbeddingProvider`] is the seam between the pipeline and whatever
//! produces vectors: a local model server ([`ollama::OllamaEmbeddings`]) in
//! production, [`mock::MockEmbeddingProvider`] in tests and demos. The
//! provider is a long-lived shared resource — constructed once, safe for
//! concurrent calls, never explicitly torn down.

pub mod mock;
pub mod ollama;

use async_trait::async_trait;

use crate::error::RagError;

pub use mock::MockEmbeddingProvider;
pub use ollama::OllamaEmbeddings;

/// Marker prepended to text when asymmetric embedding is enabled.
///
/// Retrieval-tuned models distinguish stored passages from queries; the
/// same convention must be applied at ingestion and at query time — a
/// mismatch silently degrades retrieval quality rather than erroring.
pub const PASSAGE_PREFIX: &str = "passage: ";

/// Maps text segments to fixed-dimension vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds each input text, returning one vector per input in the same
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] when the underlying model fails.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;

    /// The fixed dimension of every vector this provider produces.
    fn dimension(&self) -> usize;
}

/// Applies the asymmetric passage prefix when `asymmetric` is enabled.
#[must_use]
pub fn passage_prefixed(asymmetric: bool, text: &str) -> String {
    if asymmetric {
        format!("{PASSAGE_PREFIX}{text}")
    } else {
        text.to_string()
    }
}

/// Rejects any vector whose length differs from the configured dimension.
///
/// The dimension is a process-wide invariant shared with the search index,
/// so a mismatch is fatal for ingestion.
pub fn ensure_dimensions(vectors: &[Vec<f32>], expected: usize) -> Result<(), RagError> {
    for vector in vectors {
        if vector.len() != expected {
            return Err(RagError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_applied_only_when_asymmetric() {
        assert_eq!(passage_prefixed(true, "query"), "passage: query");
        assert_eq!(passage_prefixed(false, "query"), "query");
    }

    #[test]
    fn dimension_check_accepts_uniform_vectors() {
        let vectors = vec![vec![0.0; 4], vec![1.0; 4]];
        ensure_dimensions(&vectors, 4).unwrap();
    }

    #[test]
    fn dimension_check_rejects_mismatch() {
        let vectors = vec![vec![0.0; 4], vec![1.0; 3]];
        let err = ensure_dimensions(&vectors, 4).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }
}
