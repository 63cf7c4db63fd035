//! Deterministic in-process embedding provider for tests and demos.

use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use crate::error::RagError;

use super::EmbeddingProvider;

/// Embedding provider that derives vectors from a hash of the input text.
///
/// Deterministic (the same text always maps to the same vector) and
/// dimension-exact for every input including the empty string, which makes
/// it suitable for CI where no model server is available. The vectors
/// carry no semantic meaning.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimension: usize,
}

impl MockEmbeddingProvider {
    /// Creates a provider emitting vectors of `dimension` components.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        (0..self.dimension)
            .map(|_| {
                // xorshift over the seed keeps components varied but reproducible.
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                ((state % 2000) as f32 / 1000.0) - 1.0
            })
            .collect()
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(768)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embedding_is_deterministic() {
        let provider = MockEmbeddingProvider::new(16);
        let first = provider.embed(&["same text".to_string()]).await.unwrap();
        let second = provider.embed(&["same text".to_string()]).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn every_vector_matches_dimension_including_empty_input() {
        let provider = MockEmbeddingProvider::new(8);
        let vectors = provider
            .embed(&[String::new(), "word".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert!(vectors.iter().all(|v| v.len() == 8));
    }

    #[tokio::test]
    async fn distinct_texts_map_to_distinct_vectors() {
        let provider = MockEmbeddingProvider::new(8);
        let vectors = provider
            .embed(&["alpha".to_string(), "beta".to_string()])
            .await
            .unwrap();
        assert_ne!(vectors[0], vectors[1]);
    }
}
