//! Ollama-backed embedding provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RagError;

use super::EmbeddingProvider;

/// Embedding provider speaking Ollama's `/api/embed` protocol.
///
/// Holds a shared [`reqwest::Client`]; the struct is cheap to clone and
/// safe for concurrent use, so one instance serves the whole process.
#[derive(Clone, Debug)]
pub struct OllamaEmbeddings {
    client: Client,
    endpoint: Url,
    model: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbeddings {
    /// Creates a provider for `model` served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Configuration`] when `base_url` is not a valid URL.
    pub fn new(
        client: Client,
        base_url: &str,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, RagError> {
        let endpoint = Url::parse(base_url)
            .and_then(|url| url.join("api/embed"))
            .map_err(|err| {
                RagError::configuration(format!("invalid embedding base URL '{base_url}': {err}"))
            })?;
        Ok(Self {
            client,
            endpoint,
            model: model.into(),
            dimension,
        })
    }

    /// The model this provider embeds with.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddings {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| RagError::embedding(format!("embedding request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::embedding(format!(
                "embedding backend returned {status}: {body}"
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|err| RagError::embedding(format!("malformed embedding response: {err}")))?;

        if parsed.embeddings.len() != texts.len() {
            return Err(RagError::embedding(format!(
                "expected {} embeddings, backend returned {}",
                texts.len(),
                parsed.embeddings.len()
            )));
        }

        tracing::debug!(
            model = %self.model,
            count = parsed.embeddings.len(),
            "generated embeddings"
        );
        Ok(parsed.embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_from_base_url() {
        let provider =
            OllamaEmbeddings::new(Client::new(), "http://localhost:11434", "nomic-embed-text", 768)
                .unwrap();
        assert_eq!(provider.endpoint.as_str(), "http://localhost:11434/api/embed");
        assert_eq!(provider.dimension(), 768);
    }

    #[test]
    fn invalid_base_url_is_a_configuration_error() {
        let err = OllamaEmbeddings::new(Client::new(), "not a url", "m", 8).unwrap_err();
        assert!(matches!(err, RagError::Configuration { .. }));
    }
}
