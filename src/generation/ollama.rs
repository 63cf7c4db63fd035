//! Ollama chat client with incremental NDJSON streaming.

use async_stream::try_stream;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RagError;

use super::{ChatModel, TokenStream};

/// Chat client speaking Ollama's `/api/chat` streaming protocol.
///
/// Each response line is a JSON object carrying one `message.content`
/// fragment; the final line sets `done: true`. The body is consumed
/// incrementally, so fragments reach the caller as the backend emits them,
/// and dropping the returned stream closes the connection, which aborts
/// the backend-side generation job.
#[derive(Clone, Debug)]
pub struct OllamaChat {
    client: Client,
    base_url: Url,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatStreamChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ChunkMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaChat {
    /// Creates a chat client for `model` served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Configuration`] when `base_url` is not a valid URL.
    pub fn new(client: Client, base_url: &str, model: impl Into<String>) -> Result<Self, RagError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            RagError::configuration(format!("invalid generation base URL '{base_url}': {err}"))
        })?;
        Ok(Self {
            client,
            base_url,
            model: model.into(),
        })
    }

    /// The model this client generates with.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, path: &str) -> Result<Url, RagError> {
        self.base_url
            .join(path)
            .map_err(|err| RagError::generation(format!("invalid endpoint path '{path}': {err}")))
    }

    async fn model_present(&self) -> Result<bool, RagError> {
        let response = self
            .client
            .get(self.endpoint("api/tags")?)
            .send()
            .await
            .map_err(|err| RagError::generation(format!("tags request failed: {err}")))?
            .error_for_status()
            .map_err(|err| RagError::generation(format!("tags request rejected: {err}")))?;

        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|err| RagError::generation(format!("malformed tags response: {err}")))?;

        Ok(parsed.models.iter().any(|tag| tag.name == self.model))
    }

    async fn pull_model(&self) -> Result<(), RagError> {
        let body = serde_json::json!({"model": self.model, "stream": false});
        self.client
            .post(self.endpoint("api/pull")?)
            .json(&body)
            .send()
            .await
            .map_err(|err| RagError::generation(format!("pull request failed: {err}")))?
            .error_for_status()
            .map_err(|err| RagError::generation(format!("pull request rejected: {err}")))?;
        Ok(())
    }
}

#[async_trait]
impl ChatModel for OllamaChat {
    async fn stream_chat(&self, prompt: &str, temperature: f32) -> Result<TokenStream, RagError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
            stream: true,
            options: ChatOptions { temperature },
        };

        let response = self
            .client
            .post(self.endpoint("api/chat")?)
            .json(&request)
            .send()
            .await
            .map_err(|err| RagError::generation(format!("chat request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::generation(format!(
                "generation backend returned {status}: {body}"
            )));
        }

        tracing::info!(model = %self.model, "response stream initiated");

        let mut body = response.bytes_stream();
        let stream = try_stream! {
            let mut buffer: Vec<u8> = Vec::new();
            let mut done = false;

            while !done {
                let Some(chunk) = body.next().await else { break };
                let chunk = chunk
                    .map_err(|err| RagError::generation(format!("stream interrupted: {err}")))?;
                buffer.extend_from_slice(&chunk);

                while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = &line[..line.len() - 1];
                    if line.is_empty() {
                        continue;
                    }

                    let parsed: ChatStreamChunk = serde_json::from_slice(line).map_err(|err| {
                        RagError::generation(format!("malformed stream chunk: {err}"))
                    })?;

                    if let Some(error) = parsed.error {
                        Err(RagError::generation(error))?;
                    }
                    if let Some(message) = parsed.message
                        && !message.content.is_empty()
                    {
                        yield message.content;
                    }
                    if parsed.done {
                        done = true;
                        break;
                    }
                }
            }
        };

        Ok(stream.boxed())
    }

    async fn ensure_available(&self) -> bool {
        match self.model_present().await {
            Ok(true) => {
                tracing::info!(model = %self.model, "model already available locally");
                true
            }
            Ok(false) => {
                tracing::info!(model = %self.model, "model not found locally, pulling");
                match self.pull_model().await {
                    Ok(()) => {
                        tracing::info!(model = %self.model, "model pulled and ready");
                        true
                    }
                    Err(err) => {
                        tracing::error!(model = %self.model, error = %err, "failed to pull model");
                        false
                    }
                }
            }
            Err(err) => {
                tracing::error!(model = %self.model, error = %err, "failed to check model availability");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_base_url_is_a_configuration_error() {
        let err = OllamaChat::new(Client::new(), "not a url", "llama3.2:1b").unwrap_err();
        assert!(matches!(err, RagError::Configuration { .. }));
    }

    #[test]
    fn stream_chunks_parse_fragments_and_done_marker() {
        let chunk: ChatStreamChunk =
            serde_json::from_str(r#"{"message":{"role":"assistant","content":"Hel"},"done":false}"#)
                .unwrap();
        assert_eq!(chunk.message.unwrap().content, "Hel");
        assert!(!chunk.done);

        let last: ChatStreamChunk =
            serde_json::from_str(r#"{"message":{"role":"assistant","content":""},"done":true}"#)
                .unwrap();
        assert!(last.done);
    }
}
