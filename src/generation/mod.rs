//! Streamed text generation seam.
//!
//! [`ChatModel`] abstracts the generation backend. Its central contract is
//! [`TokenStream`]: a finite, pull-based stream of incremental text
//! fragments in backend emission order. Fragments are not necessarily
//! whole tokens or words; consumers concatenate them in arrival order.
//! Dropping the stream cancels generation — no fragment is produced after
//! the drop, and the backend-side job is released with the connection.
//!
//! A mid-stream failure surfaces as one final `Err` item after whatever
//! fragments were already yielded: a partial answer is worth more to the
//! user than no answer.

pub mod ollama;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::error::RagError;

pub use ollama::OllamaChat;

/// Incremental generation output: text fragments in arrival order,
/// terminated either by stream end or by a single [`RagError::Generation`].
pub type TokenStream = BoxStream<'static, Result<String, RagError>>;

/// A streaming text-generation backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Starts generating from `prompt` at the given sampling `temperature`
    /// (in `[0, 1]`), returning the fragment stream.
    ///
    /// The stream is finite and not restartable; cancellation is dropping it.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Generation`] when the backend rejects the
    /// request outright. Failures after streaming has begun are delivered
    /// through the stream instead.
    async fn stream_chat(&self, prompt: &str, temperature: f32) -> Result<TokenStream, RagError>;

    /// Checks that the configured model is available, pulling it when
    /// missing. Failures are logged and reported as `false`; availability
    /// is a readiness probe, not a pipeline error.
    async fn ensure_available(&self) -> bool;
}
