#![allow(dead_code)]

//! Shared fixtures: scripted collaborators for pipeline integration tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_stream::stream;
use async_trait::async_trait;
use futures_util::StreamExt;

use ragchat::embeddings::EmbeddingProvider;
use ragchat::error::RagError;
use ragchat::generation::{ChatModel, TokenStream};
use ragchat::search::{BulkReport, IndexedDocument, SearchBackend, SearchResult};

/// Search backend that replays scripted results and records every call.
pub struct ScriptedSearchBackend {
    /// Results returned by `hybrid_search`, truncated to `top_k`.
    pub results: Vec<SearchResult>,
    /// When set, `hybrid_search` fails with a retrieval error.
    pub fail_search: bool,
    /// Documents received through `bulk_index`.
    pub indexed: Mutex<Vec<IndexedDocument>>,
    /// `(query_text, top_k)` pairs observed by `hybrid_search`.
    pub searches: Mutex<Vec<(String, usize)>>,
}

impl ScriptedSearchBackend {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            fail_search: false,
            indexed: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_search: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn indexed_texts(&self) -> Vec<String> {
        self.indexed
            .lock()
            .unwrap()
            .iter()
            .map(|doc| doc.text.clone())
            .collect()
    }
}

pub fn result(text: &str, score: f32) -> SearchResult {
    SearchResult {
        text: text.to_string(),
        score,
        document_name: None,
    }
}

#[async_trait]
impl SearchBackend for ScriptedSearchBackend {
    async fn bulk_index(&self, documents: Vec<IndexedDocument>) -> Result<BulkReport, RagError> {
        let count = documents.len();
        self.indexed.lock().unwrap().extend(documents);
        Ok(BulkReport {
            indexed: count,
            errors: Vec::new(),
        })
    }

    async fn delete_by_document(&self, document_name: &str) -> Result<u64, RagError> {
        let mut indexed = self.indexed.lock().unwrap();
        let before = indexed.len();
        indexed.retain(|doc| doc.document_name != document_name);
        Ok((before - indexed.len()) as u64)
    }

    async fn document_names(&self) -> Result<Vec<String>, RagError> {
        let mut names: Vec<String> = self
            .indexed
            .lock()
            .unwrap()
            .iter()
            .map(|doc| doc.document_name.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn hybrid_search(
        &self,
        query_text: &str,
        _query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        if self.fail_search {
            return Err(RagError::retrieval("store unavailable"));
        }
        self.searches
            .lock()
            .unwrap()
            .push((query_text.to_string(), top_k));
        Ok(self.results.iter().take(top_k).cloned().collect())
    }
}

/// Chat model that streams scripted fragments and records prompts.
///
/// `produced` counts fragments actually pulled through the stream, which
/// makes cancellation observable: a dropped stream stops the count.
pub struct ScriptedChatModel {
    fragments: Vec<String>,
    fail_after: Option<usize>,
    /// Prompts received by `stream_chat`.
    pub prompts: Mutex<Vec<String>>,
    /// Number of fragments the consumer has actually pulled.
    pub produced: Arc<AtomicUsize>,
}

impl ScriptedChatModel {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            fail_after: None,
            prompts: Mutex::new(Vec::new()),
            produced: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fails with a generation error after yielding `n` fragments.
    pub fn failing_after(fragments: &[&str], n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new(fragments)
        }
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn stream_chat(&self, prompt: &str, _temperature: f32) -> Result<TokenStream, RagError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let fragments = self.fragments.clone();
        let fail_after = self.fail_after;
        let produced = Arc::clone(&self.produced);

        let stream = stream! {
            for (idx, fragment) in fragments.into_iter().enumerate() {
                if fail_after == Some(idx) {
                    yield Err(RagError::generation("backend dropped mid-stream"));
                    break;
                }
                produced.fetch_add(1, Ordering::SeqCst);
                yield Ok(fragment);
            }
        };
        Ok(stream.boxed())
    }

    async fn ensure_available(&self) -> bool {
        true
    }
}

/// Embedding provider that always fails, for query-time degradation tests.
pub struct FailingEmbedder {
    pub dimension: usize,
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Err(RagError::embedding("model crashed"))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Embedding provider that reports one dimension but emits another, for
/// the fatal-mismatch path.
pub struct WrongDimensionEmbedder {
    pub reported: usize,
    pub actual: usize,
}

#[async_trait]
impl EmbeddingProvider for WrongDimensionEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|_| vec![0.5; self.actual]).collect())
    }

    fn dimension(&self) -> usize {
        self.reported
    }
}

/// Embedding provider that records the exact texts it was asked to embed.
pub struct RecordingEmbedder {
    pub dimension: usize,
    pub texts: Mutex<Vec<String>>,
}

impl RecordingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            texts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for RecordingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        self.texts.lock().unwrap().extend(texts.iter().cloned());
        Ok(texts.iter().map(|_| vec![0.25; self.dimension]).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
