//! OpenSearch-compatible HTTP backend.
//!
//! Speaks three endpoints of the store's REST API: `_bulk` for ingestion,
//! `_delete_by_query` for removal, and `_search` for both the hybrid
//! retrieval query and the document-name aggregation. Score fusion between
//! the lexical and k-NN legs is performed server-side by the configured
//! search pipeline; this client only names it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::error::RagError;

use super::{BulkReport, IndexedDocument, SearchBackend, SearchResult};

/// HTTP client for an OpenSearch-style document/vector store.
#[derive(Clone, Debug)]
pub struct OpenSearchBackend {
    client: Client,
    base_url: Url,
    index: String,
    search_pipeline: String,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_score")]
    score: f32,
    #[serde(rename = "_source")]
    source: HitSource,
}

#[derive(Deserialize)]
struct HitSource {
    text: String,
    document_name: Option<String>,
}

#[derive(Deserialize)]
struct BulkResponse {
    errors: bool,
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct DeleteByQueryResponse {
    deleted: u64,
}

#[derive(Deserialize)]
struct AggResponse {
    aggregations: Aggregations,
}

#[derive(Deserialize)]
struct Aggregations {
    unique_docs: TermsAgg,
}

#[derive(Deserialize)]
struct TermsAgg {
    buckets: Vec<TermsBucket>,
}

#[derive(Deserialize)]
struct TermsBucket {
    key: String,
}

impl OpenSearchBackend {
    /// Creates a backend for `index` served at `base_url`, fusing hybrid
    /// queries through `search_pipeline`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Configuration`] when `base_url` is not a valid URL.
    pub fn new(
        client: Client,
        base_url: &str,
        index: impl Into<String>,
        search_pipeline: impl Into<String>,
    ) -> Result<Self, RagError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            RagError::configuration(format!("invalid search base URL '{base_url}': {err}"))
        })?;
        Ok(Self {
            client,
            base_url,
            index: index.into(),
            search_pipeline: search_pipeline.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RagError> {
        self.base_url
            .join(path)
            .map_err(|err| RagError::retrieval(format!("invalid endpoint path '{path}': {err}")))
    }
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    async fn bulk_index(&self, documents: Vec<IndexedDocument>) -> Result<BulkReport, RagError> {
        let total = documents.len();
        let mut body = String::new();
        for doc in &documents {
            let action = json!({"index": {"_index": self.index, "_id": doc.doc_id}});
            let source = json!({
                "text": doc.text,
                "embedding": doc.embedding,
                "document_name": doc.document_name,
            });
            body.push_str(&action.to_string());
            body.push('\n');
            body.push_str(&source.to_string());
            body.push('\n');
        }

        let response = self
            .client
            .post(self.endpoint("_bulk")?)
            .header("content-type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|err| RagError::retrieval(format!("bulk request failed: {err}")))?
            .error_for_status()
            .map_err(|err| RagError::retrieval(format!("bulk request rejected: {err}")))?;

        let parsed: BulkResponse = response
            .json()
            .await
            .map_err(|err| RagError::retrieval(format!("malformed bulk response: {err}")))?;

        let mut errors = Vec::new();
        if parsed.errors {
            for item in &parsed.items {
                let indexed = &item["index"];
                if !indexed["error"].is_null() {
                    let id = indexed["_id"].as_str().unwrap_or("<unknown>");
                    let reason = indexed["error"]["reason"].as_str().unwrap_or("unknown error");
                    errors.push(format!("{id}: {reason}"));
                }
            }
        }

        let report = BulkReport {
            indexed: total - errors.len(),
            errors,
        };
        tracing::info!(
            index = %self.index,
            indexed = report.indexed,
            failed = report.errors.len(),
            "bulk indexed chunk documents"
        );
        Ok(report)
    }

    async fn delete_by_document(&self, document_name: &str) -> Result<u64, RagError> {
        let body = json!({"query": {"term": {"document_name": document_name}}});
        let response = self
            .client
            .post(self.endpoint(&format!("{}/_delete_by_query", self.index))?)
            .json(&body)
            .send()
            .await
            .map_err(|err| RagError::retrieval(format!("delete request failed: {err}")))?
            .error_for_status()
            .map_err(|err| RagError::retrieval(format!("delete request rejected: {err}")))?;

        let parsed: DeleteByQueryResponse = response
            .json()
            .await
            .map_err(|err| RagError::retrieval(format!("malformed delete response: {err}")))?;

        tracing::info!(
            index = %self.index,
            document_name,
            deleted = parsed.deleted,
            "deleted chunk documents"
        );
        Ok(parsed.deleted)
    }

    async fn document_names(&self) -> Result<Vec<String>, RagError> {
        let body = json!({
            "size": 0,
            "aggs": {"unique_docs": {"terms": {"field": "document_name", "size": 10000}}},
        });
        let response = self
            .client
            .post(self.endpoint(&format!("{}/_search", self.index))?)
            .json(&body)
            .send()
            .await
            .map_err(|err| RagError::retrieval(format!("listing request failed: {err}")))?
            .error_for_status()
            .map_err(|err| RagError::retrieval(format!("listing request rejected: {err}")))?;

        let parsed: AggResponse = response
            .json()
            .await
            .map_err(|err| RagError::retrieval(format!("malformed listing response: {err}")))?;

        Ok(parsed
            .aggregations
            .unique_docs
            .buckets
            .into_iter()
            .map(|bucket| bucket.key)
            .collect())
    }

    async fn hybrid_search(
        &self,
        query_text: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        // Embeddings are excluded from hits: large, and never needed by
        // the consumer.
        let body = json!({
            "_source": {"exclude": ["embedding"]},
            "query": {
                "hybrid": {
                    "queries": [
                        {"match": {"text": {"query": query_text}}},
                        {"knn": {"embedding": {"vector": query_vector, "k": top_k}}},
                    ]
                }
            },
            "size": top_k,
        });

        let response = self
            .client
            .post(self.endpoint(&format!("{}/_search", self.index))?)
            .query(&[("search_pipeline", self.search_pipeline.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|err| RagError::retrieval(format!("search request failed: {err}")))?
            .error_for_status()
            .map_err(|err| RagError::retrieval(format!("search request rejected: {err}")))?;

        let parsed: SearchEnvelope = response
            .json()
            .await
            .map_err(|err| RagError::retrieval(format!("malformed search response: {err}")))?;

        let results: Vec<SearchResult> = parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchResult {
                text: hit.source.text,
                score: hit.score,
                document_name: hit.source.document_name,
            })
            .collect();

        tracing::info!(
            index = %self.index,
            top_k,
            returned = results.len(),
            "hybrid search executed"
        );
        Ok(results)
    }
}
