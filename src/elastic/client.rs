//! Thin asynchronous Elasticsearch client.
//!
//! Wraps exactly the four wire APIs the pipeline needs: index creation,
//! `_bulk` writes, `_refresh`/`_count`, and `_msearch`. Everything is a
//! plain `reqwest` call; request/response bodies are built and parsed by
//! small pure helpers so they can be tested without a live cluster.

use std::collections::HashMap;

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::retry::RetryExecutor;
use crate::types::Document;

use super::config::{ElasticConfig, TEXT_FIELD, TITLE_FIELD};

/// Asynchronous client for an Elasticsearch-compatible search backend.
///
/// # Example
///
/// ```ignore
/// let client = ElasticClient::new(ElasticConfig::new("http://localhost:9200", "scifact"))?;
/// client.create_index().await?;
/// client.bulk_index(&corpus).await?;
/// client.refresh().await?;
/// assert_eq!(client.count().await?, corpus.len() as u64);
/// ```
pub struct ElasticClient {
    client: Client,
    config: ElasticConfig,
    retry: RetryExecutor,
}

impl ElasticClient {
    /// Create a client for the configured cluster and index.
    pub fn new(config: ElasticConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::NetworkError(e.to_string()))?;
        let retry = RetryExecutor::new(config.bulk_retries);

        Ok(Self {
            client,
            config,
            retry,
        })
    }

    /// The configured index name.
    pub fn index(&self) -> &str {
        &self.config.index
    }

    /// Access the configuration (used by the retriever for query building).
    pub fn config(&self) -> &ElasticConfig {
        &self.config
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.basic_auth {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::BackendError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    /// Create the index with the language-analyzed two-field mapping.
    ///
    /// An already-existing index is tolerated and reused; re-create
    /// explicitly with [`recreate_index`](Self::recreate_index) when a clean
    /// slate is needed.
    pub async fn create_index(&self) -> Result<()> {
        let body = index_settings(&self.config);
        let response = self
            .authed(self.client.put(self.config.index_url()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("created index '{}'", self.config.index);
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        if message.contains("resource_already_exists_exception") {
            debug!("index '{}' already exists, reusing", self.config.index);
            return Ok(());
        }
        Err(PipelineError::BackendError {
            status: status.as_u16(),
            message,
        })
    }

    /// Delete the index. A missing index (404) is not an error.
    pub async fn delete_index(&self) -> Result<()> {
        let response = self
            .authed(self.client.delete(self.config.index_url()))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status.as_u16() == 404 {
            debug!("deleted index '{}'", self.config.index);
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(PipelineError::BackendError {
            status: status.as_u16(),
            message,
        })
    }

    /// Delete and re-create the index.
    pub async fn recreate_index(&self) -> Result<()> {
        self.delete_index().await?;
        self.create_index().await
    }

    /// Write all documents through the `_bulk` API in chunks.
    ///
    /// Each chunk gets the fixed retry budget from the config; a chunk that
    /// still fails aborts the whole write. Returns the number of documents
    /// written. The index is queryable only after [`refresh`](Self::refresh).
    pub async fn bulk_index(&self, corpus: &[Document]) -> Result<usize> {
        let url = self.config.url_for("_bulk");
        let mut written = 0;

        for chunk in corpus.chunks(self.config.bulk_chunk_size) {
            let body = bulk_body(&self.config.index, chunk);
            let value = self
                .retry
                .execute(|| async {
                    let response = self
                        .authed(self.client.post(&url))
                        .header("Content-Type", "application/x-ndjson")
                        .body(body.clone())
                        .send()
                        .await?;
                    Self::check_status(response).await
                })
                .await?;

            check_bulk_errors(&value)?;
            written += chunk.len();
            debug!("indexed {written}/{} documents", corpus.len());
        }

        info!(
            "bulk indexed {written} documents into '{}'",
            self.config.index
        );
        Ok(written)
    }

    /// Synchronous refresh; makes pending writes visible to search.
    pub async fn refresh(&self) -> Result<()> {
        let response = self
            .authed(self.client.post(self.config.url_for("_refresh")))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Number of documents currently in the index.
    pub async fn count(&self) -> Result<u64> {
        let response = self
            .authed(self.client.get(self.config.url_for("_count")))
            .send()
            .await?;
        let value = Self::check_status(response).await?;
        value
            .get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| PipelineError::ResponseShape("_count response missing 'count'".into()))
    }

    /// Issue one `_msearch` request for a batch of query texts.
    ///
    /// Returns one `(doc id, score)` hit list per query, in input order.
    /// Hit list lengths are bounded by `top_k`.
    pub async fn msearch(
        &self,
        query_texts: &[&str],
        top_k: usize,
    ) -> Result<Vec<Vec<(String, f32)>>> {
        if query_texts.is_empty() {
            return Ok(vec![]);
        }

        let body = msearch_body(&self.config, query_texts, top_k);
        let response = self
            .authed(self.client.post(self.config.url_for("_msearch")))
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;
        let value = Self::check_status(response).await?;

        let hits = parse_msearch_response(&value, query_texts.len())?;
        debug!(
            "msearch returned {} hit lists for {} queries",
            hits.len(),
            query_texts.len()
        );
        Ok(hits)
    }
}

/// Index settings and mapping: both fields analyzed with the configured
/// language analyzer.
pub(crate) fn index_settings(config: &ElasticConfig) -> Value {
    json!({
        "settings": {
            "number_of_shards": config.number_of_shards,
        },
        "mappings": {
            "properties": {
                TITLE_FIELD: { "type": "text", "analyzer": config.language },
                TEXT_FIELD: { "type": "text", "analyzer": config.language },
            }
        }
    })
}

/// Build the NDJSON `_bulk` body for a chunk of documents.
pub(crate) fn bulk_body(index: &str, docs: &[Document]) -> String {
    let mut body = String::new();
    for doc in docs {
        let action = json!({ "index": { "_index": index, "_id": doc.id } });
        let source = json!({ TITLE_FIELD: doc.title, TEXT_FIELD: doc.text });
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&source.to_string());
        body.push('\n');
    }
    body
}

/// Surface per-item `_bulk` failures as a backend error.
///
/// Elasticsearch answers 200 even when individual actions fail; the
/// `errors` flag and per-item `error` objects carry the real outcome.
pub(crate) fn check_bulk_errors(response: &Value) -> Result<()> {
    if response.get("errors").and_then(Value::as_bool) != Some(true) {
        return Ok(());
    }

    let first_error = response
        .get("items")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("index").and_then(|i| i.get("error")))
        .next();

    let reason = first_error
        .and_then(|e| e.get("reason"))
        .and_then(Value::as_str)
        .unwrap_or("unknown bulk item failure");

    warn!("bulk response reported item errors: {reason}");
    Err(PipelineError::BackendError {
        status: 200,
        message: format!("bulk write had item errors: {reason}"),
    })
}

/// Build the NDJSON `_msearch` body: one empty header line plus one
/// best-fields multi_match query per input text.
pub(crate) fn msearch_body(config: &ElasticConfig, query_texts: &[&str], top_k: usize) -> String {
    let fields = config.weighted_fields();
    let mut body = String::new();
    for text in query_texts {
        let search = json!({
            "size": top_k,
            "_source": false,
            "query": {
                "multi_match": {
                    "query": text,
                    "type": "best_fields",
                    "fields": fields,
                    "tie_breaker": config.tie_breaker,
                }
            }
        });
        body.push_str("{}\n");
        body.push_str(&search.to_string());
        body.push('\n');
    }
    body
}

/// Parse an `_msearch` response into per-query `(doc id, score)` hit lists.
///
/// A per-query error object inside an otherwise successful response is a
/// backend error: silently treating it as zero hits would look identical to
/// a query with no matches.
pub(crate) fn parse_msearch_response(
    value: &Value,
    expected: usize,
) -> Result<Vec<Vec<(String, f32)>>> {
    let responses = value
        .get("responses")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            PipelineError::ResponseShape("_msearch response missing 'responses'".into())
        })?;

    if responses.len() != expected {
        return Err(PipelineError::ResponseShape(format!(
            "_msearch returned {} responses for {expected} queries",
            responses.len()
        )));
    }

    let mut all_hits = Vec::with_capacity(responses.len());
    for response in responses {
        if let Some(error) = response.get("error") {
            let reason = error
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("unknown search failure");
            return Err(PipelineError::BackendError {
                status: response
                    .get("status")
                    .and_then(Value::as_u64)
                    .unwrap_or(500) as u16,
                message: reason.to_string(),
            });
        }

        let hits = response
            .get("hits")
            .and_then(|h| h.get("hits"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                PipelineError::ResponseShape("_msearch item missing 'hits.hits'".into())
            })?;

        let mut list = Vec::with_capacity(hits.len());
        for hit in hits {
            let id = hit
                .get("_id")
                .and_then(Value::as_str)
                .ok_or_else(|| PipelineError::ResponseShape("hit missing '_id'".into()))?;
            let score = hit
                .get("_score")
                .and_then(Value::as_f64)
                .unwrap_or_default() as f32;
            list.push((id.to_string(), score));
        }
        all_hits.push(list);
    }
    Ok(all_hits)
}

/// Convenience: merge ordered hit lists with their query ids into a run map.
pub(crate) fn hits_to_scores(hits: Vec<(String, f32)>) -> HashMap<String, f32> {
    hits.into_iter().collect()
}
