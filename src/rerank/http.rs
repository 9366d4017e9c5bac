//! HTTP-hosted cross-encoder.
//!
//! Calls a rerank API of the common shape served by hosted rerankers and
//! text-embeddings-inference deployments:
//!
//! ```ascii
//! ┌──────────────────┐    HTTP     ┌──────────────────┐
//! │ HttpCrossEncoder │ ──────────► │   Rerank API      │
//! └────────┬─────────┘             └─────────┬────────┘
//!          │ {model, query, documents}       │ {"results": [
//!          │                                 │   {"index", "relevance_score"},
//!          └─────────────────────────────────┘   ...]}
//! ```
//!
//! Scores come back keyed by input index and are realigned to input order,
//! which is what [`super::Reranker`] needs to preserve candidate identity.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{PipelineError, Result};

use super::config::CrossEncoderConfig;
use super::traits::CrossEncoder;

/// Cross-encoder backed by a hosted rerank API.
pub struct HttpCrossEncoder {
    client: Client,
    config: CrossEncoderConfig,
}

impl HttpCrossEncoder {
    /// Create an encoder for the configured endpoint.
    pub fn new(config: CrossEncoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::NetworkError(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn build_request(&self, query: &str, passages: &[String]) -> Value {
        json!({
            "model": self.config.model,
            "query": query,
            "documents": passages,
        })
    }
}

/// Extract input-order-aligned scores from a rerank response body.
pub(crate) fn parse_scores(response: &Value, expected: usize) -> Result<Vec<f32>> {
    let results = response
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| PipelineError::ResponseShape("rerank response missing 'results'".into()))?;

    if results.len() != expected {
        return Err(PipelineError::ResponseShape(format!(
            "rerank API returned {} scores for {expected} passages",
            results.len()
        )));
    }

    let mut scores = vec![0.0_f32; expected];
    for result in results {
        let index = result
            .get("index")
            .and_then(Value::as_u64)
            .ok_or_else(|| PipelineError::ResponseShape("rerank result missing 'index'".into()))?
            as usize;
        let score = result
            .get("relevance_score")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                PipelineError::ResponseShape("rerank result missing 'relevance_score'".into())
            })?;
        if index >= expected {
            return Err(PipelineError::ResponseShape(format!(
                "rerank result index {index} out of range for {expected} passages"
            )));
        }
        scores[index] = score as f32;
    }
    Ok(scores)
}

#[async_trait]
impl CrossEncoder for HttpCrossEncoder {
    fn name(&self) -> &str {
        "http"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn score(&self, query: &str, passages: &[String]) -> Result<Vec<f32>> {
        if passages.is_empty() {
            return Ok(vec![]);
        }

        debug!(
            "rerank request: {} passages, model {}",
            passages.len(),
            self.config.model
        );

        let mut request = self
            .client
            .post(&self.config.base_url)
            .header("Content-Type", "application/json");
        if let Some(ref api_key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request
            .json(&self.build_request(query, passages))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::RerankApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        parse_scores(&body, passages.len())
    }
}
