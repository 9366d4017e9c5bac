//! Pipeline error types.
//!
//! # Error Handling Philosophy
//!
//! Errors should be:
//! 1. **Actionable**: Tell the user what to do, not just what went wrong
//! 2. **Specific**: Include relevant context (index name, query id, status codes)
//! 3. **Recoverable**: Distinguish transient errors (retry) from permanent ones
//!
//! The only component with a retry design is the bulk indexer (fixed attempt
//! count, see [`crate::retry`]). Batched retrieval deliberately has none:
//! a failed batch is logged and dropped (see [`crate::retriever`]).
//!
//! # Common Errors and Solutions
//!
//! | Error | Cause | Solution |
//! |-------|-------|----------|
//! | `BackendError` | Elasticsearch rejected the request | Check index mapping / cluster logs |
//! | `NetworkError` | Cluster unreachable | Check the endpoint URL / cluster health |
//! | `DatasetError` | Malformed corpus/queries/qrels file | Validate the dataset layout |
//! | `MissingJudgments` | Run contains an unjudged query id | Filter queries upstream |

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur across the retrieve-and-rerank pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The search backend returned a non-success response.
    #[error("search backend error ({status}): {message}")]
    BackendError {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body (or reason phrase when the body is unreadable).
        message: String,
    },

    /// Rerank API returned a non-success response.
    #[error("rerank API error ({status}): {message}")]
    RerankApiError {
        /// HTTP status code returned by the rerank API.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Network-level failure (connection refused, DNS, TLS).
    #[error("network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Failed to read or parse a dataset file.
    #[error("dataset error in {path}: {message}")]
    DatasetError {
        /// File that failed to load.
        path: String,
        /// What went wrong (I/O or parse detail).
        message: String,
    },

    /// A response body did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A run contained a query id with no relevance judgments.
    ///
    /// The evaluator requires every scored query to be resolvable in the
    /// qrels; unjudged queries must be excluded before retrieval.
    #[error("query '{0}' has no relevance judgments")]
    MissingJudgments(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PipelineError::Timeout
        } else if err.is_connect() {
            PipelineError::NetworkError(format!("connection failed: {err}"))
        } else {
            PipelineError::NetworkError(err.to_string())
        }
    }
}

impl PipelineError {
    /// Whether the bulk-write retry helper may retry after this error.
    ///
    /// Only network-level failures, timeouts, and 5xx backend responses are
    /// transient; everything else (mapping errors, malformed payloads, auth
    /// failures surfacing as 4xx) is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkError(_) | Self::Timeout => true,
            Self::BackendError { status, .. } | Self::RerankApiError { status, .. } => {
                *status >= 500
            }
            _ => false,
        }
    }
}
