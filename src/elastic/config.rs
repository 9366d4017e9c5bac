//! Elasticsearch client configuration.
//!
//! # Architecture
//!
//! ```ascii
//! ┌─────────────────────────────────────────────────────────┐
//! │                    ElasticConfig                         │
//! ├─────────────────────────────────────────────────────────┤
//! │ endpoint: String       ─────► Cluster base URL           │
//! │ index: String          ─────► Index to create/query      │
//! │ language: String       ─────► Analyzer for both fields   │
//! │ title_boost/text_boost ─────► Per-field multi_match boost│
//! │ tie_breaker: f32       ─────► best_fields tie-breaker    │
//! │ timeout: Duration      ─────► Per-request timeout        │
//! │ basic_auth: Option     ─────► user:password              │
//! │ bulk_chunk_size        ─────► Docs per _bulk request     │
//! │ bulk_retries: u32      ─────► Fixed write retry count    │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

/// Field name used for document titles in the index mapping.
pub const TITLE_FIELD: &str = "title";

/// Field name used for document bodies in the index mapping.
///
/// `txt` rather than `text` to avoid colliding with the mapping type name in
/// hand-written queries against the index.
pub const TEXT_FIELD: &str = "txt";

/// Configuration for [`super::ElasticClient`].
///
/// # Example
///
/// ```ignore
/// let config = ElasticConfig::new("http://localhost:9200", "scifact")
///     .with_language("english")
///     .with_tie_breaker(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    /// Cluster base URL, e.g. `http://localhost:9200`.
    pub endpoint: String,
    /// Index name.
    pub index: String,
    /// Analyzer language applied to both text fields (`english`, `german`, ...).
    pub language: String,
    /// multi_match boost for the title field.
    pub title_boost: f32,
    /// multi_match boost for the body field.
    pub text_boost: f32,
    /// best_fields tie-breaker constant.
    pub tie_breaker: f32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Optional basic-auth credentials (user, password).
    pub basic_auth: Option<(String, String)>,
    /// Documents per `_bulk` request.
    pub bulk_chunk_size: usize,
    /// Fixed retry attempt count for bulk writes.
    pub bulk_retries: u32,
    /// Number of primary shards for a created index.
    pub number_of_shards: u32,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
            index: "searcheval".to_string(),
            language: "english".to_string(),
            title_boost: 1.0,
            text_boost: 1.0,
            tie_breaker: 0.5,
            timeout: Duration::from_secs(100),
            basic_auth: None,
            bulk_chunk_size: 500,
            bulk_retries: 3,
            number_of_shards: 1,
        }
    }
}

impl ElasticConfig {
    /// Create a config for the given cluster endpoint and index name.
    pub fn new(endpoint: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            index: index.into(),
            ..Default::default()
        }
    }

    /// Set the analyzer language for both text fields.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the per-field boosts used in the multi_match query.
    pub fn with_boosts(mut self, title_boost: f32, text_boost: f32) -> Self {
        self.title_boost = title_boost;
        self.text_boost = text_boost;
        self
    }

    /// Set the best_fields tie-breaker constant.
    pub fn with_tie_breaker(mut self, tie_breaker: f32) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Set basic-auth credentials.
    pub fn with_basic_auth(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some((user.into(), password.into()));
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bulk chunk size.
    pub fn with_bulk_chunk_size(mut self, chunk_size: usize) -> Self {
        self.bulk_chunk_size = chunk_size.max(1);
        self
    }

    /// Set the fixed bulk-write retry count.
    pub fn with_bulk_retries(mut self, retries: u32) -> Self {
        self.bulk_retries = retries;
        self
    }

    /// The two weighted field expressions for the multi_match query,
    /// e.g. `["title^2", "txt^1"]`.
    pub fn weighted_fields(&self) -> [String; 2] {
        [
            format!("{TITLE_FIELD}^{}", self.title_boost),
            format!("{TEXT_FIELD}^{}", self.text_boost),
        ]
    }

    /// URL for an index-level path, e.g. `url_for("_refresh")`.
    pub(crate) fn url_for(&self, suffix: &str) -> String {
        format!(
            "{}/{}/{suffix}",
            self.endpoint.trim_end_matches('/'),
            self.index
        )
    }

    /// URL of the index itself (create/delete).
    pub(crate) fn index_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.index)
    }
}
