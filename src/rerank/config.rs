//! Cross-encoder configuration types.

use std::time::Duration;

/// Configuration for [`super::HttpCrossEncoder`].
///
/// # Example
///
/// ```ignore
/// let config = CrossEncoderConfig::new("http://localhost:8080/rerank")
///     .with_model("cross-encoder/ms-marco-MiniLM-L-6-v2")
///     .with_api_key("secret");
/// ```
#[derive(Debug, Clone)]
pub struct CrossEncoderConfig {
    /// Model name sent with each request.
    pub model: String,
    /// Rerank API endpoint URL.
    pub base_url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CrossEncoderConfig {
    fn default() -> Self {
        Self {
            model: "cross-encoder/ms-marco-MiniLM-L-6-v2".to_string(),
            base_url: "http://localhost:8080/rerank".to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl CrossEncoderConfig {
    /// Create a config for the given rerank endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
