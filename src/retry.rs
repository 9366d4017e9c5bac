//! Fixed-count retry for bulk index writes.
//!
//! The only place the pipeline retries anything is the `_bulk` write path:
//! a fixed number of attempts with a doubling delay, capped at a maximum.
//! Batched retrieval deliberately has no retry (failed batches are dropped,
//! see [`crate::retriever`]).
//!
//! # Usage
//!
//! ```ignore
//! let executor = RetryExecutor::new(3);
//! let result = executor
//!     .execute(|| async { client.bulk_chunk(&body).await })
//!     .await;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

/// Executor for the bulk-write retry policy.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    /// Total attempts, including the first.
    max_attempts: u32,
    /// Delay before the first retry; doubles per attempt.
    base_delay: Duration,
    /// Upper bound on the per-attempt delay.
    max_delay: Duration,
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RetryExecutor {
    /// Create an executor with the given attempt budget and default delays
    /// (500ms base, 10s cap).
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Override the base delay (mostly for tests).
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Run `operation`, retrying transient failures up to the attempt budget.
    ///
    /// Permanent errors (see [`PipelineError::is_transient`]) are returned
    /// immediately; retrying a mapping error would never succeed.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut delay = self.base_delay;
        let mut attempts = 0;

        loop {
            attempts += 1;
            match operation().await {
                Ok(v) => {
                    if attempts > 1 {
                        debug!("bulk write succeeded after {attempts} attempts");
                    }
                    return Ok(v);
                }
                Err(e) if !e.is_transient() => {
                    debug!("non-transient error, not retrying: {e}");
                    return Err(e);
                }
                Err(e) if attempts >= self.max_attempts => {
                    warn!("giving up after {attempts} attempts: {e}");
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        "attempt {attempts}/{} failed, retrying in {delay:?}: {e}",
                        self.max_attempts
                    );
                    sleep(delay).await;
                    delay = (delay * 2).min(self.max_delay);
                }
            }
        }
    }
}
