//! Cross-encoder trait definition.
//!
//! # Architecture
//!
//! ```ascii
//!                   ┌────────────────────┐
//!                   │ CrossEncoder Trait │
//!                   └─────────┬──────────┘
//!                             │
//!              ┌──────────────┴──────────────┐
//!              ▼                             ▼
//!     ┌──────────────────┐        ┌────────────────────┐
//!     │ HttpCrossEncoder │        │ TermOverlapEncoder │
//!     │ (hosted model)   │        │ (local, offline)   │
//!     └──────────────────┘        └────────────────────┘
//! ```

use async_trait::async_trait;

use crate::error::Result;

/// A pairwise relevance model: (query, passage) → score.
///
/// Implementations return one score per input passage, **in input order**;
/// the caller owns candidate identity and ordering. Higher scores mean more
/// relevant.
#[async_trait]
pub trait CrossEncoder: Send + Sync {
    /// Identifier for this encoder (e.g. `"http"`, `"term-overlap"`).
    fn name(&self) -> &str;

    /// Model or algorithm being used.
    fn model(&self) -> &str;

    /// Score every (query, passage) pair.
    ///
    /// Must return exactly `passages.len()` scores, aligned to the input.
    async fn score(&self, query: &str, passages: &[String]) -> Result<Vec<f32>>;
}
