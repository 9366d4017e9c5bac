//! Cross-encoder reranking for the second pipeline stage.
//!
//! # Architecture
//!
//! ```ascii
//!              ┌──────────────────────────────┐
//!              │   First-stage Run + Corpus    │
//!              └──────────────┬───────────────┘
//!                             ▼
//!     ┌─────────────────────────────────────────────────┐
//!     │                    Reranker                      │
//!     │  rerank(run, queries, corpus) → reranked Run     │
//!     └──────────────────────┬──────────────────────────┘
//!                            │ CrossEncoder trait
//!             ┌──────────────┴──────────────┐
//!             ▼                             ▼
//!    ┌──────────────────┐        ┌────────────────────┐
//!    │ HttpCrossEncoder │        │ TermOverlapEncoder │
//!    └──────────────────┘        └────────────────────┘
//! ```
//!
//! ```ascii
//! rerank/
//! ├── mod.rs       ─► re-exports
//! ├── config.rs    ─► CrossEncoderConfig
//! ├── traits.rs    ─► CrossEncoder trait
//! ├── http.rs      ─► HttpCrossEncoder (hosted rerank API)
//! ├── overlap.rs   ─► TermOverlapEncoder, MockCrossEncoder
//! └── reranker.rs  ─► Reranker (run-level stage)
//! ```

mod config;
mod http;
mod overlap;
mod reranker;
mod traits;

pub use config::CrossEncoderConfig;
pub use http::HttpCrossEncoder;
pub use overlap::{MockCrossEncoder, TermOverlapEncoder};
pub use reranker::{Reranker, DEFAULT_RERANK_BATCH_SIZE};
pub use traits::CrossEncoder;

#[cfg(test)]
mod tests;
