//! searcheval - Two-Stage Retrieval Evaluation Toolkit
//!
//! Benchmarks a "retrieve and rerank" search setup: first-stage lexical
//! retrieval against an Elasticsearch-compatible index, cross-encoder
//! reranking of the candidates, and nDCG@10 scoring against relevance
//! judgments.
//!
//! # Architecture
//!
//! Four sequential stages, each a thin call into an external service or
//! library, with data flowing strictly linearly:
//!
//! ```ascii
//! ┌────────┐   ┌─────────┐   ┌───────────┐   ┌──────────┐   ┌───────────┐
//! │ corpus │──►│ Indexer │──►│ Retriever │──►│ Reranker │──►│ Evaluator │
//! └────────┘   └─────────┘   └───────────┘   └──────────┘   └───────────┘
//!               _bulk +       batched          (query, doc)   nDCG@10 +
//!               _refresh      _msearch         pair scoring   companions
//! ```
//!
//! No component depends on another's internal state beyond its output.
//! Execution is single-threaded and synchronous; batching is request-level
//! grouping only.
//!
//! # Example
//!
//! ```ignore
//! use searcheval::{
//!     dataset, CrossEncoderConfig, ElasticConfig, HttpCrossEncoder, Pipeline,
//!     PipelineConfig, Reranker,
//! };
//!
//! let data = dataset::load_split("datasets/scifact", "test")?;
//! let encoder = HttpCrossEncoder::new(CrossEncoderConfig::new("http://localhost:8080/rerank"))?;
//! let pipeline = Pipeline::new(
//!     PipelineConfig::new(ElasticConfig::new("http://localhost:9200", "scifact")),
//!     Reranker::new(Box::new(encoder)),
//! )?;
//! let report = pipeline.run(&data).await?;
//! println!("nDCG@10: {:.4} → {:.4}", report.first_stage.ndcg, report.reranked.ndcg);
//! ```
//!
//! # See Also
//!
//! - [`crate::elastic`] for the search backend client
//! - [`crate::rerank`] for cross-encoder implementations
//! - [`crate::eval`] for metric definitions

pub mod dataset;
pub mod elastic;
pub mod error;
pub mod eval;
pub mod pipeline;
pub mod rerank;
pub mod retriever;
pub mod retry;
pub mod types;

pub use dataset::{load_corpus, load_qrels, load_queries, load_split, Dataset};
pub use elastic::{ElasticClient, ElasticConfig, TEXT_FIELD, TITLE_FIELD};
pub use error::{PipelineError, Result};
pub use eval::{evaluate, ndcg_at, EvalReport, DEFAULT_K};
pub use pipeline::{Pipeline, PipelineConfig, PipelineReport};
pub use rerank::{
    CrossEncoder, CrossEncoderConfig, HttpCrossEncoder, MockCrossEncoder, Reranker,
    TermOverlapEncoder,
};
pub use retriever::LexicalRetriever;
pub use retry::RetryExecutor;
pub use types::{ranked, Document, Qrels, Query, Run};
