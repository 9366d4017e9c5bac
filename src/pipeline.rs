//! End-to-end benchmark pipeline.
//!
//! Wires the four stages in their fixed linear order:
//!
//! ```ascii
//! corpus ──► index ──► retrieve ──► rerank ──► evaluate
//!                         │                       ▲
//!                         └── evaluate ───────────┘
//!                             (first stage)
//! ```
//!
//! Execution is sequential and single-threaded; the only batching is
//! request-level grouping inside retrieval and reranking.

use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::elastic::{ElasticClient, ElasticConfig};
use crate::error::Result;
use crate::eval::{evaluate, EvalReport, DEFAULT_K};
use crate::rerank::Reranker;
use crate::retriever::LexicalRetriever;

/// Pipeline configuration on top of the backend settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Search backend settings.
    pub elastic: ElasticConfig,
    /// Candidates retrieved per query in the first stage.
    pub top_k: usize,
    /// Queries per `_msearch` request.
    pub retrieval_batch_size: usize,
    /// (query, passage) pairs per cross-encoder call.
    pub rerank_batch_size: usize,
    /// Metric cutoff (nDCG@k and companions).
    pub k: usize,
    /// Drop and re-create the index before writing the corpus.
    ///
    /// With `false` an existing index is reused, which only makes sense when
    /// it already holds exactly this corpus.
    pub recreate_index: bool,
}

impl PipelineConfig {
    /// Create a config with benchmark-standard defaults
    /// (top 100 candidates, nDCG@10, fresh index).
    pub fn new(elastic: ElasticConfig) -> Self {
        Self {
            elastic,
            top_k: 100,
            retrieval_batch_size: 50,
            rerank_batch_size: crate::rerank::DEFAULT_RERANK_BATCH_SIZE,
            k: DEFAULT_K,
            recreate_index: true,
        }
    }

    /// Set the first-stage candidate count.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the metric cutoff.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Reuse an existing index instead of re-creating it.
    pub fn reuse_index(mut self) -> Self {
        self.recreate_index = false;
        self
    }
}

/// Outcome of a full benchmark run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Documents written to the index.
    pub indexed: usize,
    /// Evaluation of the lexical first stage.
    pub first_stage: EvalReport,
    /// Evaluation after cross-encoder reranking.
    pub reranked: EvalReport,
}

/// Two-stage retrieve-and-rerank benchmark runner.
pub struct Pipeline {
    config: PipelineConfig,
    client: ElasticClient,
    reranker: Reranker,
}

impl Pipeline {
    /// Build a pipeline from config and a reranker.
    pub fn new(config: PipelineConfig, reranker: Reranker) -> Result<Self> {
        let client = ElasticClient::new(config.elastic.clone())?;
        let reranker = reranker.with_batch_size(config.rerank_batch_size);
        Ok(Self {
            config,
            client,
            reranker,
        })
    }

    /// Index the corpus, retrieve, rerank, and evaluate both stages.
    pub async fn run(&self, dataset: &Dataset) -> Result<PipelineReport> {
        // Stage 1: index.
        if self.config.recreate_index {
            self.client.recreate_index().await?;
        } else {
            self.client.create_index().await?;
        }
        let indexed = self.client.bulk_index(&dataset.corpus).await?;
        self.client.refresh().await?;

        let count = self.client.count().await?;
        if count != dataset.corpus.len() as u64 {
            warn!(
                "index holds {count} documents but corpus has {}",
                dataset.corpus.len()
            );
        }

        // Stage 2: lexical retrieval.
        let retriever = LexicalRetriever::new(&self.client);
        let run = retriever
            .retrieve(
                &dataset.queries,
                self.config.top_k,
                self.config.retrieval_batch_size,
            )
            .await;

        let first_stage = evaluate(&dataset.qrels, &run, self.config.k)?;
        info!("first stage: {first_stage}");

        // Stage 3: rerank. Stage 4: evaluate again.
        let reranked_run = self
            .reranker
            .rerank(&run, &dataset.queries, &dataset.corpus)
            .await?;
        let reranked = evaluate(&dataset.qrels, &reranked_run, self.config.k)?;
        info!("reranked with {}: {reranked}", self.reranker.model());

        Ok(PipelineReport {
            indexed,
            first_stage,
            reranked,
        })
    }
}
