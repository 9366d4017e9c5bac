//! First-stage lexical retrieval.
//!
//! Issues batched best-fields multi_match queries through
//! [`ElasticClient::msearch`] and folds the responses into a [`Run`].
//!
//! # Error policy
//!
//! A failed batch request is caught, logged, and dropped: its queries simply
//! receive no results. There is no retry and no partial-success accounting.
//! This is exploratory-tooling behavior, not production resilience; the
//! evaluation report makes dropped queries visible as missing run entries.

use tracing::{debug, info, warn};

use crate::elastic::{hits_to_scores, ElasticClient};
use crate::types::{Query, Run};

/// Batched lexical retriever over an indexed corpus.
pub struct LexicalRetriever<'a> {
    client: &'a ElasticClient,
}

impl<'a> LexicalRetriever<'a> {
    /// Create a retriever over the given client's index.
    pub fn new(client: &'a ElasticClient) -> Self {
        Self { client }
    }

    /// Retrieve up to `top_k` candidates per query, `batch_size` queries per
    /// `_msearch` request.
    ///
    /// Returns one score map per successfully searched query. Queries in a
    /// failed batch are absent from the result.
    pub async fn retrieve(&self, queries: &[Query], top_k: usize, batch_size: usize) -> Run {
        let batch_size = batch_size.max(1);
        let mut run = Run::new();
        let mut dropped = 0;

        for batch in queries.chunks(batch_size) {
            let texts: Vec<&str> = batch.iter().map(|q| q.text.as_str()).collect();
            match self.client.msearch(&texts, top_k).await {
                Ok(hit_lists) => {
                    for (query, hits) in batch.iter().zip(hit_lists) {
                        run.insert(query.id.clone(), hits_to_scores(hits));
                    }
                    debug!("retrieved batch of {} queries", batch.len());
                }
                Err(e) => {
                    dropped += batch.len();
                    warn!("dropping batch of {} queries after error: {e}", batch.len());
                }
            }
        }

        if dropped > 0 {
            warn!("{dropped}/{} queries received no results", queries.len());
        }
        info!(
            "lexical retrieval produced results for {}/{} queries",
            run.len(),
            queries.len()
        );
        run
    }
}
