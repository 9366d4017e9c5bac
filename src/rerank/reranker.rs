//! Second-stage reranking over a first-stage run.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::types::{Document, Query, Run};

use super::traits::CrossEncoder;

/// Default number of (query, passage) pairs scored per encoder call.
pub const DEFAULT_RERANK_BATCH_SIZE: usize = 32;

/// Rescores first-stage candidate lists with a [`CrossEncoder`].
///
/// For each query the reranker builds (query, passage) pairs over the
/// query's candidate set, scores them in batches, and emits a new score map
/// over the **same candidate ids**. Queries with zero candidates pass
/// through as empty results; queries absent from the run (e.g. their
/// retrieval batch was dropped) stay absent.
pub struct Reranker {
    encoder: Box<dyn CrossEncoder>,
    batch_size: usize,
}

impl Reranker {
    /// Create a reranker around the given encoder.
    pub fn new(encoder: Box<dyn CrossEncoder>) -> Self {
        Self {
            encoder,
            batch_size: DEFAULT_RERANK_BATCH_SIZE,
        }
    }

    /// Set the pair batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// The encoder's model identifier (for report labeling).
    pub fn model(&self) -> &str {
        self.encoder.model()
    }

    /// Rescore every candidate list in `run`.
    ///
    /// `queries` supplies the query texts; `corpus` supplies passage texts.
    /// A candidate id without a corpus document is scored against an empty
    /// passage (and logged) so the output id set still matches the input.
    pub async fn rerank(&self, run: &Run, queries: &[Query], corpus: &[Document]) -> Result<Run> {
        let by_id: HashMap<&str, &Document> =
            corpus.iter().map(|d| (d.id.as_str(), d)).collect();

        let mut reranked = Run::new();
        for query in queries {
            let Some(candidates) = run.get(&query.id) else {
                continue;
            };
            if candidates.is_empty() {
                reranked.insert(query.id.clone(), HashMap::new());
                continue;
            }

            // Sorted id order keeps pair construction deterministic.
            let mut doc_ids: Vec<&str> = candidates.keys().map(String::as_str).collect();
            doc_ids.sort_unstable();

            let passages: Vec<String> = doc_ids
                .iter()
                .map(|id| match by_id.get(id) {
                    Some(doc) => doc.passage(),
                    None => {
                        warn!("candidate '{id}' not in corpus, scoring empty passage");
                        String::new()
                    }
                })
                .collect();

            let mut scores = Vec::with_capacity(passages.len());
            for chunk in passages.chunks(self.batch_size) {
                scores.extend(self.encoder.score(&query.text, chunk).await?);
            }

            debug!(
                "reranked {} candidates for query '{}'",
                doc_ids.len(),
                query.id
            );
            reranked.insert(
                query.id.clone(),
                doc_ids
                    .into_iter()
                    .map(String::from)
                    .zip(scores)
                    .collect(),
            );
        }

        info!(
            "reranked {} queries with {} ({})",
            reranked.len(),
            self.encoder.name(),
            self.encoder.model()
        );
        Ok(reranked)
    }
}
