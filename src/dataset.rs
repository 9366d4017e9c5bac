//! Benchmark dataset loading.
//!
//! Reads the standard on-disk layout used by public retrieval benchmarks:
//!
//! ```ascii
//! <dataset dir>/
//! ├── corpus.jsonl      ─► {"_id", "title", "text"} per line
//! ├── queries.jsonl     ─► {"_id", "text"} per line
//! └── qrels/
//!     └── <split>.tsv   ─► query-id \t corpus-id \t score (header row)
//! ```
//!
//! Downloading datasets from a remote hub is out of scope; point the loader
//! at an already-unpacked directory.
//!
//! [`load_split`] enforces the pipeline invariant that every query handed to
//! the retriever has at least one relevance judgment: queries absent from the
//! qrels are dropped (and logged) before retrieval.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::types::{Document, Qrels, Query};

/// A fully loaded benchmark split: corpus, judged queries, and qrels.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Document collection.
    pub corpus: Vec<Document>,
    /// Queries, restricted to those with at least one judgment.
    pub queries: Vec<Query>,
    /// Relevance judgments for `queries`.
    pub qrels: Qrels,
}

fn dataset_err(path: &Path, message: impl Into<String>) -> PipelineError {
    PipelineError::DatasetError {
        path: path.display().to_string(),
        message: message.into(),
    }
}

/// Load `corpus.jsonl`-style documents, one JSON object per line.
///
/// Blank lines are skipped; any malformed line is an error (a silently
/// truncated corpus would skew every downstream metric).
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| dataset_err(path, e.to_string()))?;

    let mut corpus = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| dataset_err(path, format!("line {}: {e}", lineno + 1)))?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: Document = serde_json::from_str(&line)
            .map_err(|e| dataset_err(path, format!("line {}: {e}", lineno + 1)))?;
        corpus.push(doc);
    }

    debug!("loaded {} documents from {}", corpus.len(), path.display());
    Ok(corpus)
}

/// Load `queries.jsonl`-style queries, one JSON object per line.
pub fn load_queries(path: impl AsRef<Path>) -> Result<Vec<Query>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| dataset_err(path, e.to_string()))?;

    let mut queries = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| dataset_err(path, format!("line {}: {e}", lineno + 1)))?;
        if line.trim().is_empty() {
            continue;
        }
        let query: Query = serde_json::from_str(&line)
            .map_err(|e| dataset_err(path, format!("line {}: {e}", lineno + 1)))?;
        queries.push(query);
    }

    debug!("loaded {} queries from {}", queries.len(), path.display());
    Ok(queries)
}

/// Load a qrels TSV: `query-id \t corpus-id \t score`, one judgment per line.
///
/// A header row is detected by a non-numeric score column and skipped.
pub fn load_qrels(path: impl AsRef<Path>) -> Result<Qrels> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| dataset_err(path, e.to_string()))?;

    let mut qrels: Qrels = BTreeMap::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| dataset_err(path, format!("line {}: {e}", lineno + 1)))?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let (query_id, doc_id, score) = match (fields.next(), fields.next(), fields.next()) {
            (Some(q), Some(d), Some(s)) => (q, d, s),
            _ => {
                return Err(dataset_err(
                    path,
                    format!("line {}: expected 3 tab-separated fields", lineno + 1),
                ))
            }
        };

        let score: i32 = match score.trim().parse() {
            Ok(s) => s,
            // Header row ("query-id corpus-id score") only valid as line 1.
            Err(_) if lineno == 0 => continue,
            Err(e) => {
                return Err(dataset_err(
                    path,
                    format!("line {}: bad relevance score: {e}", lineno + 1),
                ))
            }
        };

        qrels
            .entry(query_id.to_string())
            .or_default()
            .insert(doc_id.to_string(), score);
    }

    debug!(
        "loaded judgments for {} queries from {}",
        qrels.len(),
        path.display()
    );
    Ok(qrels)
}

/// Load corpus, queries, and the named qrels split from a dataset directory.
///
/// Queries without any judgments are excluded here, upstream of retrieval,
/// so that every query id in a produced run is resolvable for evaluation.
pub fn load_split(dir: impl AsRef<Path>, split: &str) -> Result<Dataset> {
    let dir = dir.as_ref();

    let corpus = load_corpus(dir.join("corpus.jsonl"))?;
    let queries = load_queries(dir.join("queries.jsonl"))?;
    let qrels = load_qrels(dir.join("qrels").join(format!("{split}.tsv")))?;

    let total = queries.len();
    let queries: Vec<Query> = queries
        .into_iter()
        .filter(|q| qrels.contains_key(&q.id))
        .collect();
    let dropped = total - queries.len();
    if dropped > 0 {
        warn!("dropped {dropped} queries without judgments in split '{split}'");
    }

    info!(
        "dataset loaded: {} documents, {} judged queries ({} judgments)",
        corpus.len(),
        queries.len(),
        qrels.values().map(|j| j.len()).sum::<usize>()
    );

    Ok(Dataset {
        corpus,
        queries,
        qrels,
    })
}
