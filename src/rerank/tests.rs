//! Reranking stage tests.

use super::*;
use crate::types::{Document, Query, Run};
use std::collections::HashMap;

use async_trait::async_trait;

fn corpus() -> Vec<Document> {
    vec![
        Document::new("d1", "Paris", "The capital of France is Paris."),
        Document::new("d2", "Tokyo", "Tokyo is the capital of Japan."),
        Document::new("d3", "Rust", "A systems programming language."),
    ]
}

fn first_stage_run() -> Run {
    let mut run = Run::new();
    let mut q1 = HashMap::new();
    q1.insert("d1".to_string(), 3.1);
    q1.insert("d2".to_string(), 2.0);
    q1.insert("d3".to_string(), 0.5);
    run.insert("q1".to_string(), q1);
    run
}

#[tokio::test]
async fn test_rerank_preserves_candidate_id_set() {
    let reranker = Reranker::new(Box::new(TermOverlapEncoder::new()));
    let queries = vec![Query::new("q1", "capital of france")];
    let run = first_stage_run();

    let reranked = reranker.rerank(&run, &queries, &corpus()).await.unwrap();

    let before: std::collections::BTreeSet<&String> = run["q1"].keys().collect();
    let after: std::collections::BTreeSet<&String> = reranked["q1"].keys().collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_rerank_promotes_relevant_passage() {
    let reranker = Reranker::new(Box::new(TermOverlapEncoder::new()));
    let queries = vec![Query::new("q1", "capital of france")];

    let reranked = reranker
        .rerank(&first_stage_run(), &queries, &corpus())
        .await
        .unwrap();

    let scores = &reranked["q1"];
    assert!(scores["d1"] > scores["d3"]);
}

#[tokio::test]
async fn test_rerank_empty_candidates_pass_through() {
    let reranker = Reranker::new(Box::new(TermOverlapEncoder::new()));
    let queries = vec![Query::new("q1", "anything")];
    let mut run = Run::new();
    run.insert("q1".to_string(), HashMap::new());

    let reranked = reranker.rerank(&run, &queries, &corpus()).await.unwrap();
    assert!(reranked["q1"].is_empty());
}

#[tokio::test]
async fn test_rerank_skips_queries_absent_from_run() {
    let reranker = Reranker::new(Box::new(TermOverlapEncoder::new()));
    // q2's retrieval batch was dropped upstream: no run entry, none expected out.
    let queries = vec![Query::new("q1", "capital of france"), Query::new("q2", "x")];

    let reranked = reranker
        .rerank(&first_stage_run(), &queries, &corpus())
        .await
        .unwrap();

    assert!(reranked.contains_key("q1"));
    assert!(!reranked.contains_key("q2"));
}

#[tokio::test]
async fn test_rerank_candidate_missing_from_corpus() {
    let reranker = Reranker::new(Box::new(TermOverlapEncoder::new()));
    let queries = vec![Query::new("q1", "capital of france")];
    let mut run = Run::new();
    let mut q1 = HashMap::new();
    q1.insert("ghost".to_string(), 1.0);
    q1.insert("d1".to_string(), 0.9);
    run.insert("q1".to_string(), q1);

    let reranked = reranker.rerank(&run, &queries, &corpus()).await.unwrap();

    // Ghost id kept (scored against an empty passage) so the id set holds.
    assert_eq!(reranked["q1"].len(), 2);
    assert!(reranked["q1"].contains_key("ghost"));
}

/// Encoder that records the largest batch it was handed.
struct BatchProbe {
    max_seen: std::sync::Arc<std::sync::Mutex<usize>>,
}

#[async_trait]
impl CrossEncoder for BatchProbe {
    fn name(&self) -> &str {
        "probe"
    }

    fn model(&self) -> &str {
        "probe"
    }

    async fn score(&self, _query: &str, passages: &[String]) -> crate::error::Result<Vec<f32>> {
        let mut max_seen = self.max_seen.lock().unwrap();
        *max_seen = (*max_seen).max(passages.len());
        Ok(vec![0.0; passages.len()])
    }
}

#[tokio::test]
async fn test_rerank_respects_batch_size() {
    let max_seen = std::sync::Arc::new(std::sync::Mutex::new(0));
    let reranker = Reranker::new(Box::new(BatchProbe {
        max_seen: max_seen.clone(),
    }))
    .with_batch_size(2);

    let queries = vec![Query::new("q1", "capital of france")];
    reranker
        .rerank(&first_stage_run(), &queries, &corpus())
        .await
        .unwrap();

    assert!(*max_seen.lock().unwrap() <= 2);
    assert!(*max_seen.lock().unwrap() > 0);
}

#[test]
fn test_cross_encoder_config_defaults() {
    let config = CrossEncoderConfig::default();
    assert!(config.base_url.contains("rerank"));
}
