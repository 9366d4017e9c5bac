//! Rerank a hand-built candidate list with the local overlap encoder.
//!
//! No services required; useful for seeing the stage contracts in isolation.
//!
//! Run with:
//!   cargo run --example rerank_only

use std::collections::HashMap;

use searcheval::{evaluate, Document, Query, Reranker, Run, TermOverlapEncoder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let corpus = vec![
        Document::new("d1", "Paris", "The capital of France is Paris."),
        Document::new("d2", "Tokyo", "Tokyo is the capital of Japan."),
        Document::new("d3", "Rust", "Rust is a systems programming language."),
    ];
    let queries = vec![Query::new("q1", "capital of france")];

    // Pretend first stage: BM25 put the wrong document on top.
    let mut run = Run::new();
    run.insert(
        "q1".to_string(),
        HashMap::from([
            ("d1".to_string(), 1.2_f32),
            ("d2".to_string(), 3.4),
            ("d3".to_string(), 0.3),
        ]),
    );

    let reranker = Reranker::new(Box::new(TermOverlapEncoder::new()));
    let reranked = reranker.rerank(&run, &queries, &corpus).await?;

    let mut qrels = searcheval::Qrels::new();
    qrels.insert(
        "q1".to_string(),
        std::collections::BTreeMap::from([("d1".to_string(), 1)]),
    );

    println!("first stage: {}", evaluate(&qrels, &run, 10)?);
    println!("reranked:    {}", evaluate(&qrels, &reranked, 10)?);
    Ok(())
}
