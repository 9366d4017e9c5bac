//! E2E tests against a live Elasticsearch cluster.
//!
//! Requirements:
//! - Elasticsearch reachable at `ELASTICSEARCH_URL` (default
//!   `http://localhost:9200`)
//!
//! Run with:
//!   cargo test --test e2e_elasticsearch -- --ignored --nocapture

use std::collections::BTreeMap;

use searcheval::{
    evaluate, Document, ElasticClient, ElasticConfig, LexicalRetriever, Qrels, Query, Reranker,
    TermOverlapEncoder,
};

fn elastic_url() -> String {
    std::env::var("ELASTICSEARCH_URL").unwrap_or_else(|_| "http://localhost:9200".to_string())
}

/// Try to reach the cluster root and return true if it responds.
async fn elasticsearch_is_available() -> bool {
    reqwest::Client::new()
        .get(elastic_url())
        .send()
        .await
        .is_ok()
}

fn corpus() -> Vec<Document> {
    vec![
        Document::new("d1", "Paris", "The capital of France is Paris."),
        Document::new("d2", "Tokyo", "Tokyo is the capital city of Japan."),
        Document::new("d3", "Berlin", "Berlin is the capital of Germany."),
        Document::new("d4", "Rust", "Rust is a systems programming language."),
    ]
}

#[tokio::test]
#[ignore = "Requires a running Elasticsearch cluster"]
async fn test_index_retrieve_rerank_evaluate_roundtrip() {
    if !elasticsearch_is_available().await {
        eprintln!("Elasticsearch not available — skipping test");
        return;
    }

    let config = ElasticConfig::new(elastic_url(), "searcheval-e2e");
    let client = ElasticClient::new(config).expect("failed to build client");

    // Index + refresh, then verify the indexed count equals the corpus size.
    let corpus = corpus();
    client.recreate_index().await.expect("recreate_index");
    let written = client.bulk_index(&corpus).await.expect("bulk_index");
    assert_eq!(written, corpus.len());
    client.refresh().await.expect("refresh");
    assert_eq!(client.count().await.expect("count"), corpus.len() as u64);

    // Retrieve: result size per query is bounded by top_k.
    let queries = vec![
        Query::new("q1", "capital of France"),
        Query::new("q2", "systems programming language"),
    ];
    let retriever = LexicalRetriever::new(&client);
    let run = retriever.retrieve(&queries, 2, 50).await;

    assert_eq!(run.len(), 2);
    for scores in run.values() {
        assert!(scores.len() <= 2);
    }
    assert!(run["q1"].contains_key("d1"), "BM25 should surface d1 for q1");

    // Rerank: same candidate id set per query.
    let reranker = Reranker::new(Box::new(TermOverlapEncoder::new()));
    let reranked = reranker.rerank(&run, &queries, &corpus).await.expect("rerank");
    for (query_id, scores) in &run {
        let before: Vec<&String> = scores.keys().collect();
        let after: Vec<&String> = reranked[query_id].keys().collect();
        assert_eq!(before.len(), after.len());
    }

    // Evaluate both stages.
    let mut qrels = Qrels::new();
    qrels.insert(
        "q1".to_string(),
        BTreeMap::from([("d1".to_string(), 1)]),
    );
    qrels.insert(
        "q2".to_string(),
        BTreeMap::from([("d4".to_string(), 1)]),
    );

    let first = evaluate(&qrels, &run, 10).expect("evaluate first stage");
    let second = evaluate(&qrels, &reranked, 10).expect("evaluate reranked");
    assert!(first.ndcg > 0.0);
    assert!(second.ndcg > 0.0);

    client.delete_index().await.expect("cleanup");
}

#[tokio::test]
#[ignore = "Requires a running Elasticsearch cluster"]
async fn test_create_index_tolerates_existing() {
    if !elasticsearch_is_available().await {
        eprintln!("Elasticsearch not available — skipping test");
        return;
    }

    let config = ElasticConfig::new(elastic_url(), "searcheval-e2e-exists");
    let client = ElasticClient::new(config).expect("failed to build client");

    client.recreate_index().await.expect("first create");
    // Second create must reuse, not fail.
    client.create_index().await.expect("create on existing index");

    client.delete_index().await.expect("cleanup");
}
