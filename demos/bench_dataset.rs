//! Full retrieve-and-rerank benchmark over a local dataset directory.
//!
//! Requirements:
//! - Elasticsearch reachable (default `http://localhost:9200`)
//! - A rerank API endpoint (default `http://localhost:8080/rerank`), e.g. a
//!   text-embeddings-inference deployment of a cross-encoder
//! - An unpacked benchmark dataset (corpus.jsonl, queries.jsonl, qrels/test.tsv)
//!
//! Run with:
//!   cargo run --example bench_dataset -- datasets/scifact

use searcheval::{
    dataset, CrossEncoderConfig, ElasticConfig, HttpCrossEncoder, Pipeline, PipelineConfig,
    Reranker,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("searcheval=info")),
        )
        .init();

    let dataset_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "datasets/scifact".to_string());
    let elastic_url =
        std::env::var("ELASTICSEARCH_URL").unwrap_or_else(|_| "http://localhost:9200".to_string());
    let rerank_url = std::env::var("RERANK_URL")
        .unwrap_or_else(|_| "http://localhost:8080/rerank".to_string());

    let data = dataset::load_split(&dataset_dir, "test")?;

    let encoder = HttpCrossEncoder::new(CrossEncoderConfig::new(rerank_url))?;
    let elastic = ElasticConfig::new(elastic_url, "searcheval-bench").with_language("english");
    let pipeline = Pipeline::new(
        PipelineConfig::new(elastic).with_top_k(100),
        Reranker::new(Box::new(encoder)),
    )?;

    let report = pipeline.run(&data).await?;

    println!("indexed {} documents", report.indexed);
    println!("first stage: {}", report.first_stage);
    println!("reranked:    {}", report.reranked);
    println!(
        "nDCG@10 delta: {:+.4}",
        report.reranked.ndcg - report.first_stage.ndcg
    );
    Ok(())
}
