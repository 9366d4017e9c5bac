//! Term overlap cross-encoder.
//!
//! A local, deterministic scorer using Jaccard-like term overlap. No model
//! download, no API key: useful for tests, offline runs, and as a sanity
//! baseline against the hosted model.
//!
//! # Algorithm
//!
//! ```ascii
//! Query Terms:  {capital, of, france}
//!                      │
//! Passage:      "The capital of France is Paris"
//!                      │
//! Score = |query ∩ passage| / |query| = 3/3 = 1.0
//! ```
//!
//! # Limitations
//!
//! - No IDF weighting (rare terms not prioritized)
//! - No term frequency consideration
//! - No length normalization

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::Result;

use super::traits::CrossEncoder;

/// Local overlap-based cross-encoder.
pub struct TermOverlapEncoder {
    model: String,
}

impl TermOverlapEncoder {
    /// Create a new overlap encoder.
    pub fn new() -> Self {
        Self {
            model: "term-overlap".to_string(),
        }
    }
}

impl Default for TermOverlapEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Alias used by tests that just need any working [`CrossEncoder`].
pub type MockCrossEncoder = TermOverlapEncoder;

#[async_trait]
impl CrossEncoder for TermOverlapEncoder {
    fn name(&self) -> &str {
        "term-overlap"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn score(&self, query: &str, passages: &[String]) -> Result<Vec<f32>> {
        let query_lower = query.to_lowercase();
        let query_terms: HashSet<&str> = query_lower.split_whitespace().collect();
        let denom = query_terms.len().max(1) as f32;

        let scores = passages
            .iter()
            .map(|passage| {
                let passage_lower = passage.to_lowercase();
                let passage_terms: HashSet<&str> = passage_lower.split_whitespace().collect();
                query_terms.intersection(&passage_terms).count() as f32 / denom
            })
            .collect();

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overlap_scores_aligned_to_input() {
        let encoder = TermOverlapEncoder::new();
        let passages = vec![
            "Tokyo is the capital of Japan.".to_string(),
            "The capital of France is Paris.".to_string(),
        ];

        let scores = encoder.score("capital of france", &passages).await.unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores[1] > scores[0]);
    }

    #[tokio::test]
    async fn test_overlap_case_insensitive() {
        let encoder = TermOverlapEncoder::new();
        let passages = vec!["CAPITAL OF FRANCE".to_string()];
        let scores = encoder.score("capital of france", &passages).await.unwrap();
        assert!((scores[0] - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_overlap_empty_passages() {
        let encoder = TermOverlapEncoder::new();
        let scores = encoder.score("anything", &[]).await.unwrap();
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn test_overlap_empty_query_scores_zero() {
        let encoder = TermOverlapEncoder::new();
        let scores = encoder.score("", &["some text".to_string()]).await.unwrap();
        assert_eq!(scores, vec![0.0]);
    }
}
