//! Core data model shared by all pipeline stages.
//!
//! # Architecture
//!
//! ```ascii
//! Corpus ──► Indexer ──► Retriever ──► Reranker ──► Evaluator
//! (Document)            (Run)         (Run)        (Qrels + Run)
//! ```
//!
//! A [`Run`] is the standard IR exchange format between stages: an unordered
//! score map per query. Ordering is derived at consumption time by sorting on
//! score descending (ties broken by doc id for determinism).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A document in the corpus. Immutable once indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Corpus-unique document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document title (may be empty).
    #[serde(default)]
    pub title: String,
    /// Document body text.
    #[serde(default)]
    pub text: String,
}

impl Document {
    /// Create a document from owned or borrowed parts.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
        }
    }

    /// The passage text handed to the cross-encoder: `"title text"`, or just
    /// the body when the title is empty.
    pub fn passage(&self) -> String {
        if self.title.is_empty() {
            self.text.clone()
        } else {
            format!("{} {}", self.title, self.text)
        }
    }
}

/// A search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Query id, resolvable against the qrels.
    #[serde(rename = "_id")]
    pub id: String,
    /// Query text.
    pub text: String,
}

impl Query {
    /// Create a query from owned or borrowed parts.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Relevance judgment set: query id → (doc id → graded relevance).
///
/// Supplied externally, read-only. `BTreeMap` keeps iteration deterministic,
/// which the evaluator relies on for reproducible reports.
pub type Qrels = BTreeMap<String, BTreeMap<String, i32>>;

/// Ranking result: query id → (doc id → score).
///
/// Unordered pair set per query; use [`ranked`] to derive an ordering.
pub type Run = HashMap<String, HashMap<String, f32>>;

/// Sort a query's score map into a ranked list, score descending.
///
/// Ties are broken by doc id ascending so that identical inputs always
/// produce identical rankings.
pub fn ranked(scores: &HashMap<String, f32>) -> Vec<(&str, f32)> {
    let mut entries: Vec<(&str, f32)> = scores.iter().map(|(id, s)| (id.as_str(), *s)).collect();
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    entries
}
