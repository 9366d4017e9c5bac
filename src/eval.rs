//! Ranking-quality evaluation against relevance judgments.
//!
//! The primary metric is nDCG@10, computed per query and aggregated as an
//! unweighted arithmetic mean (so the result is invariant to query order).
//! The report also carries the companion metrics customarily published next
//! to nDCG on retrieval benchmarks: MAP, recall, precision, and MRR, all at
//! the same cutoff.
//!
//! # Conventions
//!
//! Following trec_eval:
//!
//! ```ascii
//! DCG@k  = Σ_{i=1..k}  rel_i / log2(i + 1)        (linear gain)
//! IDCG@k = DCG@k of the judgment-sorted ideal ranking
//! nDCG@k = DCG@k / IDCG@k                          (0 when IDCG = 0)
//! ```
//!
//! A document is *relevant* when its graded judgment is > 0. Negative
//! grades are treated as 0 gain.
//!
//! # Worked example
//!
//! qrels `{"q1": {"d1": 1}}`, run `{"q1": {"d1": 0.9, "d2": 0.1}}`
//! → d1 ranks first, DCG = IDCG = 1, nDCG@10 = 1.0.

use std::collections::BTreeMap;

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::types::{ranked, Qrels, Run};

/// Standard cutoff for the primary metric.
pub const DEFAULT_K: usize = 10;

/// Aggregated evaluation of one run at a single cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalReport {
    /// Rank cutoff all metrics were computed at.
    pub k: usize,
    /// Number of evaluated queries.
    pub queries: usize,
    /// Mean nDCG@k (primary metric).
    pub ndcg: f64,
    /// Mean average precision at k.
    pub map: f64,
    /// Mean recall@k.
    pub recall: f64,
    /// Mean precision@k.
    pub precision: f64,
    /// Mean reciprocal rank within the top k.
    pub mrr: f64,
    /// Per-query nDCG@k, keyed by query id.
    pub per_query_ndcg: BTreeMap<String, f64>,
}

impl std::fmt::Display for EvalReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NDCG@{k}: {:.4} | MAP@{k}: {:.4} | Recall@{k}: {:.4} | P@{k}: {:.4} | MRR@{k}: {:.4} ({} queries)",
            self.ndcg,
            self.map,
            self.recall,
            self.precision,
            self.mrr,
            self.queries,
            k = self.k
        )
    }
}

/// Per-query metric values at one cutoff.
#[derive(Debug, Clone, Copy, Default)]
struct QueryMetrics {
    ndcg: f64,
    map: f64,
    recall: f64,
    precision: f64,
    mrr: f64,
}

fn log2_discount(rank: usize) -> f64 {
    // rank is 0-based; position i contributes 1/log2(i + 2).
    ((rank + 2) as f64).log2()
}

fn query_metrics(judgments: &BTreeMap<String, i32>, scores: &[(&str, f32)], k: usize) -> QueryMetrics {
    let relevant_total = judgments.values().filter(|&&rel| rel > 0).count();

    // Ideal DCG from the judgment grades, best first.
    let mut grades: Vec<i32> = judgments.values().copied().filter(|&g| g > 0).collect();
    grades.sort_unstable_by(|a, b| b.cmp(a));
    let idcg: f64 = grades
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, &g)| f64::from(g) / log2_discount(i))
        .sum();

    let mut dcg = 0.0;
    let mut hits = 0usize;
    let mut ap_sum = 0.0;
    let mut mrr = 0.0;

    for (i, (doc_id, _)) in scores.iter().take(k).enumerate() {
        let grade = judgments.get(*doc_id).copied().unwrap_or(0);
        if grade > 0 {
            dcg += f64::from(grade) / log2_discount(i);
            hits += 1;
            ap_sum += hits as f64 / (i + 1) as f64;
            if mrr == 0.0 {
                mrr = 1.0 / (i + 1) as f64;
            }
        }
    }

    QueryMetrics {
        ndcg: if idcg > 0.0 { dcg / idcg } else { 0.0 },
        map: if relevant_total > 0 {
            ap_sum / relevant_total as f64
        } else {
            0.0
        },
        recall: if relevant_total > 0 {
            hits as f64 / relevant_total as f64
        } else {
            0.0
        },
        precision: hits as f64 / k as f64,
        mrr,
    }
}

/// Evaluate a run against qrels at cutoff `k`.
///
/// Every query id in the run must be resolvable in the qrels
/// ([`PipelineError::MissingJudgments`] otherwise); an empty run is a
/// configuration error since no mean is defined over zero queries.
pub fn evaluate(qrels: &Qrels, run: &Run, k: usize) -> Result<EvalReport> {
    if k == 0 {
        return Err(PipelineError::ConfigError("cutoff k must be > 0".into()));
    }
    if run.is_empty() {
        return Err(PipelineError::ConfigError(
            "cannot evaluate an empty run".into(),
        ));
    }

    let mut totals = QueryMetrics::default();
    let mut per_query_ndcg = BTreeMap::new();

    for (query_id, scores) in run {
        let judgments = qrels
            .get(query_id)
            .ok_or_else(|| PipelineError::MissingJudgments(query_id.clone()))?;

        let ranking = ranked(scores);
        let m = query_metrics(judgments, &ranking, k);

        totals.ndcg += m.ndcg;
        totals.map += m.map;
        totals.recall += m.recall;
        totals.precision += m.precision;
        totals.mrr += m.mrr;
        per_query_ndcg.insert(query_id.clone(), m.ndcg);
    }

    let n = run.len() as f64;
    let report = EvalReport {
        k,
        queries: run.len(),
        ndcg: totals.ndcg / n,
        map: totals.map / n,
        recall: totals.recall / n,
        precision: totals.precision / n,
        mrr: totals.mrr / n,
        per_query_ndcg,
    };

    info!("{report}");
    Ok(report)
}

/// Mean nDCG@k of a run; the primary metric on its own.
pub fn ndcg_at(qrels: &Qrels, run: &Run, k: usize) -> Result<f64> {
    Ok(evaluate(qrels, run, k)?.ndcg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn qrels_of(entries: &[(&str, &[(&str, i32)])]) -> Qrels {
        entries
            .iter()
            .map(|(q, docs)| {
                (
                    q.to_string(),
                    docs.iter()
                        .map(|(d, r)| (d.to_string(), *r))
                        .collect::<BTreeMap<_, _>>(),
                )
            })
            .collect()
    }

    fn run_of(entries: &[(&str, &[(&str, f32)])]) -> Run {
        entries
            .iter()
            .map(|(q, docs)| {
                (
                    q.to_string(),
                    docs.iter()
                        .map(|(d, s)| (d.to_string(), *s))
                        .collect::<HashMap<_, _>>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_worked_example_perfect_ndcg() {
        let qrels = qrels_of(&[("q1", &[("d1", 1)])]);
        let run = run_of(&[("q1", &[("d1", 0.9), ("d2", 0.1)])]);

        let ndcg = ndcg_at(&qrels, &run, 10).unwrap();
        assert!((ndcg - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_relevant_ranked_second() {
        let qrels = qrels_of(&[("q1", &[("d1", 1)])]);
        let run = run_of(&[("q1", &[("d1", 0.1), ("d2", 0.9)])]);

        // DCG = 1/log2(3), IDCG = 1/log2(2) = 1.
        let ndcg = ndcg_at(&qrels, &run, 10).unwrap();
        assert!((ndcg - 1.0 / 3.0_f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn test_graded_relevance_ideal_ordering() {
        // Ideal puts grade 2 first; the run puts it second.
        let qrels = qrels_of(&[("q1", &[("d1", 1), ("d2", 2)])]);
        let run = run_of(&[("q1", &[("d1", 0.9), ("d2", 0.1)])]);

        let dcg = 1.0 / 2.0_f64.log2() + 2.0 / 3.0_f64.log2();
        let idcg = 2.0 / 2.0_f64.log2() + 1.0 / 3.0_f64.log2();
        let ndcg = ndcg_at(&qrels, &run, 10).unwrap();
        assert!((ndcg - dcg / idcg).abs() < 1e-9);
    }

    #[test]
    fn test_cutoff_excludes_deep_hits() {
        // The only relevant doc sits at rank 3; with k=2 it scores zero.
        let qrels = qrels_of(&[("q1", &[("d3", 1)])]);
        let run = run_of(&[("q1", &[("d1", 0.9), ("d2", 0.8), ("d3", 0.7)])]);

        assert_eq!(ndcg_at(&qrels, &run, 2).unwrap(), 0.0);
        assert!(ndcg_at(&qrels, &run, 3).unwrap() > 0.0);
    }

    #[test]
    fn test_mean_is_unweighted() {
        let qrels = qrels_of(&[("q1", &[("d1", 1)]), ("q2", &[("d1", 1)])]);
        // q1 perfect, q2 zero.
        let run = run_of(&[
            ("q1", &[("d1", 0.9), ("d2", 0.1)]),
            ("q2", &[("d2", 0.9), ("d3", 0.1)]),
        ]);

        let report = evaluate(&qrels, &run, 10).unwrap();
        assert!((report.ndcg - 0.5).abs() < 1e-9);
        assert_eq!(report.queries, 2);
    }

    #[test]
    fn test_mean_invariant_to_query_order() {
        let qrels = qrels_of(&[("q1", &[("d1", 1)]), ("q2", &[("d2", 2)])]);
        let forward = run_of(&[
            ("q1", &[("d1", 0.9), ("d2", 0.1)]),
            ("q2", &[("d1", 0.9), ("d2", 0.1)]),
        ]);
        // Same content, inserted in the other order.
        let backward = run_of(&[
            ("q2", &[("d1", 0.9), ("d2", 0.1)]),
            ("q1", &[("d1", 0.9), ("d2", 0.1)]),
        ]);

        let a = evaluate(&qrels, &forward, 10).unwrap();
        let b = evaluate(&qrels, &backward, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_judgments_is_error() {
        let qrels = qrels_of(&[("q1", &[("d1", 1)])]);
        let run = run_of(&[("unjudged", &[("d1", 0.9)])]);

        let err = evaluate(&qrels, &run, 10).unwrap_err();
        assert!(matches!(err, PipelineError::MissingJudgments(q) if q == "unjudged"));
    }

    #[test]
    fn test_empty_run_is_error() {
        let qrels = qrels_of(&[("q1", &[("d1", 1)])]);
        let err = evaluate(&qrels, &Run::new(), 10).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigError(_)));
    }

    #[test]
    fn test_zero_cutoff_is_error() {
        let qrels = qrels_of(&[("q1", &[("d1", 1)])]);
        let run = run_of(&[("q1", &[("d1", 0.9)])]);
        assert!(evaluate(&qrels, &run, 0).is_err());
    }

    #[test]
    fn test_all_zero_grades_score_zero() {
        let qrels = qrels_of(&[("q1", &[("d1", 0)])]);
        let run = run_of(&[("q1", &[("d1", 0.9)])]);

        let report = evaluate(&qrels, &run, 10).unwrap();
        assert_eq!(report.ndcg, 0.0);
        assert_eq!(report.recall, 0.0);
    }

    #[test]
    fn test_companion_metrics() {
        // Two relevant docs, one retrieved at rank 1, one missed entirely.
        let qrels = qrels_of(&[("q1", &[("d1", 1), ("d9", 1)])]);
        let run = run_of(&[("q1", &[("d1", 0.9), ("d2", 0.1)])]);

        let report = evaluate(&qrels, &run, 10).unwrap();
        assert!((report.recall - 0.5).abs() < 1e-9);
        assert!((report.precision - 0.1).abs() < 1e-9); // 1 hit / k=10
        assert!((report.mrr - 1.0).abs() < 1e-9);
        assert!((report.map - 0.5).abs() < 1e-9); // (1/1) / 2 relevant
    }

    #[test]
    fn test_mrr_second_rank() {
        let qrels = qrels_of(&[("q1", &[("d2", 1)])]);
        let run = run_of(&[("q1", &[("d1", 0.9), ("d2", 0.8)])]);

        let report = evaluate(&qrels, &run, 10).unwrap();
        assert!((report.mrr - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_query_result_scores_zero_but_counts() {
        let qrels = qrels_of(&[("q1", &[("d1", 1)]), ("q2", &[("d1", 1)])]);
        let mut run = run_of(&[("q1", &[("d1", 0.9)])]);
        run.insert("q2".to_string(), HashMap::new());

        let report = evaluate(&qrels, &run, 10).unwrap();
        assert_eq!(report.queries, 2);
        assert!((report.ndcg - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_report_display() {
        let qrels = qrels_of(&[("q1", &[("d1", 1)])]);
        let run = run_of(&[("q1", &[("d1", 0.9)])]);
        let report = evaluate(&qrels, &run, 10).unwrap();

        let rendered = report.to_string();
        assert!(rendered.contains("NDCG@10: 1.0000"));
        assert!(rendered.contains("1 queries"));
    }

    #[test]
    fn test_score_ties_broken_by_doc_id() {
        // d1 and d2 tie; deterministic tie-break ranks d1 first.
        let qrels = qrels_of(&[("q1", &[("d1", 1)])]);
        let run = run_of(&[("q1", &[("d1", 0.5), ("d2", 0.5)])]);

        let ndcg = ndcg_at(&qrels, &run, 10).unwrap();
        assert!((ndcg - 1.0).abs() < 1e-9);
    }
}
