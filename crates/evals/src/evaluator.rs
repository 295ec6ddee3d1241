//! Per-query relevance scoring.
//!
//! [`RelevanceEvaluator`] is the seam the aggregator depends on; the bundled
//! [`TrecEvaluator`] scores the `map` and precision-at-k metric families with
//! trec_eval-compatible key names (`"map"`, `"P_5"`, ...). Runs are treated
//! as opaque score maps; only judged queries (present in both the run and the
//! judgment set) are scored.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rankeval_core::{Error, PerQueryResult, Qrels, Result, RunName, RunScores};

/// Precision cutoffs reported by the precision-at-k family.
pub const PRECISION_CUTOFFS: [usize; 7] = [5, 10, 15, 20, 30, 50, 100];

/// A group of related metrics an evaluator can be configured to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MetricFamily {
    /// Mean average precision (`"map"`)
    Map,
    /// Precision at fixed cutoffs (`"P_5"`, `"P_10"`, ...)
    PrecisionAtK,
}

/// Scores one run against a fixed judgment set.
pub trait RelevanceEvaluator {
    /// Produces per-query metric scores for `scores`.
    ///
    /// `name` identifies the run in error reports; it must not affect the
    /// scores themselves.
    fn evaluate(&self, name: &RunName, scores: &RunScores) -> Result<PerQueryResult>;
}

/// Built-in evaluator for the `map` and precision-at-k families.
///
/// Documents are ranked by score descending, ties broken by document id
/// descending, matching trec_eval. Queries in the run that carry no
/// judgments are skipped; a judged query with no relevant documents scores
/// `map` = 0.0.
#[derive(Debug, Clone)]
pub struct TrecEvaluator {
    qrels: Qrels,
    families: BTreeSet<MetricFamily>,
}

impl TrecEvaluator {
    /// Creates an evaluator over `qrels` reporting the given families.
    ///
    /// Validation happens at [`evaluate`](RelevanceEvaluator::evaluate) so
    /// that failures carry the run they were detected on.
    pub fn new(qrels: Qrels, families: impl IntoIterator<Item = MetricFamily>) -> Self {
        Self {
            qrels,
            families: families.into_iter().collect(),
        }
    }

    fn score_query(&self, judged: &BTreeMap<String, i32>, ranked: &[(&str, f64)]) -> BTreeMap<String, f64> {
        let relevant = |doc: &str| judged.get(doc).copied().unwrap_or(0) > 0;
        let total_relevant = judged.values().filter(|grade| **grade > 0).count();

        let mut entry = BTreeMap::new();

        if self.families.contains(&MetricFamily::Map) {
            let mut hits = 0usize;
            let mut precision_sum = 0.0;
            for (rank, (doc, _)) in ranked.iter().enumerate() {
                if relevant(doc) {
                    hits += 1;
                    precision_sum += hits as f64 / (rank + 1) as f64;
                }
            }
            let ap = if total_relevant > 0 {
                precision_sum / total_relevant as f64
            } else {
                0.0
            };
            entry.insert("map".to_string(), ap);
        }

        if self.families.contains(&MetricFamily::PrecisionAtK) {
            for k in PRECISION_CUTOFFS {
                let hits = ranked.iter().take(k).filter(|(doc, _)| relevant(doc)).count();
                entry.insert(format!("P_{k}"), hits as f64 / k as f64);
            }
        }

        entry
    }
}

impl RelevanceEvaluator for TrecEvaluator {
    fn evaluate(&self, name: &RunName, scores: &RunScores) -> Result<PerQueryResult> {
        if self.qrels.is_empty() {
            return Err(Error::evaluation(name.to_string(), "judgment set is empty"));
        }
        if self.families.is_empty() {
            return Err(Error::evaluation(
                name.to_string(),
                "no metric families selected",
            ));
        }

        let mut results = PerQueryResult::new();
        for (query_id, docs) in scores {
            let Some(judged) = self.qrels.get(query_id) else {
                continue;
            };

            let mut ranked: Vec<(&str, f64)> = docs
                .iter()
                .map(|(doc, score)| (doc.as_str(), *score))
                .collect();
            if let Some((doc, score)) = ranked.iter().find(|(_, s)| !s.is_finite()) {
                return Err(Error::evaluation(
                    name.to_string(),
                    format!("non-finite score {score} for document '{doc}' in query '{query_id}'"),
                ));
            }
            ranked.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| b.0.cmp(a.0))
            });

            results.insert(query_id.clone(), self.score_query(judged, &ranked));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run_name() -> RunName {
        RunName::new("top", "20")
    }

    fn qrels(entries: &[(&str, &[(&str, i32)])]) -> Qrels {
        entries
            .iter()
            .map(|(q, docs)| {
                let docs = docs.iter().map(|(d, g)| (d.to_string(), *g)).collect();
                (q.to_string(), docs)
            })
            .collect()
    }

    fn run(entries: &[(&str, &[(&str, f64)])]) -> RunScores {
        entries
            .iter()
            .map(|(q, docs)| {
                let docs = docs.iter().map(|(d, s)| (d.to_string(), *s)).collect();
                (q.to_string(), docs)
            })
            .collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn map_matches_hand_computation() {
        // Ranking by score: d1 (rel), d2, d3 (rel). Two relevant docs total,
        // so AP = (1/1 + 2/3) / 2.
        let evaluator = TrecEvaluator::new(
            qrels(&[("q1", &[("d1", 1), ("d2", 0), ("d3", 2)])]),
            [MetricFamily::Map],
        );
        let results = evaluator
            .evaluate(
                &run_name(),
                &run(&[("q1", &[("d1", 0.9), ("d2", 0.8), ("d3", 0.7)])]),
            )
            .unwrap();

        assert_close(results["q1"]["map"], (1.0 + 2.0 / 3.0) / 2.0);
    }

    #[test]
    fn precision_at_k_counts_relevant_in_prefix() {
        let evaluator = TrecEvaluator::new(
            qrels(&[("q1", &[("d1", 1), ("d3", 1)])]),
            [MetricFamily::PrecisionAtK],
        );
        let results = evaluator
            .evaluate(
                &run_name(),
                &run(&[("q1", &[("d1", 0.9), ("d2", 0.8), ("d3", 0.7)])]),
            )
            .unwrap();

        let entry = &results["q1"];
        assert_close(entry["P_5"], 2.0 / 5.0);
        assert_close(entry["P_10"], 2.0 / 10.0);
        assert_eq!(entry.len(), PRECISION_CUTOFFS.len());
    }

    #[test]
    fn ties_break_by_document_id_descending() {
        // d2 and d1 share a score; trec_eval places the lexicographically
        // larger docno first, so d2 (relevant) takes rank 1.
        let evaluator = TrecEvaluator::new(qrels(&[("q1", &[("d2", 1)])]), [MetricFamily::Map]);
        let results = evaluator
            .evaluate(&run_name(), &run(&[("q1", &[("d1", 0.5), ("d2", 0.5)])]))
            .unwrap();

        assert_close(results["q1"]["map"], 1.0);
    }

    #[test]
    fn unjudged_queries_are_skipped() {
        let evaluator = TrecEvaluator::new(qrels(&[("q1", &[("d1", 1)])]), [MetricFamily::Map]);
        let results = evaluator
            .evaluate(
                &run_name(),
                &run(&[("q1", &[("d1", 0.9)]), ("q2", &[("d1", 0.9)])]),
            )
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(results.contains_key("q1"));
    }

    #[test]
    fn no_relevant_documents_scores_zero_map() {
        let evaluator = TrecEvaluator::new(qrels(&[("q1", &[("d1", 0)])]), [MetricFamily::Map]);
        let results = evaluator
            .evaluate(&run_name(), &run(&[("q1", &[("d1", 0.9)])]))
            .unwrap();

        assert_close(results["q1"]["map"], 0.0);
    }

    #[test]
    fn non_finite_score_is_an_evaluation_error() {
        let evaluator = TrecEvaluator::new(qrels(&[("q1", &[("d1", 1)])]), [MetricFamily::Map]);
        let err = evaluator
            .evaluate(&run_name(), &run(&[("q1", &[("d1", f64::NAN)])]))
            .unwrap_err();

        assert!(matches!(err, Error::Evaluation { .. }), "got {err:?}");
    }

    #[test]
    fn empty_judgments_are_rejected() {
        let evaluator = TrecEvaluator::new(Qrels::new(), [MetricFamily::Map]);
        let err = evaluator
            .evaluate(&run_name(), &run(&[("q1", &[("d1", 0.9)])]))
            .unwrap_err();

        assert!(matches!(err, Error::Evaluation { .. }), "got {err:?}");
    }
}
