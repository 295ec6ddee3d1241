//! Averaged metric records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::run::PerQueryResult;

/// Metric keys averaged by default: MAP plus precision at the standard
/// cutoffs.
pub const DEFAULT_METRICS: [&str; 5] = ["map", "P_5", "P_10", "P_15", "P_20"];

/// Mean of each requested metric across every query of a per-query result.
///
/// Serializes as a flat JSON object (`{"map": 0.42, "P_5": 0.6, ...}`), which
/// is the artifact format read back during phase comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AverageMetrics {
    scores: BTreeMap<String, f64>,
}

impl AverageMetrics {
    /// Folds a per-query result into one averaged record.
    ///
    /// Every query in `per_query` counts toward the divisor; a metric absent
    /// from a query's entry contributes 0.0 to that metric's sum. Returns
    /// `None` when there are no queries to average over, leaving the
    /// zero-division case to the caller.
    pub fn from_per_query(per_query: &PerQueryResult, metrics: &[&str]) -> Option<Self> {
        let num_queries = per_query.len();
        if num_queries == 0 {
            return None;
        }

        let scores = metrics
            .iter()
            .map(|metric| {
                let sum: f64 = per_query
                    .values()
                    .map(|entry| entry.get(*metric).copied().unwrap_or(0.0))
                    .sum();
                (metric.to_string(), sum / num_queries as f64)
            })
            .collect();

        Some(Self { scores })
    }

    /// The averaged score for one metric, if present in the record.
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.scores.get(metric).copied()
    }

    /// Number of metrics in the record.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the record holds no metrics.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterates metric/score pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for AverageMetrics {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}
