//! Per-run metric aggregation.

use tracing::info;

use rankeval_core::{AverageMetrics, Error, Result, RunName, RunScores};

use crate::evaluator::RelevanceEvaluator;
use crate::store::ArtifactSink;

/// Reduces runs to averaged metrics and persists both artifacts per run.
///
/// Stateless apart from the evaluator it delegates per-query scoring to;
/// each call is a single pass over the supplied runs in their given order.
#[derive(Debug)]
pub struct MetricsAggregator<E> {
    evaluator: E,
}

impl<E: RelevanceEvaluator> MetricsAggregator<E> {
    /// Creates an aggregator delegating per-query scoring to `evaluator`.
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    /// Computes and persists metrics for every run, in order.
    ///
    /// Each run is scored by the evaluator, folded to an [`AverageMetrics`]
    /// record over the requested `metrics` and written through `sink` as one
    /// per-query artifact plus one average artifact, keyed by the run's
    /// parameter. Runs already written stay on disk if a later run fails.
    ///
    /// A run whose evaluation covers zero queries is an
    /// [`Error::EmptyResult`]; the average is never a division by zero.
    pub fn compute_metrics<S: ArtifactSink>(
        &self,
        runs: &[(RunName, RunScores)],
        sink: &S,
        metrics: &[&str],
    ) -> Result<Vec<(RunName, AverageMetrics)>> {
        let mut averages = Vec::with_capacity(runs.len());
        for (name, scores) in runs {
            let average = self.process_run(name, scores, sink, metrics)?;
            averages.push((name.clone(), average));
        }
        Ok(averages)
    }

    /// As [`compute_metrics`](Self::compute_metrics), for runs still keyed by
    /// their conventional `"<label>_<k>"` string names.
    ///
    /// A malformed name fails with [`Error::InvalidRunName`] when its run is
    /// reached; earlier runs have been persisted by then.
    pub fn compute_metrics_named<S: ArtifactSink>(
        &self,
        runs: &[(String, RunScores)],
        sink: &S,
        metrics: &[&str],
    ) -> Result<Vec<(RunName, AverageMetrics)>> {
        let mut averages = Vec::with_capacity(runs.len());
        for (name, scores) in runs {
            let name = RunName::parse(name)?;
            let average = self.process_run(&name, scores, sink, metrics)?;
            averages.push((name, average));
        }
        Ok(averages)
    }

    fn process_run<S: ArtifactSink>(
        &self,
        name: &RunName,
        scores: &RunScores,
        sink: &S,
        metrics: &[&str],
    ) -> Result<AverageMetrics> {
        info!("computing metrics for run with k = {}", name.parameter());

        let per_query = self.evaluator.evaluate(name, scores)?;
        let average = AverageMetrics::from_per_query(&per_query, metrics)
            .ok_or_else(|| Error::empty_result(name.to_string()))?;

        sink.put(name.parameter(), &per_query, &average)?;
        Ok(average)
    }
}
