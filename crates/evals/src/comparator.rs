//! Cross-phase metric comparison.

use tracing::warn;

use rankeval_core::{Error, Result};

use crate::store::AverageSource;
use crate::table::ComparisonTable;

/// Cutoffs compared by default.
pub const DEFAULT_K_VALUES: [u32; 3] = [20, 30, 50];

/// Loads averaged metrics for each phase at each cutoff and reshapes them
/// into one table, rows keyed by cutoff (ascending), columns labeled
/// `"<phase> MAP"` for the first metric and `"<phase> avgPre@<k>"` for the
/// rest.
///
/// A missing artifact is recoverable: that phase contributes no columns to
/// that row and a warning is logged, so partial comparisons stay usable. A
/// located artifact that cannot be parsed, or that lacks one of the
/// requested `metrics`, is an [`Error::MalformedArtifact`] and aborts the
/// comparison.
pub fn compare_phases(
    phases: &[(String, &dyn AverageSource)],
    k_values: &[u32],
    metrics: &[&str],
) -> Result<ComparisonTable> {
    let mut table = ComparisonTable::new();

    for &k in k_values {
        table.ensure_row(k);
        for (phase, source) in phases {
            let Some(record) = source.load(k)? else {
                warn!("average-metrics artifact not found: {}", source.location(k));
                continue;
            };

            for (position, metric) in metrics.iter().enumerate() {
                let value = record.get(metric).ok_or_else(|| {
                    Error::malformed_artifact(
                        source.location(k),
                        format!("missing metric key '{metric}'"),
                    )
                })?;
                table.insert(k, column_label(phase, metric, position == 0), value);
            }
        }
    }

    Ok(table)
}

/// The first requested metric is the primary one and keeps the `MAP` label;
/// the rest drop their 2-character family prefix (`P_5` -> `avgPre@5`).
fn column_label(phase: &str, metric: &str, primary: bool) -> String {
    if primary {
        format!("{phase} MAP")
    } else {
        format!("{phase} avgPre@{}", metric.get(2..).unwrap_or(""))
    }
}
