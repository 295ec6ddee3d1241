//! Retrieval metric aggregation and phase comparison for rankeval.
//!
//! This crate provides:
//! - A relevance-evaluation seam and a built-in trec_eval-style evaluator
//!   (MAP, precision-at-k)
//! - [`MetricsAggregator`]: per-run scoring, averaging, artifact persistence
//! - [`compare_phases`]: tabular comparison of averaged metrics across
//!   experiment phases and cutoffs
//!
//! The aggregator and the comparator share no state; they are coupled only
//! through the persisted artifacts behind the [`store`] traits.

pub mod aggregator;
pub mod comparator;
pub mod evaluator;
pub mod store;
pub mod table;

pub use aggregator::MetricsAggregator;
pub use comparator::{compare_phases, DEFAULT_K_VALUES};
pub use evaluator::{MetricFamily, RelevanceEvaluator, TrecEvaluator, PRECISION_CUTOFFS};
pub use store::{ArtifactSink, AverageSource, FsArtifactSink, FsAverageSource, MemoryStore};
pub use table::ComparisonTable;
