//! Core types for the rankeval retrieval-evaluation system
//!
//! This crate provides the foundational pieces shared across rankeval:
//!
//! - **Judgments and runs**: qrels and per-run retrieval scores
//! - **Run naming**: typed `{label, parameter}` run identifiers
//! - **Metric records**: per-query results and averaged metrics
//! - **Error handling**: unified error types
//!

pub mod error;
pub mod metrics;
pub mod run;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use metrics::{AverageMetrics, DEFAULT_METRICS};
pub use run::{PerQueryResult, Qrels, RunName, RunScores};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
