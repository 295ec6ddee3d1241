//! Judgment, run, and run-naming types.
//!
//! All nested maps are `BTreeMap`s so that iteration (and therefore JSON
//! serialization of persisted artifacts) is deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Ground-truth relevance grades, keyed by query id then document id.
pub type Qrels = BTreeMap<String, BTreeMap<String, i32>>;

/// Retrieval scores for one run, keyed by query id then document id.
pub type RunScores = BTreeMap<String, BTreeMap<String, f64>>;

/// Per-query metric scores produced by an evaluator, keyed by query id
/// then metric name.
pub type PerQueryResult = BTreeMap<String, BTreeMap<String, f64>>;

/// Identifies one retrieval configuration.
///
/// Runs are conventionally named `"<label>_<k>"` (e.g. `"top_20"`), where the
/// second segment is the cutoff used to produce the run. The parameter is an
/// explicit field here rather than something re-derived from the name each
/// time it is needed; [`RunName::parse`] accepts the legacy string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunName {
    label: String,
    parameter: String,
}

impl RunName {
    /// Creates a run name from its parts.
    pub fn new(label: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            parameter: parameter.into(),
        }
    }

    /// Parses the `"<label>_<k>"` convention.
    ///
    /// The parameter is the second underscore-delimited segment; any further
    /// segments are ignored, matching how run names have historically been
    /// interpreted. Fails with [`Error::InvalidRunName`] when no second
    /// segment exists.
    pub fn parse(name: &str) -> Result<Self> {
        let mut segments = name.split('_');
        let label = segments.next().unwrap_or_default();
        match segments.next() {
            Some(parameter) if !parameter.is_empty() => Ok(Self::new(label, parameter)),
            _ => Err(Error::invalid_run_name(
                name,
                "expected an underscore-delimited parameter segment (e.g. \"top_20\")",
            )),
        }
    }

    /// The configuration label, e.g. `"top"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The cutoff parameter token, e.g. `"20"`.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }
}

impl FromStr for RunName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RunName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.label, self.parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_extracts_second_segment() {
        let name = RunName::parse("top_20").unwrap();
        assert_eq!(name.label(), "top");
        assert_eq!(name.parameter(), "20");
        assert_eq!(name.to_string(), "top_20");
    }

    #[test]
    fn parse_ignores_trailing_segments() {
        let name = RunName::parse("top_20_wide").unwrap();
        assert_eq!(name.parameter(), "20");
    }

    #[test]
    fn parse_rejects_missing_parameter() {
        for bad in ["top", "top_", "", "_"] {
            let err = RunName::parse(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidRunName { .. }),
                "expected InvalidRunName for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn from_str_round_trips() {
        let name: RunName = "bm25_50".parse().unwrap();
        assert_eq!(name, RunName::new("bm25", "50"));
    }
}
