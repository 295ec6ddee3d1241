//! Artifact persistence.
//!
//! The aggregator and the comparator never call each other; they meet at the
//! persistence seam defined here. [`ArtifactSink`] is the write side used by
//! the aggregator, [`AverageSource`] the read side used by the comparator.
//! The filesystem implementations encode the artifact naming convention
//! (`per_query_metrics_top_<k>.json`, `average_metrics_top_<k>.json`);
//! [`MemoryStore`] implements both traits for tests that should not touch
//! the filesystem.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use rankeval_core::{AverageMetrics, Error, PerQueryResult, Result};

/// Write side of the persistence seam: one call per run.
pub trait ArtifactSink {
    /// Persists both artifacts for the run identified by `parameter`.
    fn put(
        &self,
        parameter: &str,
        per_query: &PerQueryResult,
        average: &AverageMetrics,
    ) -> Result<()>;
}

/// Read side of the persistence seam: average-metrics records for one phase.
pub trait AverageSource {
    /// Loads the average-metrics record for `cutoff`.
    ///
    /// Returns `Ok(None)` when no artifact exists for that cutoff; parse
    /// failures are [`Error::MalformedArtifact`].
    fn load(&self, cutoff: u32) -> Result<Option<AverageMetrics>>;

    /// Human-readable location of the artifact for `cutoff`, for warnings
    /// and error reports.
    fn location(&self, cutoff: u32) -> String;
}

fn per_query_filename(parameter: &str) -> String {
    format!("per_query_metrics_top_{parameter}.json")
}

fn average_filename(parameter: &str) -> String {
    format!("average_metrics_top_{parameter}.json")
}

/// Writes artifacts as pretty-printed JSON under a destination directory.
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    dir: PathBuf,
}

impl FsArtifactSink {
    /// Creates a sink rooted at `dir`. The directory itself is created on
    /// first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The destination directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_pretty<T: Serialize>(&self, filename: String, value: &T) -> Result<PathBuf> {
        let path = self.dir.join(filename);
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| Error::persistence(path.clone(), e.into()))?;
        fs::write(&path, json).map_err(|e| Error::persistence(path.clone(), e))?;
        Ok(path)
    }
}

impl ArtifactSink for FsArtifactSink {
    fn put(
        &self,
        parameter: &str,
        per_query: &PerQueryResult,
        average: &AverageMetrics,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::persistence(self.dir.clone(), e))?;

        let per_query_path = self.write_pretty(per_query_filename(parameter), per_query)?;
        info!("per-query metrics saved to {}", per_query_path.display());

        let average_path = self.write_pretty(average_filename(parameter), average)?;
        info!("average metrics saved to {}", average_path.display());

        Ok(())
    }
}

/// Reads average-metrics records through a path template with one `{}` slot
/// for the cutoff, e.g. `"results/phase_1/average_metrics_top_{}.json"`.
#[derive(Debug, Clone)]
pub struct FsAverageSource {
    prefix: String,
    suffix: String,
}

impl FsAverageSource {
    /// Validates the template; exactly one `{}` slot is required.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        match template.split_once("{}") {
            Some((prefix, suffix)) if !suffix.contains("{}") => Ok(Self {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
            _ => Err(Error::malformed_artifact(
                template,
                "path template must contain exactly one '{}' slot for the cutoff",
            )),
        }
    }

    fn path_for(&self, cutoff: u32) -> PathBuf {
        PathBuf::from(format!("{}{}{}", self.prefix, cutoff, self.suffix))
    }
}

impl AverageSource for FsAverageSource {
    fn load(&self, cutoff: u32) -> Result<Option<AverageMetrics>> {
        let path = self.path_for(cutoff);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            Error::malformed_artifact(path.display().to_string(), e.to_string())
        })
    }

    fn location(&self, cutoff: u32) -> String {
        self.path_for(cutoff).display().to_string()
    }
}

/// In-memory store implementing both sides of the seam, keyed by parameter
/// token. Intended for tests; single-threaded like the rest of the system.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<String, (PerQueryResult, AverageMetrics)>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The persisted per-query result for `parameter`, if any.
    pub fn per_query(&self, parameter: &str) -> Option<PerQueryResult> {
        self.records
            .borrow()
            .get(parameter)
            .map(|(per_query, _)| per_query.clone())
    }

    /// The persisted average-metrics record for `parameter`, if any.
    pub fn average(&self, parameter: &str) -> Option<AverageMetrics> {
        self.records
            .borrow()
            .get(parameter)
            .map(|(_, average)| average.clone())
    }

    /// Number of persisted run artifacts.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether the store holds no artifacts.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl ArtifactSink for MemoryStore {
    fn put(
        &self,
        parameter: &str,
        per_query: &PerQueryResult,
        average: &AverageMetrics,
    ) -> Result<()> {
        self.records
            .borrow_mut()
            .insert(parameter.to_string(), (per_query.clone(), average.clone()));
        Ok(())
    }
}

impl AverageSource for MemoryStore {
    fn load(&self, cutoff: u32) -> Result<Option<AverageMetrics>> {
        Ok(self.average(&cutoff.to_string()))
    }

    fn location(&self, cutoff: u32) -> String {
        format!("memory:{cutoff}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn artifact_filenames_follow_the_convention() {
        assert_eq!(per_query_filename("20"), "per_query_metrics_top_20.json");
        assert_eq!(average_filename("20"), "average_metrics_top_20.json");
    }

    #[test]
    fn template_requires_exactly_one_slot() {
        assert!(FsAverageSource::new("results/average_metrics_top_{}.json").is_ok());
        assert!(FsAverageSource::new("results/average_metrics_top_20.json").is_err());
        assert!(FsAverageSource::new("results/{}/average_metrics_top_{}.json").is_err());
    }

    #[test]
    fn template_substitutes_the_cutoff() {
        let source = FsAverageSource::new("results/phase_1/average_metrics_top_{}.json").unwrap();
        assert_eq!(
            source.location(30),
            "results/phase_1/average_metrics_top_30.json"
        );
    }

    #[test]
    fn memory_store_round_trips_records() {
        let store = MemoryStore::new();
        let average: AverageMetrics = [("map".to_string(), 0.5)].into_iter().collect();
        store.put("20", &PerQueryResult::new(), &average).unwrap();

        assert_eq!(store.load(20).unwrap(), Some(average));
        assert_eq!(store.load(30).unwrap(), None);
    }
}
