use std::path::PathBuf;
use thiserror::Error;

/// Result type for rankeval operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rankeval operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A run name that does not encode a cutoff parameter
    #[error("invalid run name '{name}': {message}")]
    InvalidRunName { name: String, message: String },

    /// The evaluator could not score a run
    #[error("evaluation failed for run '{run}': {message}")]
    Evaluation { run: String, message: String },

    /// An artifact could not be written to durable storage
    #[error("persistence error at {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A run produced no per-query results to average over
    #[error("run '{run}' produced no query results")]
    EmptyResult { run: String },

    /// A located artifact that could not be interpreted
    #[error("malformed artifact at {location}: {message}")]
    MalformedArtifact { location: String, message: String },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates an invalid run name error
    pub fn invalid_run_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRunName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an evaluation error
    pub fn evaluation(run: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluation {
            run: run.into(),
            message: message.into(),
        }
    }

    /// Creates a persistence error
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Creates an empty result error
    pub fn empty_result(run: impl Into<String>) -> Self {
        Self::EmptyResult { run: run.into() }
    }

    /// Creates a malformed artifact error
    pub fn malformed_artifact(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedArtifact {
            location: location.into(),
            message: message.into(),
        }
    }
}
