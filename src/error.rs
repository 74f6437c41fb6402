//! Error handling shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = DatasetError> = std::result::Result<T, E>;

/// Every failure is fatal to the load operation that raised it.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset configuration cannot produce usable training data.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No formatter is registered under the requested name.
    #[error("no formatter registered under {name:?}")]
    UnknownFormatter {
        /// Name as it was looked up (already lowercased).
        name: String,
    },
    /// The speaker-aware split cannot reach its target without emptying a speaker.
    #[error(
        "cannot move {target} samples to the eval split: speakers only have {headroom} samples to spare"
    )]
    SplitUnreachable {
        /// Requested eval split size.
        target: usize,
        /// Sum over speakers of `count - 1`.
        headroom: usize,
    },
    /// A sample has no entry in the alignment-mask manifest.
    #[error("no attention file for key {key:?} in {manifest:?}")]
    MissingAttentionKey {
        /// Sample key that was looked up.
        key: String,
        /// Manifest the lookup ran against.
        manifest: PathBuf,
    },
    /// A manifest line could not be parsed.
    #[error("malformed manifest {path:?} at line {line}: {reason}")]
    MalformedManifest {
        /// Manifest file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
    /// Filesystem IO error with the path that was being accessed.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error.
        source: std::io::Error,
        /// Path associated with the failure.
        path: PathBuf,
    },
    /// JSON config or symbol embedding failed to parse.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Delimited manifest failed to parse.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Arrow array construction or conversion failed.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    /// Parquet read or write failed.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// Bad glob pattern or unreadable glob match.
    #[error("glob error: {0}")]
    Glob(String),
    /// Catch-all variant for invariants that should not occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<glob::PatternError> for DatasetError {
    fn from(err: glob::PatternError) -> Self {
        Self::Glob(err.to_string())
    }
}

impl From<glob::GlobError> for DatasetError {
    fn from(err: glob::GlobError) -> Self {
        Self::Glob(err.to_string())
    }
}

impl DatasetError {
    /// Wraps an IO error together with the path being accessed.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}
