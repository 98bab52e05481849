//! Persistence error types.
//!
//! All store operations return structured errors that carry the paths
//! involved and, where useful, a remediation hint.

use std::path::PathBuf;

use lei_model::DatasetType;
use thiserror::Error;

/// Snapshot store error.
#[derive(Debug, Error)]
pub enum PersistError {
    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to move {temp_path} into place at {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Version string cannot be used as a snapshot key.
    #[error("invalid snapshot version '{version}': {reason}")]
    InvalidVersion { version: String, reason: &'static str },

    /// No snapshot of the dataset exists yet.
    #[error("no {dataset} snapshots found in {root}")]
    NoSnapshots { dataset: DatasetType, root: PathBuf },

    /// The requested snapshot version does not exist.
    #[error("{dataset} snapshot '{version}' not found at {path}")]
    SnapshotNotFound {
        dataset: DatasetType,
        version: String,
        path: PathBuf,
    },

    /// No quality report exists for the requested version.
    #[error("quality report '{version}' not found in {root}")]
    QualityReportNotFound { version: String, root: PathBuf },

    /// Columnar encode or decode failed.
    #[error("failed to {operation} {path}: {message}")]
    Polars {
        operation: &'static str,
        path: PathBuf,
        message: String,
    },

    /// Quality report (de)serialization failed.
    #[error("failed to serialize quality report {path}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A blocking store task panicked or was cancelled.
    #[error("snapshot store task failed")]
    TaskFailed {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl PersistError {
    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" || *operation == "list" {
                    Some("Check that the output directory exists and is readable.".into())
                } else {
                    Some("Check that you have permission to write to the output directory.".into())
                }
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or choose a different output directory.".into())
            }
            Self::InvalidVersion { .. } => Some(
                "Use a plain name such as 20240101_120000 without path separators.".into(),
            ),
            Self::NoSnapshots { .. } => {
                Some("Run the pipeline first to produce a snapshot.".into())
            }
            Self::SnapshotNotFound { .. } | Self::QualityReportNotFound { .. } => {
                Some("List the available versions with `lei-pipeline versions`.".into())
            }
            Self::Polars { .. } | Self::Serialization { .. } | Self::TaskFailed { .. } => None,
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistError>;
