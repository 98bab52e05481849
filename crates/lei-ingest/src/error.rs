//! Error types for record ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a source file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is neither `.csv` nor `.xml`.
    #[error("unsupported source format for {path} (expected .csv or .xml)")]
    UnsupportedFormat { path: PathBuf },

    /// Malformed delimited text.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed markup.
    #[error("failed to parse XML {path} at byte {position}: {message}")]
    XmlParse {
        path: PathBuf,
        position: u64,
        message: String,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

pub(crate) fn open_error(path: &std::path::Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}
