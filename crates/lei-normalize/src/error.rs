//! Error types for normalization.

use lei_model::DatasetType;
use thiserror::Error;

/// Fatal normalization failures.
///
/// Per-record problems never surface here; they are counted in the
/// run's quality report.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// None of the dataset's key fields could be mapped from the source.
    #[error(
        "cannot resolve {dataset} schema: no column maps to {expected}; source columns: [{}]",
        .columns.join(", ")
    )]
    UnresolvableSchema {
        dataset: DatasetType,
        expected: String,
        columns: Vec<String>,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for NormalizeError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;
