//! Source format detection and reader options.

use std::path::Path;

use lei_model::DatasetType;

use crate::error::{IngestError, Result};

/// Default number of records per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Default preview limits used by `--preview`.
pub const ENTITY_PREVIEW_RECORDS: usize = 50_000;
pub const RELATIONSHIP_PREVIEW_RECORDS: usize = 200_000;

/// On-disk layout of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Delimited text with a single header row.
    Csv,
    /// Element-streamed markup, one element per record.
    Xml,
}

impl SourceFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(SourceFormat::Csv),
            Some("xml") => Ok(SourceFormat::Xml),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Markup element that wraps one record of the given dataset.
pub fn default_record_tag(dataset: DatasetType) -> &'static str {
    match dataset {
        DatasetType::LegalEntities => "LEIRecord",
        DatasetType::Relationships => "RelationshipRecord",
    }
}

/// Options controlling how a source file is streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Records per emitted batch (at least 1).
    pub batch_size: usize,
    /// Stop after this many records.
    pub max_records: Option<usize>,
    /// Record element name for XML sources, matched by local name.
    pub record_tag: String,
}

impl IngestOptions {
    pub fn new(dataset: DatasetType) -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_records: None,
            record_tag: default_record_tag(dataset).to_string(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_max_records(mut self, max_records: Option<usize>) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn with_record_tag(mut self, tag: impl Into<String>) -> Self {
        self.record_tag = tag.into();
        self
    }
}
