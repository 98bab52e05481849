//! Pipeline configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. Every key is optional:
//!
//! ```toml
//! output_dir = "snapshots"
//! batch_size = 10000
//! duplicate_policy = "report"
//!
//! [entities]
//! max_records = 50000
//! record_tag = "LEIRecord"
//!
//! [relationships]
//! record_tag = "RelationshipRecord"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lei_ingest::{DEFAULT_BATCH_SIZE, IngestOptions};
use lei_model::{DatasetType, DuplicatePolicy, NormalizationOptions};
use serde::{Deserialize, Serialize};

/// Output root used when neither the config file nor a flag names one.
pub const DEFAULT_OUTPUT_DIR: &str = "snapshots";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory holding snapshots and quality reports.
    pub output_dir: PathBuf,
    /// Records per ingestion batch.
    pub batch_size: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub entities: SourceConfig,
    pub relationships: SourceConfig,
}

/// Per-dataset ingestion settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Stop after this many records (unlimited when unset).
    pub max_records: Option<usize>,
    /// Markup record element; the dataset's standard tag when unset.
    pub record_tag: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            batch_size: DEFAULT_BATCH_SIZE,
            duplicate_policy: DuplicatePolicy::default(),
            entities: SourceConfig::default(),
            relationships: SourceConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reads a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded pipeline config");
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn source(&self, dataset: DatasetType) -> &SourceConfig {
        match dataset {
            DatasetType::LegalEntities => &self.entities,
            DatasetType::Relationships => &self.relationships,
        }
    }

    pub fn source_mut(&mut self, dataset: DatasetType) -> &mut SourceConfig {
        match dataset {
            DatasetType::LegalEntities => &mut self.entities,
            DatasetType::Relationships => &mut self.relationships,
        }
    }

    pub fn ingest_options(&self, dataset: DatasetType) -> IngestOptions {
        let source = self.source(dataset);
        let options = IngestOptions::new(dataset)
            .with_batch_size(self.batch_size)
            .with_max_records(source.max_records);
        match &source.record_tag {
            Some(tag) => options.with_record_tag(tag.clone()),
            None => options,
        }
    }

    pub fn normalization_options(&self) -> NormalizationOptions {
        NormalizationOptions::new().with_duplicate_policy(self.duplicate_policy)
    }
}
