//! End-to-end normalization run.
//!
//! ```text
//! entities ──load──normalize──────────────┬──▶ valid LEI set
//!                                         │
//! relationships ──load──prepare──(await)──┴──▶ finish ──▶ persist
//! ```
//!
//! Entity normalization and relationship preparation run side by side on
//! the blocking pool. Relationship finishing needs the completed entity
//! output and awaits it. Nothing is written until every stage succeeded, and
//! the run's files are then renamed into place as one unit.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use lei_ingest::{IngestOptions, open_source};
use lei_model::{DatasetType, QualitySummary, RunQualityReport};
use lei_normalize::{
    EntityNormalizer, NormalizedDataset, PreparedRelationships, RelationshipNormalizer,
    SourceResolver, empty_canonical,
};
use lei_persist::{SnapshotStore, timestamp_version, validate_version};
use polars::prelude::DataFrame;
use tokio::task::{JoinHandle, spawn_blocking};
use tracing::{debug, info};

use crate::config::PipelineConfig;

/// Source files and target version of one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub entities: PathBuf,
    /// Relationship source; entity-only runs leave it unset.
    pub relationships: Option<PathBuf>,
    /// Snapshot version; the current local timestamp when unset.
    pub version: Option<String>,
}

/// What one dataset of a run produced.
#[derive(Debug, Clone)]
pub struct DatasetOutcome {
    pub dataset: DatasetType,
    pub source: PathBuf,
    pub snapshot: PathBuf,
    pub rows: usize,
    pub summary: QualitySummary,
    pub warnings: Vec<String>,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub version: String,
    pub output_dir: PathBuf,
    pub datasets: Vec<DatasetOutcome>,
    pub quality_report: PathBuf,
    pub elapsed_ms: u128,
}

impl RunOutcome {
    pub fn dataset(&self, dataset: DatasetType) -> Option<&DatasetOutcome> {
        self.datasets.iter().find(|outcome| outcome.dataset == dataset)
    }
}

/// Streams `path` batch by batch, resolving each batch to the canonical
/// schema before reading the next one.
///
/// A batch that maps no identifier column is kept with null identifiers;
/// the source fails only if no batch ever mapped one.
pub fn load_dataset(dataset: DatasetType, path: &Path, options: IngestOptions) -> Result<DataFrame> {
    let reader = open_source(path, options)
        .with_context(|| format!("open {dataset} source {}", path.display()))?;
    let format = reader.format();

    let mut resolver = SourceResolver::new(dataset);
    let mut combined = empty_canonical(dataset)?;
    let mut batches = 0usize;
    for batch in reader {
        let batch = batch.with_context(|| format!("read {}", path.display()))?;
        let resolved = resolver
            .resolve_batch(&batch)
            .with_context(|| format!("resolve columns of {}", path.display()))?;
        combined
            .vstack_mut(&resolved)
            .with_context(|| format!("append batch {} of {}", batches + 1, path.display()))?;
        batches += 1;
        debug!(dataset = %dataset, batch = batches, rows = combined.height(), "Appended batch");
    }
    resolver
        .finish()
        .with_context(|| format!("resolve columns of {}", path.display()))?;

    info!(
        dataset = %dataset,
        format = ?format,
        batches,
        records = combined.height(),
        "Loaded source"
    );
    Ok(combined)
}

/// Runs both normalizations and writes the snapshot pair and quality report.
pub async fn run_pipeline(config: &PipelineConfig, request: RunRequest) -> Result<RunOutcome> {
    let start = Instant::now();
    if let Some(version) = &request.version {
        validate_version(version)?;
    }
    let store = SnapshotStore::open(&config.output_dir)?;

    let entity_task = spawn_entities(config, request.entities.clone());
    let relationship_task = request
        .relationships
        .clone()
        .map(|path| spawn_relationships(config, path));

    // Join point: relationship integrity needs the finished entity set.
    let entities = entity_task
        .await
        .context("entity normalization task failed")??;
    let valid = entities.valid_leis();
    info!(valid_leis = valid.len(), "Entity normalization complete");

    let relationships = match relationship_task {
        Some(task) => {
            let (normalizer, prepared) = task
                .await
                .context("relationship preparation task failed")??;
            let finished = spawn_blocking(move || normalizer.finish(prepared, &valid))
                .await
                .context("relationship normalization task failed")??;
            Some(finished)
        }
        None => None,
    };

    let version = request.version.unwrap_or_else(timestamp_version);
    let mut run_report = RunQualityReport::new();
    let mut datasets = Vec::new();
    let mut snapshots = Vec::new();

    let sources = [Some(request.entities), request.relationships];
    let outputs = [Some(entities), relationships];
    for (normalized, source) in outputs.into_iter().zip(sources) {
        let (Some(normalized), Some(source)) = (normalized, source) else {
            continue;
        };
        let NormalizedDataset {
            dataset,
            data,
            report,
        } = normalized;
        let summary = report.summary();
        run_report.insert(dataset, summary.clone());
        datasets.push(DatasetOutcome {
            dataset,
            source,
            snapshot: store.snapshot_path(dataset, &version),
            rows: data.height(),
            summary,
            warnings: report.warnings,
        });
        snapshots.push((dataset, data));
    }

    // Snapshots and report become visible together or not at all.
    store
        .write_run_async(snapshots, run_report, version.clone())
        .await
        .with_context(|| format!("write snapshot version {version}"))?;
    let quality_report = store.quality_report_path(&version);
    let elapsed_ms = start.elapsed().as_millis();
    info!(version = %version, elapsed_ms, "Pipeline run complete");

    Ok(RunOutcome {
        version,
        output_dir: store.root().to_path_buf(),
        datasets,
        quality_report,
        elapsed_ms,
    })
}

fn spawn_entities(config: &PipelineConfig, path: PathBuf) -> JoinHandle<Result<NormalizedDataset>> {
    let dataset = DatasetType::LegalEntities;
    let options = config.ingest_options(dataset);
    let normalizer = EntityNormalizer::new(config.normalization_options());
    spawn_blocking(move || {
        let raw = load_dataset(dataset, &path, options)?;
        Ok(normalizer.normalize(&raw)?)
    })
}

fn spawn_relationships(
    config: &PipelineConfig,
    path: PathBuf,
) -> JoinHandle<Result<(RelationshipNormalizer, PreparedRelationships)>> {
    let dataset = DatasetType::Relationships;
    let options = config.ingest_options(dataset);
    let normalizer = RelationshipNormalizer::new(config.normalization_options());
    spawn_blocking(move || {
        let raw = load_dataset(dataset, &path, options)?;
        let prepared = normalizer.prepare(&raw)?;
        Ok((normalizer, prepared))
    })
}
