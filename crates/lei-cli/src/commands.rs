use std::path::PathBuf;

use anyhow::{Context, Result};
use lei_cli::config::PipelineConfig;
use lei_cli::pipeline::{RunOutcome, RunRequest, run_pipeline};
use lei_ingest::{ENTITY_PREVIEW_RECORDS, RELATIONSHIP_PREVIEW_RECORDS};
use lei_model::{DatasetType, RunQualityReport};
use lei_persist::SnapshotStore;

use crate::cli::{ExportArgs, ReportArgs, RunArgs, StoreArgs, VersionsArgs};
use crate::summary::{print_quality_report, print_versions};

pub async fn run_run(mut config: PipelineConfig, args: RunArgs) -> Result<RunOutcome> {
    apply_run_overrides(&mut config, &args);
    let request = RunRequest {
        entities: args.entities,
        relationships: args.relationships,
        version: args.version,
    };
    run_pipeline(&config, request).await
}

pub fn run_versions(config: &PipelineConfig, args: &VersionsArgs) -> Result<()> {
    let store = open_store(config, &args.store)?;
    let versions = match args.dataset {
        Some(dataset) => [(dataset, store.list_versions(dataset)?)].into_iter().collect(),
        None => store.list_all_versions()?,
    };
    print_versions(store.root(), &versions);
    Ok(())
}

pub fn run_export(config: &PipelineConfig, args: &ExportArgs) -> Result<PathBuf> {
    let store = open_store(config, &args.store)?;
    let path = store
        .export_flat(args.dataset, &args.version, args.output.as_deref())
        .with_context(|| format!("export {} snapshot", args.dataset))?;
    println!("Exported {} ({}) to {}", args.dataset, args.version, path.display());
    Ok(path)
}

pub fn run_report(config: &PipelineConfig, args: &ReportArgs) -> Result<RunQualityReport> {
    let store = open_store(config, &args.store)?;
    let report = store.read_quality_report(&args.version)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_quality_report(&args.version.to_string(), &report);
    }
    Ok(report)
}

fn open_store(config: &PipelineConfig, args: &StoreArgs) -> Result<SnapshotStore> {
    let root = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    Ok(SnapshotStore::open(root)?)
}

/// Flags win over config file values.
fn apply_run_overrides(config: &mut PipelineConfig, args: &RunArgs) {
    if let Some(dir) = &args.store.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(policy) = args.duplicate_policy {
        config.duplicate_policy = policy;
    }

    let limits = [
        (DatasetType::LegalEntities, args.max_entities, ENTITY_PREVIEW_RECORDS),
        (
            DatasetType::Relationships,
            args.max_relationships,
            RELATIONSHIP_PREVIEW_RECORDS,
        ),
    ];
    for (dataset, limit, preview) in limits {
        let source = config.source_mut(dataset);
        if limit.is_some() {
            source.max_records = limit;
        } else if args.preview && source.max_records.is_none() {
            source.max_records = Some(preview);
        }
    }

    if let Some(tag) = &args.entity_tag {
        config.entities.record_tag = Some(tag.clone());
    }
    if let Some(tag) = &args.relationship_tag {
        config.relationships.record_tag = Some(tag.clone());
    }
}
