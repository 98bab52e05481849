//! CLI argument definitions for the LEI pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use lei_model::{DatasetType, DuplicatePolicy};
use lei_persist::SnapshotVersion;

#[derive(Parser)]
#[command(
    name = "lei-pipeline",
    version,
    about = "Normalize LEI and relationship files into versioned snapshots",
    long_about = "Normalize legal entity (Level 1) and ownership relationship (Level 2)\n\
                  records into versioned Parquet snapshots with quality reports.\n\n\
                  Reads delimited text (.csv) and element-streamed markup (.xml)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Pipeline configuration file (TOML).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize source files and write a snapshot pair plus quality report.
    Run(RunArgs),

    /// List stored snapshot versions.
    Versions(VersionsArgs),

    /// Export a stored snapshot as CSV.
    Export(ExportArgs),

    /// Print a stored quality report.
    Report(ReportArgs),
}

/// Snapshot directory shared by every subcommand.
#[derive(Args)]
pub struct StoreArgs {
    /// Snapshot directory (default: config `output_dir`, then ./snapshots).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Legal entity source file (.csv or .xml).
    #[arg(long = "entities", value_name = "PATH")]
    pub entities: PathBuf,

    /// Relationship source file (.csv or .xml).
    #[arg(long = "relationships", value_name = "PATH")]
    pub relationships: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Snapshot version (default: current local time, YYYYMMDD_HHMMSS).
    #[arg(long = "snapshot-version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Records per ingestion batch.
    #[arg(long = "batch-size", value_name = "N")]
    pub batch_size: Option<usize>,

    /// Maximum entity records to read.
    #[arg(long = "max-entities", value_name = "N")]
    pub max_entities: Option<usize>,

    /// Maximum relationship records to read.
    #[arg(long = "max-relationships", value_name = "N")]
    pub max_relationships: Option<usize>,

    /// Cap unset record limits at 50,000 entities and 200,000 relationships.
    #[arg(long = "preview")]
    pub preview: bool,

    /// Markup element holding one entity record.
    #[arg(long = "entity-tag", value_name = "TAG")]
    pub entity_tag: Option<String>,

    /// Markup element holding one relationship record.
    #[arg(long = "relationship-tag", value_name = "TAG")]
    pub relationship_tag: Option<String>,

    /// What to do with records sharing a key (report, reject).
    #[arg(long = "duplicates", value_name = "POLICY")]
    pub duplicate_policy: Option<DuplicatePolicy>,
}

#[derive(Args)]
pub struct VersionsArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Only list this dataset (legal_entities, relationships).
    #[arg(long = "dataset", value_name = "DATASET")]
    pub dataset: Option<DatasetType>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Dataset to export (legal_entities, relationships).
    #[arg(value_name = "DATASET")]
    pub dataset: DatasetType,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Snapshot version or "latest".
    #[arg(long = "snapshot-version", value_name = "VERSION", default_value = "latest")]
    pub version: SnapshotVersion,

    /// Destination CSV (default: <DIR>/<DATASET>_<VERSION>.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Report version or "latest".
    #[arg(long = "snapshot-version", value_name = "VERSION", default_value = "latest")]
    pub version: SnapshotVersion,

    /// Print the stored JSON document instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
