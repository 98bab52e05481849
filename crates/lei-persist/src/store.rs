//! Versioned snapshot store.
//!
//! Layout under the output root:
//!
//! ```text
//! legal_entities_{version}.parquet
//! relationships_{version}.parquet
//! quality_report_{version}.json
//! ```
//!
//! Writes go through a hidden temp file and a rename, so readers and
//! listings never observe a partial snapshot. [`SnapshotStore::write_run`]
//! stages every file of a run before renaming any of them and removes the
//! ones it renamed if a later rename fails. Two writers targeting the same
//! explicit version race; the last rename wins.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use lei_common::dedupe_keep_first;
use lei_model::{DatasetType, RunQualityReport};
use polars::prelude::{
    CsvWriter, DataFrame, ParquetCompression, ParquetReader, ParquetWriter, SerReader, SerWriter,
};

use crate::error::{PersistError, Result};
use crate::io::{StagedFile, commit_all, is_temp_name, stage, write_atomic};
use crate::version::{SnapshotVersion, timestamp_version, validate_version};

const SNAPSHOT_EXTENSION: &str = ".parquet";
const REPORT_PREFIX: &str = "quality_report_";
const REPORT_EXTENSION: &str = ".json";

/// Reads and writes versioned dataset snapshots under one root directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| PersistError::Io {
            operation: "create directory",
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self, dataset: DatasetType, version: &str) -> PathBuf {
        self.root
            .join(format!("{}_{version}{SNAPSHOT_EXTENSION}", dataset.as_str()))
    }

    pub fn quality_report_path(&self, version: &str) -> PathBuf {
        self.root
            .join(format!("{REPORT_PREFIX}{version}{REPORT_EXTENSION}"))
    }

    /// Writes `df` as a new snapshot and returns its path.
    ///
    /// Without a version, the current local time (`YYYYMMDD_HHMMSS`) is
    /// used. Rows repeating the dataset's uniqueness key are dropped,
    /// keeping the first occurrence.
    pub fn write(
        &self,
        dataset: DatasetType,
        df: &DataFrame,
        version: Option<&str>,
    ) -> Result<PathBuf> {
        let version = match version {
            Some(version) => {
                validate_version(version)?;
                version.to_string()
            }
            None => timestamp_version(),
        };
        let (staged, rows) = self.stage_snapshot(dataset, df, &version)?;
        let path = staged.commit()?;
        tracing::info!(
            dataset = %dataset,
            version = %version,
            rows,
            path = %path.display(),
            "Saved snapshot"
        );
        Ok(path)
    }

    /// Writes the snapshots and quality report of one run under `version`.
    ///
    /// Every file is staged before any is renamed into place. If staging
    /// fails nothing becomes visible; if a rename fails, files already
    /// renamed by this call are removed again. Returns the snapshot paths
    /// in input order followed by the report path.
    pub fn write_run(
        &self,
        snapshots: &[(DatasetType, DataFrame)],
        report: &RunQualityReport,
        version: &str,
    ) -> Result<Vec<PathBuf>> {
        validate_version(version)?;
        let mut staged = Vec::with_capacity(snapshots.len() + 1);
        for (dataset, df) in snapshots {
            let (file, rows) = self.stage_snapshot(*dataset, df, version)?;
            tracing::debug!(dataset = %dataset, version, rows, "Staged snapshot");
            staged.push(file);
        }
        staged.push(self.stage_quality_report(report, version)?);

        let paths = commit_all(staged)?;
        tracing::info!(version, files = paths.len(), "Saved run");
        Ok(paths)
    }

    fn stage_snapshot(
        &self,
        dataset: DatasetType,
        df: &DataFrame,
        version: &str,
    ) -> Result<(StagedFile, usize)> {
        let path = self.snapshot_path(dataset, version);
        let (mut df, dropped) = dedupe_keep_first(df, dataset.uniqueness_key()).map_err(|e| {
            PersistError::Polars {
                operation: "deduplicate",
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        if dropped > 0 {
            tracing::warn!(
                dataset = %dataset,
                dropped,
                key = ?dataset.uniqueness_key(),
                "Dropped duplicate records before writing snapshot"
            );
        }

        let staged = stage(&path, |file, temp_path| {
            ParquetWriter::new(BufWriter::new(file))
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map(|_| ())
                .map_err(|e| PersistError::Polars {
                    operation: "write",
                    path: temp_path.to_path_buf(),
                    message: e.to_string(),
                })
        })?;
        Ok((staged, df.height()))
    }

    /// Reads a snapshot.
    pub fn read(&self, dataset: DatasetType, version: &SnapshotVersion) -> Result<DataFrame> {
        let version = self.resolve_version(dataset, version)?;
        let path = self.snapshot_path(dataset, &version);
        let file = File::open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PersistError::SnapshotNotFound {
                    dataset,
                    version: version.clone(),
                    path: path.clone(),
                }
            } else {
                PersistError::Io {
                    operation: "read",
                    path: path.clone(),
                    source: e,
                }
            }
        })?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| PersistError::Polars {
                operation: "read",
                path: path.clone(),
                message: e.to_string(),
            })?;
        tracing::debug!(dataset = %dataset, version = %version, rows = df.height(), "Loaded snapshot");
        Ok(df)
    }

    /// Maps a selector to a concrete existing version.
    pub fn resolve_version(
        &self,
        dataset: DatasetType,
        version: &SnapshotVersion,
    ) -> Result<String> {
        match version {
            SnapshotVersion::Named(version) => {
                validate_version(version)?;
                let path = self.snapshot_path(dataset, version);
                if path.is_file() {
                    Ok(version.clone())
                } else {
                    Err(PersistError::SnapshotNotFound {
                        dataset,
                        version: version.clone(),
                        path,
                    })
                }
            }
            SnapshotVersion::Latest => self
                .list_versions(dataset)?
                .pop()
                .ok_or_else(|| PersistError::NoSnapshots {
                    dataset,
                    root: self.root.clone(),
                }),
        }
    }

    /// Existing versions of `dataset`, ascending.
    pub fn list_versions(&self, dataset: DatasetType) -> Result<Vec<String>> {
        let prefix = format!("{}_", dataset.as_str());
        self.list_matching(&prefix, SNAPSHOT_EXTENSION)
    }

    /// Existing versions of every dataset type.
    pub fn list_all_versions(&self) -> Result<BTreeMap<DatasetType, Vec<String>>> {
        DatasetType::ALL
            .iter()
            .map(|dataset| Ok((*dataset, self.list_versions(*dataset)?)))
            .collect()
    }

    /// Existing quality report versions, ascending.
    pub fn list_quality_reports(&self) -> Result<Vec<String>> {
        self.list_matching(REPORT_PREFIX, REPORT_EXTENSION)
    }

    fn list_matching(&self, prefix: &str, extension: &str) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| PersistError::Io {
            operation: "list",
            path: self.root.clone(),
            source: e,
        })?;
        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PersistError::Io {
                operation: "list",
                path: self.root.clone(),
                source: e,
            })?;
            if !entry.file_type().is_ok_and(|kind| kind.is_file()) {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if is_temp_name(name) {
                continue;
            }
            let Some(version) = name
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(extension))
            else {
                continue;
            };
            if validate_version(version).is_ok() {
                versions.push(version.to_string());
            }
        }
        versions.sort();
        Ok(versions)
    }

    /// Writes a snapshot as CSV and returns the CSV path.
    ///
    /// Defaults to `{dataset}_{version}.csv` next to the snapshot.
    pub fn export_flat(
        &self,
        dataset: DatasetType,
        version: &SnapshotVersion,
        destination: Option<&Path>,
    ) -> Result<PathBuf> {
        let resolved = self.resolve_version(dataset, version)?;
        let mut df = self.read(dataset, &SnapshotVersion::Named(resolved.clone()))?;
        let target = match destination {
            Some(path) => path.to_path_buf(),
            None => self
                .root
                .join(format!("{}_{resolved}.csv", dataset.as_str())),
        };
        write_atomic(&target, |file, temp_path| {
            CsvWriter::new(BufWriter::new(file))
                .include_header(true)
                .finish(&mut df)
                .map_err(|e| PersistError::Polars {
                    operation: "write",
                    path: temp_path.to_path_buf(),
                    message: e.to_string(),
                })
        })?;
        tracing::info!(
            dataset = %dataset,
            version = %resolved,
            rows = df.height(),
            path = %target.display(),
            "Exported snapshot"
        );
        Ok(target)
    }

    /// Writes the run's quality summaries as `quality_report_{version}.json`.
    pub fn write_quality_report(&self, report: &RunQualityReport, version: &str) -> Result<PathBuf> {
        validate_version(version)?;
        let path = self.stage_quality_report(report, version)?.commit()?;
        tracing::info!(version, path = %path.display(), "Saved quality report");
        Ok(path)
    }

    fn stage_quality_report(&self, report: &RunQualityReport, version: &str) -> Result<StagedFile> {
        let path = self.quality_report_path(version);
        let bytes = serde_json::to_vec_pretty(report).map_err(|e| PersistError::Serialization {
            path: path.clone(),
            source: e,
        })?;
        stage(&path, |file, temp_path| {
            use std::io::Write;
            file.write_all(&bytes).map_err(|e| PersistError::Io {
                operation: "write",
                path: temp_path.to_path_buf(),
                source: e,
            })
        })
    }

    /// Reads a stored quality report.
    pub fn read_quality_report(&self, version: &SnapshotVersion) -> Result<RunQualityReport> {
        let version = match version {
            SnapshotVersion::Named(version) => {
                validate_version(version)?;
                version.clone()
            }
            SnapshotVersion::Latest => self.list_quality_reports()?.pop().ok_or_else(|| {
                PersistError::QualityReportNotFound {
                    version: crate::version::LATEST.to_string(),
                    root: self.root.clone(),
                }
            })?,
        };
        let path = self.quality_report_path(&version);
        let bytes = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PersistError::QualityReportNotFound {
                    version: version.clone(),
                    root: self.root.clone(),
                }
            } else {
                PersistError::Io {
                    operation: "read",
                    path: path.clone(),
                    source: e,
                }
            }
        })?;
        serde_json::from_slice(&bytes).map_err(|e| PersistError::Serialization { path, source: e })
    }

    /// Writes a snapshot on the blocking thread pool.
    pub async fn write_async(
        &self,
        dataset: DatasetType,
        df: DataFrame,
        version: Option<String>,
    ) -> Result<PathBuf> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.write(dataset, &df, version.as_deref()))
            .await
            .map_err(|e| PersistError::TaskFailed { source: e })?
    }

    /// [`SnapshotStore::write_run`] on the blocking thread pool.
    pub async fn write_run_async(
        &self,
        snapshots: Vec<(DatasetType, DataFrame)>,
        report: RunQualityReport,
        version: String,
    ) -> Result<Vec<PathBuf>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.write_run(&snapshots, &report, &version))
            .await
            .map_err(|e| PersistError::TaskFailed { source: e })?
    }
}
