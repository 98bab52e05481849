//! Versioned persistence of normalized LEI datasets.
//!
//! Snapshots are Parquet files keyed by dataset type and version; the
//! quality summaries of one pipeline run are stored next to them as JSON
//! under the same version. Every write is atomic, and a run's files become
//! visible together or not at all.

mod error;
mod io;
mod store;
mod version;

// === Error Types ===
pub use error::{PersistError, Result};

// === Store ===
pub use io::{
    StagedFile, TEMP_SUFFIX, commit_all, is_temp_name, stage, temp_path_for, write_atomic,
};
pub use store::SnapshotStore;
pub use version::{LATEST, SnapshotVersion, TIMESTAMP_FORMAT, timestamp_version, validate_version};
