//! Snapshot version keys.

use std::fmt;
use std::str::FromStr;

use chrono::Local;

use crate::error::{PersistError, Result};

/// Reserved selector for the newest version.
pub const LATEST: &str = "latest";

/// Format of generated versions, e.g. `20240131_094500`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Which snapshot to read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SnapshotVersion {
    /// Lexicographically greatest existing version.
    #[default]
    Latest,
    Named(String),
}

impl SnapshotVersion {
    pub fn named(version: impl Into<String>) -> Self {
        Self::Named(version.into())
    }
}

impl fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotVersion::Latest => f.write_str(LATEST),
            SnapshotVersion::Named(version) => f.write_str(version),
        }
    }
}

impl FromStr for SnapshotVersion {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(LATEST) {
            return Ok(SnapshotVersion::Latest);
        }
        validate_version(trimmed)?;
        Ok(SnapshotVersion::Named(trimmed.to_string()))
    }
}

/// Version derived from the local clock at second resolution.
pub fn timestamp_version() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Checks that `version` can be embedded in a snapshot file name.
pub fn validate_version(version: &str) -> Result<()> {
    let reason = if version.is_empty() {
        Some("version is empty")
    } else if version.contains(['/', '\\']) {
        Some("version contains a path separator")
    } else if version.contains("..") {
        Some("version contains '..'")
    } else if version.eq_ignore_ascii_case(LATEST) {
        Some("'latest' is reserved")
    } else if version.starts_with('.') {
        Some("version starts with '.'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(PersistError::InvalidVersion {
            version: version.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
