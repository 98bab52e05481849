//! Normalization options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What normalization does with records sharing a uniqueness key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Count duplicates and warn; keep every record.
    #[default]
    Report,
    /// Keep the first record of each key and drop the rest as invalid.
    Reject,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::Report => "report",
            DuplicatePolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(DuplicatePolicy::Report),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(format!(
                "unknown duplicate policy '{other}' (expected report or reject)"
            )),
        }
    }
}

/// Options shared by the entity and relationship normalizers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationOptions {
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl NormalizationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
