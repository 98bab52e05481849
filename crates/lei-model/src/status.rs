//! Closed status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Registration status of a legal entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    #[default]
    Active,
    Inactive,
    Merged,
    Obsolete,
    PendingArchival,
}

impl EntityStatus {
    pub const VALUES: &'static [&'static str] =
        &["ACTIVE", "INACTIVE", "MERGED", "OBSOLETE", "PENDING_ARCHIVAL"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "ACTIVE",
            EntityStatus::Inactive => "INACTIVE",
            EntityStatus::Merged => "MERGED",
            EntityStatus::Obsolete => "OBSOLETE",
            EntityStatus::PendingArchival => "PENDING_ARCHIVAL",
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(EntityStatus::Active),
            "INACTIVE" => Ok(EntityStatus::Inactive),
            "MERGED" => Ok(EntityStatus::Merged),
            "OBSOLETE" => Ok(EntityStatus::Obsolete),
            "PENDING_ARCHIVAL" => Ok(EntityStatus::PendingArchival),
            _ => Err(ModelError::UnknownStatus {
                field: "entityStatus",
                value: s.to_string(),
            }),
        }
    }
}

/// Status of a relationship record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipStatus {
    #[default]
    Active,
    Inactive,
    Obsolete,
}

impl RelationshipStatus {
    pub const VALUES: &'static [&'static str] = &["ACTIVE", "INACTIVE", "OBSOLETE"];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Active => "ACTIVE",
            RelationshipStatus::Inactive => "INACTIVE",
            RelationshipStatus::Obsolete => "OBSOLETE",
        }
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(RelationshipStatus::Active),
            "INACTIVE" => Ok(RelationshipStatus::Inactive),
            "OBSOLETE" => Ok(RelationshipStatus::Obsolete),
            _ => Err(ModelError::UnknownStatus {
                field: "relationshipStatus",
                value: s.to_string(),
            }),
        }
    }
}

/// Value substituted for statuses outside the closed set.
pub const DEFAULT_STATUS: &str = "ACTIVE";
