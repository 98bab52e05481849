//! Dataset types handled by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::fields::{CanonicalField, ENTITY_FIELDS, RELATIONSHIP_FIELDS};
use crate::status::{EntityStatus, RelationshipStatus};

/// The two record streams the pipeline normalizes and persists.
///
/// The string form (`legal_entities`, `relationships`) is also the snapshot
/// file prefix and the key of each summary in a quality report document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetType {
    /// Level 1 records: one row per legal entity.
    LegalEntities,
    /// Level 2 records: one row per child/parent ownership link.
    Relationships,
}

impl DatasetType {
    pub const ALL: [DatasetType; 2] = [DatasetType::LegalEntities, DatasetType::Relationships];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::LegalEntities => "legal_entities",
            DatasetType::Relationships => "relationships",
        }
    }

    /// Canonical fields in output column order.
    pub fn fields(&self) -> &'static [CanonicalField] {
        match self {
            DatasetType::LegalEntities => ENTITY_FIELDS,
            DatasetType::Relationships => RELATIONSHIP_FIELDS,
        }
    }

    /// Looks up a canonical field by name.
    pub fn field(&self, name: &str) -> Option<&'static CanonicalField> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// Fields every surviving record must carry (non-null, non-empty).
    pub fn required_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
            .collect()
    }

    /// Uniqueness key used by duplicate detection and the write-time guard.
    pub fn uniqueness_key(&self) -> &'static [&'static str] {
        match self {
            DatasetType::LegalEntities => &["lei"],
            DatasetType::Relationships => &["childLei", "parentLei"],
        }
    }

    /// Status column and its closed set of admissible values.
    pub fn status_field(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            DatasetType::LegalEntities => ("entityStatus", EntityStatus::VALUES),
            DatasetType::Relationships => ("relationshipStatus", RelationshipStatus::VALUES),
        }
    }

    /// Label used in log lines.
    pub fn record_label(&self) -> &'static str {
        match self {
            DatasetType::LegalEntities => "LEI",
            DatasetType::Relationships => "relationship",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legal_entities" => Ok(DatasetType::LegalEntities),
            "relationships" => Ok(DatasetType::Relationships),
            _ => Err(ModelError::UnknownDatasetType {
                name: s.to_string(),
            }),
        }
    }
}
