//! Canonical data model for legal entity (Level 1) and ownership
//! relationship (Level 2) snapshots.

pub mod dataset;
pub mod error;
pub mod fields;
pub mod options;
pub mod quality;
pub mod records;
pub mod status;

pub use dataset::DatasetType;
pub use error::{ModelError, Result};
pub use fields::{
    CanonicalField, ENTITY_FIELDS, ENTITY_ID_COLUMN, FieldKind, RELATIONSHIP_FIELDS,
};
pub use options::{DuplicatePolicy, NormalizationOptions};
pub use quality::{QualityReport, QualitySummary, ReferentialIntegrityCounts, RunQualityReport};
pub use records::{NormalizedEntity, NormalizedRelationship};
pub use status::{DEFAULT_STATUS, EntityStatus, RelationshipStatus};
