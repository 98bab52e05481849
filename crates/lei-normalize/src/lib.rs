//! Normalization of LEI and relationship batches.
//!
//! Stages, in the order the normalizers run them:
//!
//! - [`schema::resolve`]: source columns to the canonical column set
//!   ([`SourceResolver`] for streamed batches)
//! - [`coerce::coerce`]: per-kind type coercion, never drops rows
//! - [`validate::filter_required`]: drops records missing required fields
//! - [`integrity::enforce_referential_integrity`]: relationships only
//! - [`standardize::standardize_status`]: closes status enumerations
//! - [`duplicates::handle_duplicates`]: counts (and optionally rejects) duplicates
//! - [`ids::append_entity_ids`]: entities only
//!
//! Relationship normalization is split into [`RelationshipNormalizer::prepare`]
//! and [`RelationshipNormalizer::finish`]; the latter takes the
//! [`ValidLeiSet`] produced by a completed entity normalization.

pub mod coerce;
pub mod duplicates;
pub mod entity;
pub mod error;
pub mod ids;
pub mod integrity;
mod output;
pub mod records;
pub mod relationship;
pub mod schema;
pub mod standardize;
pub mod validate;

pub use entity::EntityNormalizer;
pub use error::{NormalizeError, Result};
pub use ids::entity_id;
pub use integrity::ValidLeiSet;
pub use output::NormalizedDataset;
pub use records::{entity_records, relationship_records};
pub use relationship::{PreparedRelationships, RelationshipNormalizer};
pub use schema::{SourceResolver, empty_canonical, resolve};
