//! Typed views of normalized records, handed to graph loading.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::status::{EntityStatus, RelationshipStatus};

/// One normalized legal entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntity {
    pub lei: String,
    pub legal_name: String,
    pub previous_name: Option<String>,
    pub legal_form_code: Option<String>,
    pub legal_form_text: Option<String>,
    pub entity_status: EntityStatus,
    pub entity_category: Option<String>,
    pub registration_status: Option<String>,
    pub jurisdiction: Option<String>,
    pub country_of_incorporation: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub registration_authority_id: Option<String>,
    pub registration_authority_entity_id: Option<String>,
    pub managing_lou: Option<String>,
    pub validation_authority_id: Option<String>,
    pub validation_authority_entity_id: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub latest_update_date: Option<NaiveDate>,
    pub next_renewal_date: Option<NaiveDate>,
    #[serde(rename = "entity_id")]
    pub entity_id: String,
}

/// One normalized ownership relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRelationship {
    pub relationship_id: Option<String>,
    pub child_lei: String,
    pub parent_lei: String,
    pub relationship_type: Option<String>,
    pub relationship_status: RelationshipStatus,
    pub ownership_percentage: Option<f64>,
    pub relationship_start_date: Option<NaiveDate>,
    pub relationship_end_date: Option<NaiveDate>,
}
