//! Canonical field catalogues and their source-column synonyms.
//!
//! Each dataset type has a static, ordered list of canonical fields. The
//! synonym list of a field is priority ordered: the first synonym present in
//! a source batch wins. Synonyms cover flat CSV headers of the published
//! GLEIF file revisions, the snake_case names of older preprocessing output
//! and the dotted element paths emitted by the XML reader. Every canonical
//! name is listed as a synonym of itself.

use serde::{Deserialize, Serialize};

/// Name of the derived entity identifier column.
pub const ENTITY_ID_COLUMN: &str = "entity_id";

/// How a canonical field is coerced from raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Trimmed, upper-cased; blank becomes null.
    Identifier,
    /// Trimmed; null becomes the empty string.
    Text,
    /// Trimmed; blank becomes null.
    OptionalText,
    /// Trimmed, upper-cased; closed-set membership is enforced later.
    Status,
    /// Parsed calendar date; unparsable becomes null.
    Date,
    /// Parsed number clamped to `[0, 100]`; unparsable becomes null.
    Percentage,
}

/// A canonical output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalField {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Records with a null or empty value are removed.
    pub required: bool,
    pub synonyms: &'static [&'static str],
}

impl CanonicalField {
    const fn new(
        name: &'static str,
        kind: FieldKind,
        required: bool,
        synonyms: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            kind,
            required,
            synonyms,
        }
    }
}

use FieldKind::{Date, Identifier, OptionalText, Percentage, Status, Text};

/// Level 1 entity fields in output column order.
pub const ENTITY_FIELDS: &[CanonicalField] = &[
    CanonicalField::new(
        "lei",
        Identifier,
        true,
        &["LEI", "lei", "LegalEntityIdentifier"],
    ),
    CanonicalField::new(
        "legalName",
        Text,
        true,
        &[
            "LegalName",
            "EntityLegalName",
            "Entity.LegalName",
            "Entity_LegalName",
            "legal_name",
            "legalName",
        ],
    ),
    CanonicalField::new(
        "previousName",
        OptionalText,
        false,
        &[
            "PreviousName",
            "Entity.PreviousName",
            "Entity.OtherEntityNames.OtherEntityName",
            "previous_name",
            "previousName",
        ],
    ),
    CanonicalField::new(
        "legalFormCode",
        OptionalText,
        false,
        &[
            "EntityLegalFormCode",
            "LegalFormCode",
            "Entity.LegalForm.EntityLegalFormCode",
            "legal_form_code",
            "legalFormCode",
        ],
    ),
    CanonicalField::new(
        "legalFormText",
        OptionalText,
        false,
        &[
            "OtherLegalForm",
            "Entity.LegalForm.OtherLegalForm",
            "legal_form_text",
            "legalFormText",
        ],
    ),
    CanonicalField::new(
        "entityStatus",
        Status,
        false,
        &[
            "EntityStatus",
            "Entity.EntityStatus",
            "Entity.Status",
            "Entity_Status",
            "entity_status",
            "entityStatus",
        ],
    ),
    CanonicalField::new(
        "entityCategory",
        OptionalText,
        false,
        &[
            "EntityCategory",
            "Entity.EntityCategory",
            "entity_category",
            "entityCategory",
        ],
    ),
    CanonicalField::new(
        "registrationStatus",
        OptionalText,
        false,
        &[
            "RegistrationStatus",
            "Entity.RegistrationStatus",
            "Registration.RegistrationStatus",
            "registration_status",
            "registrationStatus",
        ],
    ),
    CanonicalField::new(
        "jurisdiction",
        OptionalText,
        false,
        &[
            "LegalJurisdiction",
            "Entity.LegalJurisdiction",
            "legal_jurisdiction",
            "jurisdiction",
        ],
    ),
    CanonicalField::new(
        "countryOfIncorporation",
        OptionalText,
        false,
        &[
            "Entity.CountryOfIncorporation",
            "CountryOfIncorporation",
            "country_of_incorporation",
            "countryOfIncorporation",
        ],
    ),
    CanonicalField::new(
        "addressLine1",
        Text,
        false,
        &[
            "FirstAddressLine",
            "Entity.LegalAddress.FirstAddressLine",
            "address_line1",
            "addressLine1",
        ],
    ),
    CanonicalField::new(
        "addressLine2",
        OptionalText,
        false,
        &[
            "AdditionalAddressLine",
            "Entity.LegalAddress.AdditionalAddressLine",
            "address_line2",
            "addressLine2",
        ],
    ),
    CanonicalField::new(
        "city",
        Text,
        false,
        &["City", "Entity.LegalAddress.City", "city"],
    ),
    CanonicalField::new(
        "region",
        OptionalText,
        false,
        &["Region", "Entity.LegalAddress.Region", "region"],
    ),
    CanonicalField::new(
        "postalCode",
        Text,
        false,
        &[
            "PostalCode",
            "Entity.LegalAddress.PostalCode",
            "postal_code",
            "postalCode",
        ],
    ),
    CanonicalField::new(
        "country",
        Text,
        false,
        &["Country", "Entity.LegalAddress.Country", "country"],
    ),
    CanonicalField::new(
        "registrationAuthorityId",
        OptionalText,
        false,
        &[
            "RegistrationAuthorityID",
            "Entity.RegistrationAuthority.RegistrationAuthorityID",
            "registration_authority_id",
            "registrationAuthorityId",
        ],
    ),
    CanonicalField::new(
        "registrationAuthorityEntityId",
        OptionalText,
        false,
        &[
            "RegistrationAuthorityEntityID",
            "Entity.RegistrationAuthority.RegistrationAuthorityEntityID",
            "registration_authority_entity_id",
            "registrationAuthorityEntityId",
        ],
    ),
    CanonicalField::new(
        "managingLou",
        OptionalText,
        false,
        &[
            "ManagingLOU",
            "Registration.ManagingLOU",
            "managing_lou",
            "managingLou",
        ],
    ),
    CanonicalField::new(
        "validationAuthorityId",
        OptionalText,
        false,
        &[
            "ValidationAuthorityID",
            "Registration.ValidationAuthority.ValidationAuthorityID",
            "validation_authority_id",
            "validationAuthorityId",
        ],
    ),
    CanonicalField::new(
        "validationAuthorityEntityId",
        OptionalText,
        false,
        &[
            "ValidationAuthorityEntityID",
            "Registration.ValidationAuthority.ValidationAuthorityEntityID",
            "validation_authority_entity_id",
            "validationAuthorityEntityId",
        ],
    ),
    CanonicalField::new(
        "registrationDate",
        Date,
        false,
        &[
            "EntityCreationDate",
            "InitialRegistrationDate",
            "RegistrationDate",
            "Registration.InitialRegistrationDate",
            "registration_date",
            "registrationDate",
        ],
    ),
    CanonicalField::new(
        "latestUpdateDate",
        Date,
        false,
        &[
            "LastUpdateDate",
            "LatestUpdateDate",
            "Registration.LastUpdateDate",
            "latest_update_date",
            "latestUpdateDate",
        ],
    ),
    CanonicalField::new(
        "nextRenewalDate",
        Date,
        false,
        &[
            "NextRenewalDate",
            "Registration.NextRenewalDate",
            "next_renewal_date",
            "nextRenewalDate",
        ],
    ),
];

/// Level 2 relationship fields in output column order.
pub const RELATIONSHIP_FIELDS: &[CanonicalField] = &[
    CanonicalField::new(
        "relationshipId",
        OptionalText,
        false,
        &[
            "RelationshipRecordID",
            "RelationshipID",
            "relationship_id",
            "relationshipId",
        ],
    ),
    CanonicalField::new(
        "childLei",
        Identifier,
        true,
        &[
            "ChildLEI",
            "StartNodeID",
            "StartNode.NodeID",
            "Relationship.StartNode.NodeID",
            "StartNodeNodeID",
            "StartNode_ID",
            "child_lei",
            "childLei",
        ],
    ),
    CanonicalField::new(
        "parentLei",
        Identifier,
        true,
        &[
            "ParentLEI",
            "EndNodeID",
            "EndNode.NodeID",
            "Relationship.EndNode.NodeID",
            "EndNodeNodeID",
            "EndNode_ID",
            "parent_lei",
            "parentLei",
        ],
    ),
    CanonicalField::new(
        "relationshipType",
        OptionalText,
        false,
        &[
            "RelationshipType",
            "Relationship.RelationshipType",
            "Relationship_Type",
            "relationship_type",
            "relationshipType",
        ],
    ),
    CanonicalField::new(
        "relationshipStatus",
        Status,
        false,
        &[
            "RelationshipStatus",
            "Relationship.RelationshipStatus",
            "relationship_status",
            "relationshipStatus",
            "RegistrationStatus",
            "Registration.RegistrationStatus",
            "Registration_Status",
        ],
    ),
    CanonicalField::new(
        "ownershipPercentage",
        Percentage,
        false,
        &[
            "PercentageOwnership",
            "OwnershipPercentage",
            "Relationship.RelationshipQuantifiers.RelationshipQuantifier.QuantifierAmount",
            "QuantifierAmount",
            "ownership_percentage",
            "ownershipPercentage",
        ],
    ),
    CanonicalField::new(
        "relationshipStartDate",
        Date,
        false,
        &[
            "RelationshipStartDate",
            "Relationship.RelationshipPeriods.RelationshipPeriod.StartDate",
            "relationship_start_date",
            "relationshipStartDate",
        ],
    ),
    CanonicalField::new(
        "relationshipEndDate",
        Date,
        false,
        &[
            "RelationshipEndDate",
            "Relationship.RelationshipPeriods.RelationshipPeriod.EndDate",
            "relationship_end_date",
            "relationshipEndDate",
        ],
    ),
];
