//! Materializing typed records from normalized batches.

use chrono::NaiveDate;
use lei_common::{any_to_date, any_to_f64, optional_string_values};
use lei_model::{ENTITY_ID_COLUMN, NormalizedEntity, NormalizedRelationship};
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::ids::entity_id;

struct Columns<'a> {
    df: &'a DataFrame,
}

impl Columns<'_> {
    fn strings(&self, name: &str) -> Vec<Option<String>> {
        optional_string_values(self.df, name).unwrap_or_else(|| vec![None; self.df.height()])
    }

    fn dates(&self, name: &str) -> Result<Vec<Option<NaiveDate>>> {
        let Ok(column) = self.df.column(name) else {
            return Ok(vec![None; self.df.height()]);
        };
        (0..self.df.height())
            .map(|idx| Ok(any_to_date(column.get(idx)?)))
            .collect()
    }

    fn floats(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let Ok(column) = self.df.column(name) else {
            return Ok(vec![None; self.df.height()]);
        };
        (0..self.df.height())
            .map(|idx| Ok(any_to_f64(column.get(idx)?)))
            .collect()
    }
}

fn take(values: &mut [Option<String>], idx: usize) -> Option<String> {
    values[idx].take()
}

/// Converts a normalized entity batch into typed records.
///
/// Unknown statuses fall back to the default status; a missing
/// `entity_id` is derived from the identifier.
pub fn entity_records(df: &DataFrame) -> Result<Vec<NormalizedEntity>> {
    let cols = Columns { df };
    let mut lei = cols.strings("lei");
    let mut legal_name = cols.strings("legalName");
    let mut previous_name = cols.strings("previousName");
    let mut legal_form_code = cols.strings("legalFormCode");
    let mut legal_form_text = cols.strings("legalFormText");
    let entity_status = cols.strings("entityStatus");
    let mut entity_category = cols.strings("entityCategory");
    let mut registration_status = cols.strings("registrationStatus");
    let mut jurisdiction = cols.strings("jurisdiction");
    let mut country_of_incorporation = cols.strings("countryOfIncorporation");
    let mut address_line1 = cols.strings("addressLine1");
    let mut address_line2 = cols.strings("addressLine2");
    let mut city = cols.strings("city");
    let mut region = cols.strings("region");
    let mut postal_code = cols.strings("postalCode");
    let mut country = cols.strings("country");
    let mut registration_authority_id = cols.strings("registrationAuthorityId");
    let mut registration_authority_entity_id = cols.strings("registrationAuthorityEntityId");
    let mut managing_lou = cols.strings("managingLou");
    let mut validation_authority_id = cols.strings("validationAuthorityId");
    let mut validation_authority_entity_id = cols.strings("validationAuthorityEntityId");
    let registration_date = cols.dates("registrationDate")?;
    let latest_update_date = cols.dates("latestUpdateDate")?;
    let next_renewal_date = cols.dates("nextRenewalDate")?;
    let mut entity_ids = cols.strings(ENTITY_ID_COLUMN);

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let lei = take(&mut lei, idx).unwrap_or_default();
        let entity_id = take(&mut entity_ids, idx).unwrap_or_else(|| entity_id(&lei));
        records.push(NormalizedEntity {
            legal_name: take(&mut legal_name, idx).unwrap_or_default(),
            previous_name: take(&mut previous_name, idx),
            legal_form_code: take(&mut legal_form_code, idx),
            legal_form_text: take(&mut legal_form_text, idx),
            entity_status: entity_status[idx]
                .as_deref()
                .and_then(|status| status.parse().ok())
                .unwrap_or_default(),
            entity_category: take(&mut entity_category, idx),
            registration_status: take(&mut registration_status, idx),
            jurisdiction: take(&mut jurisdiction, idx),
            country_of_incorporation: take(&mut country_of_incorporation, idx),
            address_line1: take(&mut address_line1, idx).unwrap_or_default(),
            address_line2: take(&mut address_line2, idx),
            city: take(&mut city, idx).unwrap_or_default(),
            region: take(&mut region, idx),
            postal_code: take(&mut postal_code, idx).unwrap_or_default(),
            country: take(&mut country, idx).unwrap_or_default(),
            registration_authority_id: take(&mut registration_authority_id, idx),
            registration_authority_entity_id: take(&mut registration_authority_entity_id, idx),
            managing_lou: take(&mut managing_lou, idx),
            validation_authority_id: take(&mut validation_authority_id, idx),
            validation_authority_entity_id: take(&mut validation_authority_entity_id, idx),
            registration_date: registration_date[idx],
            latest_update_date: latest_update_date[idx],
            next_renewal_date: next_renewal_date[idx],
            lei,
            entity_id,
        });
    }
    Ok(records)
}

/// Converts a normalized relationship batch into typed records.
pub fn relationship_records(df: &DataFrame) -> Result<Vec<NormalizedRelationship>> {
    let cols = Columns { df };
    let mut relationship_id = cols.strings("relationshipId");
    let mut child_lei = cols.strings("childLei");
    let mut parent_lei = cols.strings("parentLei");
    let mut relationship_type = cols.strings("relationshipType");
    let status = cols.strings("relationshipStatus");
    let ownership = cols.floats("ownershipPercentage")?;
    let start = cols.dates("relationshipStartDate")?;
    let end = cols.dates("relationshipEndDate")?;

    let records = (0..df.height())
        .map(|idx| NormalizedRelationship {
            relationship_id: take(&mut relationship_id, idx),
            child_lei: take(&mut child_lei, idx).unwrap_or_default(),
            parent_lei: take(&mut parent_lei, idx).unwrap_or_default(),
            relationship_type: take(&mut relationship_type, idx),
            relationship_status: status[idx]
                .as_deref()
                .and_then(|value| value.parse().ok())
                .unwrap_or_default(),
            ownership_percentage: ownership[idx],
            relationship_start_date: start[idx],
            relationship_end_date: end[idx],
        })
        .collect();
    Ok(records)
}
