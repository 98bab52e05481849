//! Level 1 entity normalization.

use lei_model::{DatasetType, NormalizationOptions, QualityReport};
use polars::prelude::DataFrame;

use crate::coerce::coerce;
use crate::duplicates::handle_duplicates;
use crate::error::Result;
use crate::ids::append_entity_ids;
use crate::integrity::ValidLeiSet;
use crate::output::NormalizedDataset;
use crate::schema::resolve;
use crate::standardize::standardize_status;
use crate::validate::filter_required;

const DATASET: DatasetType = DatasetType::LegalEntities;

/// Normalizes raw entity batches to the canonical entity schema.
#[derive(Debug, Clone, Default)]
pub struct EntityNormalizer {
    options: NormalizationOptions,
}

impl EntityNormalizer {
    pub fn new(options: NormalizationOptions) -> Self {
        Self { options }
    }

    /// Runs resolve, coerce, required-field filtering, status
    /// standardization, duplicate handling and entity-id derivation.
    pub fn normalize(&self, raw: &DataFrame) -> Result<NormalizedDataset> {
        tracing::info!(records = raw.height(), "Normalizing LEI records");
        let mut report = QualityReport::new();
        report.record_total(raw.height());

        let df = resolve(DATASET, raw)?;
        let df = coerce(DATASET, &df)?;
        let df = filter_required(DATASET, &df, &mut report)?;
        let df = standardize_status(DATASET, &df, &mut report)?;
        let df = handle_duplicates(DATASET, &df, self.options.duplicate_policy, &mut report)?;
        let df = append_entity_ids(&df)?;

        Ok(NormalizedDataset::finalize(DATASET, df, report))
    }
}

impl NormalizedDataset {
    /// Identifiers of the surviving entities.
    pub fn valid_leis(&self) -> ValidLeiSet {
        ValidLeiSet::from_entities(&self.data)
    }
}
