//! Level 2 relationship normalization.
//!
//! Normalization is split at the point where the valid entity set is
//! needed. [`RelationshipNormalizer::prepare`] runs the entity-independent
//! stages and can overlap with entity normalization;
//! [`RelationshipNormalizer::finish`] requires the [`ValidLeiSet`].

use lei_model::{DatasetType, NormalizationOptions, QualityReport};
use polars::prelude::DataFrame;

use crate::coerce::coerce;
use crate::duplicates::handle_duplicates;
use crate::error::Result;
use crate::integrity::{ValidLeiSet, enforce_referential_integrity};
use crate::output::NormalizedDataset;
use crate::schema::resolve;
use crate::standardize::standardize_status;
use crate::validate::filter_required;

const DATASET: DatasetType = DatasetType::Relationships;

/// Relationships after resolve, coerce and required-field filtering.
#[derive(Debug, Clone)]
pub struct PreparedRelationships {
    data: DataFrame,
    report: QualityReport,
}

impl PreparedRelationships {
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn report(&self) -> &QualityReport {
        &self.report
    }
}

/// Normalizes raw relationship batches to the canonical relationship schema.
#[derive(Debug, Clone, Default)]
pub struct RelationshipNormalizer {
    options: NormalizationOptions,
}

impl RelationshipNormalizer {
    pub fn new(options: NormalizationOptions) -> Self {
        Self { options }
    }

    pub fn prepare(&self, raw: &DataFrame) -> Result<PreparedRelationships> {
        tracing::info!(records = raw.height(), "Normalizing relationship records");
        let mut report = QualityReport::new();
        report.record_total(raw.height());

        let df = resolve(DATASET, raw)?;
        let df = coerce(DATASET, &df)?;
        let data = filter_required(DATASET, &df, &mut report)?;
        Ok(PreparedRelationships { data, report })
    }

    /// Runs referential integrity against `valid`, then status
    /// standardization and duplicate handling.
    pub fn finish(
        &self,
        prepared: PreparedRelationships,
        valid: &ValidLeiSet,
    ) -> Result<NormalizedDataset> {
        let PreparedRelationships { data, mut report } = prepared;
        let df = enforce_referential_integrity(&data, valid, &mut report)?;
        let df = standardize_status(DATASET, &df, &mut report)?;
        let df = handle_duplicates(DATASET, &df, self.options.duplicate_policy, &mut report)?;
        Ok(NormalizedDataset::finalize(DATASET, df, report))
    }

    pub fn normalize(&self, raw: &DataFrame, valid: &ValidLeiSet) -> Result<NormalizedDataset> {
        let prepared = self.prepare(raw)?;
        self.finish(prepared, valid)
    }
}
