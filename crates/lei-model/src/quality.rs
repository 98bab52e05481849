//! Per-run data quality accounting.
//!
//! A [`QualityReport`] is created by each normalizer run and threaded through
//! its stages. Stages record findings through explicit calls; the caller
//! finalizes the report once the surviving batch is known.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset::DatasetType;

/// Referential-integrity violations split by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferentialIntegrityCounts {
    /// Records whose child identifier is not a valid entity.
    pub child: usize,
    /// Records whose parent identifier is not a valid entity.
    pub parent: usize,
}

impl ReferentialIntegrityCounts {
    pub fn total(&self) -> usize {
        self.child + self.parent
    }
}

/// Mutable quality accumulator for one dataset of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub duplicate_count: usize,
    pub referential_integrity: ReferentialIntegrityCounts,
    pub nulls_by_column: BTreeMap<String, f64>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl QualityReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_total(&mut self, total: usize) {
        self.total_records = total;
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn set_duplicate_count(&mut self, count: usize) {
        self.duplicate_count = count;
    }

    pub fn add_referential_integrity(&mut self, child: usize, parent: usize) {
        self.referential_integrity.child += child;
        self.referential_integrity.parent += parent;
    }

    /// Records the surviving count and the null profile of the final batch.
    ///
    /// `valid` is capped at the recorded total.
    pub fn finalize(&mut self, valid: usize, nulls_by_column: BTreeMap<String, f64>) {
        self.valid_records = valid.min(self.total_records);
        self.invalid_records = self.total_records - self.valid_records;
        self.nulls_by_column = nulls_by_column;
    }

    /// `valid / total * 100` rounded to two decimals; 0 for an empty input.
    pub fn validity_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        let rate = self.valid_records as f64 / self.total_records as f64 * 100.0;
        ((rate * 100.0).round() / 100.0).clamp(0.0, 100.0)
    }

    pub fn referential_integrity_issues(&self) -> usize {
        self.referential_integrity.total()
    }

    /// Serializable summary view.
    pub fn summary(&self) -> QualitySummary {
        QualitySummary {
            total_records: self.total_records,
            valid_records: self.valid_records,
            invalid_records: self.invalid_records,
            duplicate_count: self.duplicate_count,
            referential_integrity_issues: self.referential_integrity_issues(),
            nulls_by_column: self.nulls_by_column.clone(),
            warnings: self.warnings.len(),
            errors: self.errors.len(),
            validity_rate: self.validity_rate(),
        }
    }
}

/// Summary of a [`QualityReport`] as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub duplicate_count: usize,
    pub referential_integrity_issues: usize,
    pub nulls_by_column: BTreeMap<String, f64>,
    pub warnings: usize,
    pub errors: usize,
    pub validity_rate: f64,
}

/// Quality summaries of every dataset written under one version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunQualityReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_entities: Option<QualitySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<QualitySummary>,
}

impl RunQualityReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dataset: DatasetType, summary: QualitySummary) {
        match dataset {
            DatasetType::LegalEntities => self.legal_entities = Some(summary),
            DatasetType::Relationships => self.relationships = Some(summary),
        }
    }

    pub fn get(&self, dataset: DatasetType) -> Option<&QualitySummary> {
        match dataset {
            DatasetType::LegalEntities => self.legal_entities.as_ref(),
            DatasetType::Relationships => self.relationships.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.legal_entities.is_none() && self.relationships.is_none()
    }
}
