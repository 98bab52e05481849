use lei_common::null_percentages;
use lei_model::{DatasetType, QualityReport};
use polars::prelude::DataFrame;

/// A normalized batch and the quality report of the run that produced it.
#[derive(Debug, Clone)]
pub struct NormalizedDataset {
    pub dataset: DatasetType,
    pub data: DataFrame,
    pub report: QualityReport,
}

impl NormalizedDataset {
    /// Finalizes `report` against `data` and bundles both.
    pub(crate) fn finalize(dataset: DatasetType, data: DataFrame, mut report: QualityReport) -> Self {
        report.finalize(data.height(), null_percentages(&data));
        tracing::info!(
            dataset = %dataset,
            valid = report.valid_records,
            total = report.total_records,
            validity_rate = report.validity_rate(),
            "Normalization complete"
        );
        Self {
            dataset,
            data,
            report,
        }
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }
}
