//! Required-field filtering.

use lei_common::optional_string_values;
use lei_model::{DatasetType, QualityReport};
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

use crate::error::Result;

/// Removes records whose required fields are null or blank.
///
/// Fields are checked in canonical order; each field that removes at least
/// one record adds a `Removed {n} records with null {field}` warning.
/// Surviving records keep their order and values.
pub fn filter_required(
    dataset: DatasetType,
    df: &DataFrame,
    report: &mut QualityReport,
) -> Result<DataFrame> {
    let initial = df.height();
    let mut out = df.clone();

    for field in dataset.required_fields() {
        let Some(values) = optional_string_values(&out, field) else {
            continue;
        };
        let keep: Vec<bool> = values
            .iter()
            .map(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
            .collect();
        let removed = keep.iter().filter(|kept| !**kept).count();
        if removed == 0 {
            continue;
        }
        report.add_warning(format!("Removed {removed} records with null {field}"));
        tracing::warn!(dataset = %dataset, field, removed, "Dropped records missing a required field");
        let mask = BooleanChunked::from_slice("required".into(), &keep);
        out = out.filter(&mask)?;
    }

    tracing::info!(
        dataset = %dataset,
        removed = initial - out.height(),
        "Removed records with missing required fields"
    );
    Ok(out)
}
