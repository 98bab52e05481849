//! Closing status columns over their enumerations.

use lei_common::optional_string_values;
use lei_model::{DEFAULT_STATUS, DatasetType, QualityReport};
use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::error::Result;

/// Rewrites statuses outside the dataset's closed set to `ACTIVE`.
///
/// Null statuses count as unknown. One warning records the rewrite count.
pub fn standardize_status(
    dataset: DatasetType,
    df: &DataFrame,
    report: &mut QualityReport,
) -> Result<DataFrame> {
    let (column, allowed) = dataset.status_field();
    let Some(values) = optional_string_values(df, column) else {
        return Ok(df.clone());
    };

    let mut unknown = 0usize;
    let standardized: Vec<String> = values
        .into_iter()
        .map(|value| match value {
            Some(value) if allowed.contains(&value.as_str()) => value,
            _ => {
                unknown += 1;
                DEFAULT_STATUS.to_string()
            }
        })
        .collect();

    if unknown == 0 {
        return Ok(df.clone());
    }

    report.add_warning(format!(
        "Found {unknown} records with unknown {column}; defaulting to {DEFAULT_STATUS}"
    ));
    tracing::warn!(dataset = %dataset, column, unknown, "Defaulted unknown statuses");

    let mut out = df.clone();
    out.with_column(Series::new(column.into(), standardized))?;
    Ok(out)
}
