//! Duplicate detection and optional rejection.

use lei_common::{dedupe_keep_first, duplicate_keys, duplicate_row_count};
use lei_model::{DatasetType, DuplicatePolicy, QualityReport};
use polars::prelude::DataFrame;

use crate::error::Result;

const SAMPLE_KEYS: usize = 10;

/// Counts records sharing a uniqueness key with another record.
///
/// Every member of a duplicate group is counted. Under
/// [`DuplicatePolicy::Reject`] all but the first record of each group are
/// removed; under [`DuplicatePolicy::Report`] the batch is returned as is.
pub fn handle_duplicates(
    dataset: DatasetType,
    df: &DataFrame,
    policy: DuplicatePolicy,
    report: &mut QualityReport,
) -> Result<DataFrame> {
    let key = dataset.uniqueness_key();
    let count = duplicate_row_count(df, key);
    report.set_duplicate_count(count);
    if count == 0 {
        return Ok(df.clone());
    }

    report.add_warning(format!(
        "Found {count} duplicate {} records",
        dataset.record_label()
    ));
    let sample: Vec<String> = duplicate_keys(df, key)
        .into_iter()
        .take(SAMPLE_KEYS)
        .map(|parts| parts.join("->"))
        .collect();
    tracing::warn!(dataset = %dataset, count, ?sample, "Duplicate records detected");

    match policy {
        DuplicatePolicy::Report => Ok(df.clone()),
        DuplicatePolicy::Reject => {
            let (deduped, dropped) = dedupe_keep_first(df, key)?;
            tracing::info!(dataset = %dataset, dropped, "Rejected duplicate records");
            Ok(deduped)
        }
    }
}
