//! Assembling raw records into string-typed DataFrames.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame};

use crate::error::Result;

/// One source record: column name to raw text value.
pub type RawRecord = BTreeMap<String, String>;

/// Builds a DataFrame from records that may carry different keys.
///
/// The column set is the union of all keys; a record lacking a key gets a
/// null in that column. Records without any keys still count as rows.
pub(crate) fn records_to_frame(records: &[RawRecord]) -> Result<DataFrame> {
    let keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();
    let columns = keys
        .into_iter()
        .map(|key| {
            let values: Vec<Option<String>> = records
                .iter()
                .map(|record| record.get(key).cloned())
                .collect();
            Column::new(key.into(), values)
        })
        .collect();
    Ok(DataFrame::new_with_height(records.len(), columns)?)
}

/// Builds a DataFrame from fixed-width rows under a known header.
pub(crate) fn rows_to_frame(headers: &[String], columns: Vec<Vec<Option<String>>>) -> Result<DataFrame> {
    let columns = headers
        .iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name.as_str().into(), values))
        .collect();
    Ok(DataFrame::new(columns)?)
}
