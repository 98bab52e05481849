//! Key-based duplicate handling for DataFrames.

use std::collections::{HashMap, HashSet};

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray, PolarsResult};

use crate::polars::optional_string_values;

/// Composite key of every row, `None` when all key cells are null or blank.
///
/// Missing key columns are ignored.
pub fn row_keys(df: &DataFrame, keys: &[&str]) -> Vec<Option<Vec<String>>> {
    let columns: Vec<Vec<Option<String>>> = keys
        .iter()
        .filter_map(|key| optional_string_values(df, key))
        .collect();
    (0..df.height())
        .map(|idx| {
            let parts: Vec<String> = columns
                .iter()
                .map(|values| {
                    values[idx]
                        .as_deref()
                        .map(str::trim)
                        .unwrap_or_default()
                        .to_string()
                })
                .collect();
            if parts.iter().all(String::is_empty) {
                None
            } else {
                Some(parts)
            }
        })
        .collect()
}

/// Number of rows belonging to a key group of size two or more.
pub fn duplicate_row_count(df: &DataFrame, keys: &[&str]) -> usize {
    let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
    for key in row_keys(df, keys).into_iter().flatten() {
        *counts.entry(key).or_default() += 1;
    }
    counts.values().filter(|&&count| count > 1).sum()
}

/// Distinct keys that occur more than once, in first-seen order.
pub fn duplicate_keys(df: &DataFrame, keys: &[&str]) -> Vec<Vec<String>> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for key in row_keys(df, keys).into_iter().flatten() {
        if !seen.insert(key.clone()) && reported.insert(key.clone()) {
            duplicates.push(key);
        }
    }
    duplicates
}

/// Keeps the first row of every key and returns the number of rows dropped.
///
/// Rows without a key are always kept.
pub fn dedupe_keep_first(df: &DataFrame, keys: &[&str]) -> PolarsResult<(DataFrame, usize)> {
    if df.height() == 0 {
        return Ok((df.clone(), 0));
    }
    let mut seen = HashSet::new();
    let keep: Vec<bool> = row_keys(df, keys)
        .into_iter()
        .map(|key| match key {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect();
    let dropped = keep.iter().filter(|kept| !**kept).count();
    if dropped == 0 {
        return Ok((df.clone(), 0));
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    Ok((df.filter(&mask)?, dropped))
}
