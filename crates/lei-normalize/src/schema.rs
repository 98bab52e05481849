//! Source-to-canonical column resolution.

use std::collections::{BTreeSet, HashSet};

use lei_model::{DatasetType, FieldKind};
use polars::prelude::{Column, DataFrame, DataType};

use crate::error::{NormalizeError, Result};

/// Resolves a raw batch to the canonical column set of `dataset`.
///
/// Each canonical field takes the first of its synonyms present in the
/// batch. Fields with no match become all-null string columns and unmapped
/// source columns are dropped. Output columns follow the canonical order.
///
/// A batch without columns resolves to all-null canonical rows. A batch
/// that has columns but maps none of the dataset's identifier fields fails
/// with [`NormalizeError::UnresolvableSchema`]. Streamed sources should use
/// [`SourceResolver`], which applies that check to the source as a whole.
pub fn resolve(dataset: DatasetType, df: &DataFrame) -> Result<DataFrame> {
    let mut resolver = SourceResolver::new(dataset);
    let resolved = resolver.resolve_batch(df)?;
    resolver.finish()?;
    Ok(resolved)
}

/// Resolves the batches of one streamed source.
///
/// Markup batches only carry the elements their records contain, so a
/// batch whose records all lack an identifier is not evidence of a bad
/// source. The schema check runs once in [`SourceResolver::finish`], over
/// every column seen in any batch.
#[derive(Debug)]
pub struct SourceResolver {
    dataset: DatasetType,
    seen: BTreeSet<String>,
    keys_resolved: bool,
}

impl SourceResolver {
    pub fn new(dataset: DatasetType) -> Self {
        Self {
            dataset,
            seen: BTreeSet::new(),
            keys_resolved: false,
        }
    }

    /// Maps one batch to the canonical columns, filling absent fields
    /// (identifiers included) with nulls.
    pub fn resolve_batch(&mut self, df: &DataFrame) -> Result<DataFrame> {
        let dataset = self.dataset;
        let height = df.height();
        let available: HashSet<&str> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        self.seen
            .extend(available.iter().map(|name| (*name).to_string()));

        let mut columns = Vec::with_capacity(dataset.fields().len());
        let mut mapped = 0usize;

        for field in dataset.fields() {
            let source = field
                .synonyms
                .iter()
                .copied()
                .find(|synonym| available.contains(synonym));
            let column = match source {
                Some(source) => {
                    mapped += 1;
                    if field.kind == FieldKind::Identifier && field.required {
                        self.keys_resolved = true;
                    }
                    let mut column = df.column(source)?.clone();
                    column.rename(field.name.into());
                    column
                }
                None => Column::full_null(field.name.into(), height, &DataType::String),
            };
            columns.push(column);
        }

        tracing::debug!(
            dataset = %dataset,
            mapped,
            dropped = available.len().saturating_sub(mapped),
            rows = height,
            "Resolved batch columns"
        );

        Ok(DataFrame::new_with_height(height, columns)?)
    }

    /// Fails when the source had columns but none of them ever mapped to
    /// an identifier field.
    pub fn finish(self) -> Result<()> {
        if self.seen.is_empty() || self.keys_resolved {
            return Ok(());
        }
        Err(NormalizeError::UnresolvableSchema {
            dataset: self.dataset,
            expected: key_fields(self.dataset).join(" or "),
            columns: self.seen.into_iter().collect(),
        })
    }
}

/// Canonical batch with no rows.
pub fn empty_canonical(dataset: DatasetType) -> Result<DataFrame> {
    resolve(dataset, &DataFrame::empty())
}

fn key_fields(dataset: DatasetType) -> Vec<&'static str> {
    dataset
        .fields()
        .iter()
        .filter(|field| field.kind == FieldKind::Identifier && field.required)
        .map(|field| field.name)
        .collect()
}
