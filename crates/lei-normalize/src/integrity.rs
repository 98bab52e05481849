//! Cross-dataset referential integrity.

use std::collections::HashSet;

use lei_common::optional_string_values;
use lei_model::QualityReport;
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

use crate::error::Result;

/// Identifiers of the entities that survived entity normalization.
///
/// Relationship finishing requires one of these, which makes the
/// entity-before-relationship ordering part of the call signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidLeiSet {
    leis: HashSet<String>,
}

impl ValidLeiSet {
    /// Collects the `lei` column of a normalized entity batch.
    pub fn from_entities(entities: &DataFrame) -> Self {
        let leis = optional_string_values(entities, "lei")
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();
        Self { leis }
    }

    pub fn contains(&self, lei: &str) -> bool {
        self.leis.contains(lei)
    }

    pub fn len(&self) -> usize {
        self.leis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leis.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ValidLeiSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            leis: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Drops relationships whose child or parent is not a valid entity.
///
/// Both sides are checked against the same set in one pass. A record failing
/// both sides counts once per side but is removed once.
pub fn enforce_referential_integrity(
    df: &DataFrame,
    valid: &ValidLeiSet,
    report: &mut QualityReport,
) -> Result<DataFrame> {
    let height = df.height();
    let children = optional_string_values(df, "childLei").unwrap_or_else(|| vec![None; height]);
    let parents = optional_string_values(df, "parentLei").unwrap_or_else(|| vec![None; height]);

    let is_valid = |value: &Option<String>| value.as_deref().is_some_and(|lei| valid.contains(lei));

    let mut invalid_child = 0usize;
    let mut invalid_parent = 0usize;
    let keep: Vec<bool> = children
        .iter()
        .zip(&parents)
        .map(|(child, parent)| {
            let child_ok = is_valid(child);
            let parent_ok = is_valid(parent);
            if !child_ok {
                invalid_child += 1;
            }
            if !parent_ok {
                invalid_parent += 1;
            }
            child_ok && parent_ok
        })
        .collect();

    if invalid_child > 0 {
        report.add_warning(format!("{invalid_child} relationships with invalid childLei"));
    }
    if invalid_parent > 0 {
        report.add_warning(format!(
            "{invalid_parent} relationships with invalid parentLei"
        ));
    }
    report.add_referential_integrity(invalid_child, invalid_parent);

    let removed = keep.iter().filter(|kept| !**kept).count();
    tracing::info!(
        removed,
        invalid_child,
        invalid_parent,
        valid_entities = valid.len(),
        "Removed records due to referential integrity issues"
    );
    if removed == 0 {
        return Ok(df.clone());
    }
    let mask = BooleanChunked::from_slice("integrity".into(), &keep);
    Ok(df.filter(&mask)?)
}
