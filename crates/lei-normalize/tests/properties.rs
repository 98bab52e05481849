//! Property tests for normalization invariants.

use lei_common::optional_string_values;
use lei_model::{DatasetType, EntityStatus, QualityReport, RelationshipStatus};
use lei_normalize::coerce::{coerce, coerce_percentage};
use lei_normalize::validate::filter_required;
use lei_normalize::{EntityNormalizer, RelationshipNormalizer, ValidLeiSet, resolve};
use polars::prelude::{Column, DataFrame};
use proptest::prelude::*;

fn cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("  ".to_string())),
        "[a-zA-Z0-9 ./:-]{0,12}".prop_map(Some),
    ]
}

fn lei_cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        prop::sample::select(vec!["a", "B", " c ", "D", "e"]).prop_map(|s| Some(s.to_string())),
    ]
}

fn frame(columns: Vec<(&str, Vec<Option<String>>)>) -> DataFrame {
    DataFrame::new(
        columns
            .into_iter()
            .map(|(name, values)| Column::new(name.into(), values))
            .collect(),
    )
    .unwrap()
}

fn rows(n: usize) -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(cell(), n)
}

proptest! {
    #[test]
    fn coercion_preserves_row_count(
        (lei, name, date, city) in (0usize..40).prop_flat_map(|n| (rows(n), rows(n), rows(n), rows(n)))
    ) {
        let height = lei.len();
        let raw = frame(vec![
            ("LEI", lei),
            ("LegalName", name),
            ("RegistrationDate", date),
            ("City", city),
        ]);
        let resolved = resolve(DatasetType::LegalEntities, &raw).unwrap();
        let coerced = coerce(DatasetType::LegalEntities, &resolved).unwrap();
        prop_assert_eq!(coerced.height(), height);
    }

    #[test]
    fn resolution_is_idempotent(
        (lei, name, extra) in (0usize..20).prop_flat_map(|n| (rows(n), rows(n), rows(n))),
        use_legacy_name in any::<bool>(),
    ) {
        let name_column = if use_legacy_name { "Entity.LegalName" } else { "legal_name" };
        let raw = frame(vec![("LEI", lei), (name_column, name), ("Ignored", extra)]);
        let once = resolve(DatasetType::LegalEntities, &raw).unwrap();
        let twice = resolve(DatasetType::LegalEntities, &once).unwrap();
        prop_assert!(once.equals_missing(&twice));
    }

    #[test]
    fn required_filter_is_conservative(
        (child, parent) in (0usize..40).prop_flat_map(|n| (rows(n), rows(n)))
    ) {
        let raw = frame(vec![("childLei", child.clone()), ("parentLei", parent.clone())]);
        let mut report = QualityReport::new();
        let out = filter_required(DatasetType::Relationships, &raw, &mut report).unwrap();

        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        let expected: Vec<Option<String>> = child
            .iter()
            .zip(&parent)
            .filter(|(c, p)| present(c) && present(p))
            .map(|(c, _)| c.clone())
            .collect();
        prop_assert_eq!(optional_string_values(&out, "childLei").unwrap(), expected);
    }

    #[test]
    fn surviving_relationships_reference_valid_entities(
        pairs in prop::collection::vec((lei_cell(), lei_cell()), 0..40),
        valid in prop::collection::hash_set(prop::sample::select(vec!["A", "B", "C", "D", "E"]), 0..5),
    ) {
        let (child, parent): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        let raw = frame(vec![("ChildLEI", child), ("ParentLEI", parent)]);
        let valid: ValidLeiSet = valid.into_iter().collect();
        let out = RelationshipNormalizer::default().normalize(&raw, &valid).unwrap();

        for column in ["childLei", "parentLei"] {
            for value in optional_string_values(&out.data, column).unwrap() {
                let value = value.unwrap_or_default();
                prop_assert!(valid.contains(&value));
            }
        }
        prop_assert!(out.report.validity_rate() <= 100.0);
    }

    #[test]
    fn statuses_are_closed_after_normalization(
        statuses in prop::collection::vec(cell(), 1..30),
    ) {
        let n = statuses.len();
        let leis: Vec<Option<String>> = (0..n).map(|i| Some(format!("L{i}"))).collect();
        let names: Vec<Option<String>> = (0..n).map(|_| Some("Name".to_string())).collect();
        let entities = frame(vec![
            ("LEI", leis.clone()),
            ("LegalName", names),
            ("EntityStatus", statuses.clone()),
        ]);
        let entities = EntityNormalizer::default().normalize(&entities).unwrap();
        for status in optional_string_values(&entities.data, "entityStatus").unwrap() {
            let status = status.unwrap_or_default();
            prop_assert!(EntityStatus::VALUES.contains(&status.as_str()));
        }

        let rels = frame(vec![
            ("ChildLEI", leis.clone()),
            ("ParentLEI", leis),
            ("RelationshipStatus", statuses),
        ]);
        let rels = RelationshipNormalizer::default()
            .normalize(&rels, &entities.valid_leis())
            .unwrap();
        prop_assert_eq!(rels.data.height(), n);
        for status in optional_string_values(&rels.data, "relationshipStatus").unwrap() {
            let status = status.unwrap_or_default();
            prop_assert!(RelationshipStatus::VALUES.contains(&status.as_str()));
        }
    }

    #[test]
    fn percentages_stay_in_bounds(value in any::<f64>()) {
        if let Some(pct) = coerce_percentage(&value.to_string()) {
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}
