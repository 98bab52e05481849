//! Stage and end-to-end normalization tests.

use lei_common::optional_string_values;
use lei_model::{DatasetType, DuplicatePolicy, NormalizationOptions, QualityReport};
use lei_normalize::coerce::coerce;
use lei_normalize::integrity::enforce_referential_integrity;
use lei_normalize::validate::filter_required;
use lei_normalize::{
    EntityNormalizer, NormalizeError, RelationshipNormalizer, SourceResolver, ValidLeiSet,
    empty_canonical, entity_id, entity_records, relationship_records, resolve,
};
use polars::prelude::{Column, DataFrame, DataType};

fn make_df(columns: &[(&str, Vec<Option<&str>>)]) -> DataFrame {
    let cols = columns
        .iter()
        .map(|(name, values)| Column::new((*name).into(), values.clone()))
        .collect();
    DataFrame::new(cols).unwrap()
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    optional_string_values(df, name).unwrap()
}

fn owned(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn unknown_entity_status_defaults_to_active() {
    let raw = make_df(&[
        ("lei", vec![Some("ABC123")]),
        ("legalName", vec![Some("Acme Corp")]),
        ("entityStatus", vec![Some("FOO")]),
    ]);
    let out = EntityNormalizer::default().normalize(&raw).unwrap();

    assert_eq!(out.data.height(), 1);
    assert_eq!(strings(&out.data, "lei"), owned(&[Some("ABC123")]));
    assert_eq!(strings(&out.data, "legalName"), owned(&[Some("Acme Corp")]));
    assert_eq!(strings(&out.data, "entityStatus"), owned(&[Some("ACTIVE")]));
    assert_eq!(out.report.warnings.len(), 1);
    assert!(out.report.warnings[0].contains("unknown entityStatus"));
}

#[test]
fn empty_legal_name_is_dropped() {
    let raw = make_df(&[
        ("LEI", vec![Some("A1"), Some("B2")]),
        ("LegalName", vec![Some("Alpha"), Some("")]),
        ("EntityStatus", vec![Some("ACTIVE"), Some("ACTIVE")]),
    ]);
    let out = EntityNormalizer::default().normalize(&raw).unwrap();

    assert_eq!(out.data.height(), 1);
    assert_eq!(out.report.total_records, 2);
    assert_eq!(out.report.invalid_records, 1);
    assert_eq!(
        out.report.warnings,
        vec!["Removed 1 records with null legalName".to_string()]
    );
    assert_eq!(out.report.validity_rate(), 50.0);
}

#[test]
fn relationship_with_unknown_parent_is_dropped() {
    let raw = make_df(&[
        ("childLei", vec![Some("X")]),
        ("parentLei", vec![Some("Y")]),
    ]);
    let valid: ValidLeiSet = ["X"].into_iter().collect();
    let out = RelationshipNormalizer::default()
        .normalize(&raw, &valid)
        .unwrap();

    assert_eq!(out.data.height(), 0);
    assert_eq!(out.report.referential_integrity.child, 0);
    assert_eq!(out.report.referential_integrity.parent, 1);
    assert_eq!(out.report.summary().referential_integrity_issues, 1);
    assert_eq!(out.report.invalid_records, 1);
}

#[test]
fn ownership_percentage_is_clamped_or_nulled() {
    let raw = make_df(&[
        ("ChildLEI", vec![Some("X"), Some("X")]),
        ("ParentLEI", vec![Some("Y"), Some("Z")]),
        ("PercentageOwnership", vec![Some("150"), Some("abc")]),
    ]);
    let valid: ValidLeiSet = ["X", "Y", "Z"].into_iter().collect();
    let out = RelationshipNormalizer::default()
        .normalize(&raw, &valid)
        .unwrap();

    let pct = out
        .data
        .column("ownershipPercentage")
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect::<Vec<_>>();
    assert_eq!(pct, vec![Some(100.0), None]);
}

#[test]
fn resolver_prefers_first_synonym_and_drops_unmapped() {
    let raw = make_df(&[
        ("lei", vec![Some("second")]),
        ("LEI", vec![Some("first")]),
        ("Unrelated", vec![Some("x")]),
    ]);
    let resolved = resolve(DatasetType::LegalEntities, &raw).unwrap();

    let expected: Vec<String> = DatasetType::LegalEntities
        .fields()
        .iter()
        .map(|field| field.name.to_string())
        .collect();
    assert_eq!(column_names(&resolved), expected);
    assert_eq!(strings(&resolved, "lei"), owned(&[Some("first")]));
    assert_eq!(strings(&resolved, "city"), vec![None]);
}

#[test]
fn resolver_maps_xml_paths() {
    let raw = make_df(&[
        ("Relationship.StartNode.NodeID", vec![Some("C")]),
        ("Relationship.EndNode.NodeID", vec![Some("P")]),
        ("NodeID", vec![Some("C")]),
    ]);
    let resolved = resolve(DatasetType::Relationships, &raw).unwrap();
    assert_eq!(strings(&resolved, "childLei"), owned(&[Some("C")]));
    assert_eq!(strings(&resolved, "parentLei"), owned(&[Some("P")]));
}

#[test]
fn resolver_rejects_batch_without_key_columns() {
    let raw = make_df(&[("Something", vec![Some("x")])]);
    let err = resolve(DatasetType::LegalEntities, &raw).unwrap_err();
    assert!(matches!(
        err,
        NormalizeError::UnresolvableSchema { dataset: DatasetType::LegalEntities, .. }
    ));
    assert!(err.to_string().contains("Something"));
}

#[test]
fn source_resolver_accepts_keyless_batch_of_keyed_source() {
    let mut resolver = SourceResolver::new(DatasetType::LegalEntities);
    let first = resolver
        .resolve_batch(&make_df(&[
            ("LEI", vec![Some("L1")]),
            ("LegalName", vec![Some("Alpha")]),
        ]))
        .unwrap();
    let second = resolver
        .resolve_batch(&make_df(&[("LegalName", vec![Some("No key")])]))
        .unwrap();
    resolver.finish().unwrap();

    assert_eq!(strings(&second, "lei"), vec![None]);
    let mut combined = first;
    combined.vstack_mut(&second).unwrap();

    let out = EntityNormalizer::default().normalize(&combined).unwrap();
    assert_eq!(out.report.total_records, 2);
    assert_eq!(out.report.valid_records, 1);
    assert_eq!(out.report.invalid_records, 1);
    assert!(
        out.report
            .warnings
            .contains(&"Removed 1 records with null lei".to_string())
    );
}

#[test]
fn source_resolver_rejects_source_that_never_maps_a_key() {
    let mut resolver = SourceResolver::new(DatasetType::Relationships);
    resolver
        .resolve_batch(&make_df(&[("Foo", vec![Some("x")])]))
        .unwrap();
    resolver
        .resolve_batch(&make_df(&[("Bar", vec![Some("y")])]))
        .unwrap();

    let err = resolver.finish().unwrap_err();
    match err {
        NormalizeError::UnresolvableSchema { dataset, columns, .. } => {
            assert_eq!(dataset, DatasetType::Relationships);
            assert_eq!(columns, vec!["Bar".to_string(), "Foo".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn columnless_rows_resolve_to_null_records() {
    let resolved = resolve(
        DatasetType::LegalEntities,
        &DataFrame::empty_with_height(2),
    )
    .unwrap();
    assert_eq!(resolved.height(), 2);
    assert_eq!(strings(&resolved, "lei"), vec![None, None]);

    let out = EntityNormalizer::default().normalize(&resolved).unwrap();
    assert_eq!(out.report.total_records, 2);
    assert_eq!(out.report.invalid_records, 2);
    assert_eq!(out.data.height(), 0);
}

#[test]
fn empty_batch_resolves_to_empty_canonical() {
    let df = empty_canonical(DatasetType::Relationships).unwrap();
    assert_eq!(df.height(), 0);
    assert_eq!(df.width(), DatasetType::Relationships.fields().len());

    let out = EntityNormalizer::default()
        .normalize(&DataFrame::empty())
        .unwrap();
    assert_eq!(out.report.total_records, 0);
    assert_eq!(out.report.validity_rate(), 0.0);
}

#[test]
fn coercion_types_columns() {
    let raw = make_df(&[
        ("lei", vec![Some(" abc "), Some("   ")]),
        ("legalName", vec![Some("  Acme  "), None]),
        ("previousName", vec![Some(" "), Some(" Old ")]),
        ("registrationDate", vec![Some("2012-06-06T15:53:00Z"), Some("nope")]),
    ]);
    let resolved = resolve(DatasetType::LegalEntities, &raw).unwrap();
    let coerced = coerce(DatasetType::LegalEntities, &resolved).unwrap();

    assert_eq!(coerced.height(), 2);
    assert_eq!(strings(&coerced, "lei"), owned(&[Some("ABC"), None]));
    assert_eq!(strings(&coerced, "legalName"), owned(&[Some("Acme"), Some("")]));
    assert_eq!(strings(&coerced, "previousName"), owned(&[None, Some("Old")]));
    assert_eq!(strings(&coerced, "city"), owned(&[Some(""), Some("")]));
    let date = coerced.column("registrationDate").unwrap();
    assert_eq!(date.dtype(), &DataType::Date);
    assert_eq!(strings(&coerced, "registrationDate"), owned(&[Some("2012-06-06"), None]));
}

#[test]
fn required_filter_reports_each_field() {
    let raw = make_df(&[
        ("childLei", vec![Some("A"), None, Some("C"), None]),
        ("parentLei", vec![Some("P"), Some("P"), None, None]),
    ]);
    let mut report = QualityReport::new();
    let out = filter_required(DatasetType::Relationships, &raw, &mut report).unwrap();

    assert_eq!(strings(&out, "childLei"), owned(&[Some("A")]));
    assert_eq!(
        report.warnings,
        vec![
            "Removed 2 records with null childLei".to_string(),
            "Removed 1 records with null parentLei".to_string(),
        ]
    );
}

#[test]
fn integrity_counts_both_sides_and_removes_once() {
    let df = make_df(&[
        ("childLei", vec![Some("A"), Some("Q"), Some("Q"), Some("B")]),
        ("parentLei", vec![Some("B"), Some("B"), Some("R"), Some("R")]),
    ]);
    let valid: ValidLeiSet = ["A", "B"].into_iter().collect();
    let mut report = QualityReport::new();
    let out = enforce_referential_integrity(&df, &valid, &mut report).unwrap();

    assert_eq!(out.height(), 1);
    assert_eq!(report.referential_integrity.child, 2);
    assert_eq!(report.referential_integrity.parent, 2);
    assert_eq!(report.warnings.len(), 2);
}

#[test]
fn duplicate_report_policy_keeps_rows() {
    let raw = make_df(&[
        ("lei", vec![Some("A"), Some("a "), Some("B")]),
        ("legalName", vec![Some("Alpha"), Some("Alpha 2"), Some("Beta")]),
        ("entityStatus", vec![Some("ACTIVE"), Some("ACTIVE"), Some("ACTIVE")]),
    ]);
    let out = EntityNormalizer::default().normalize(&raw).unwrap();
    assert_eq!(out.data.height(), 3);
    assert_eq!(out.report.duplicate_count, 2);
    assert_eq!(out.report.validity_rate(), 100.0);
    assert!(out.report.warnings.iter().any(|w| w == "Found 2 duplicate LEI records"));
}

#[test]
fn duplicate_reject_policy_keeps_first() {
    let raw = make_df(&[
        ("lei", vec![Some("A"), Some("A"), Some("B")]),
        ("legalName", vec![Some("Alpha"), Some("Alpha 2"), Some("Beta")]),
        ("entityStatus", vec![Some("ACTIVE"), Some("ACTIVE"), Some("ACTIVE")]),
    ]);
    let options = NormalizationOptions::new().with_duplicate_policy(DuplicatePolicy::Reject);
    let out = EntityNormalizer::new(options).normalize(&raw).unwrap();

    assert_eq!(out.data.height(), 2);
    assert_eq!(strings(&out.data, "legalName"), owned(&[Some("Alpha"), Some("Beta")]));
    assert_eq!(out.report.duplicate_count, 2);
    assert_eq!(out.report.invalid_records, 1);
    assert_eq!(out.report.validity_rate(), 66.67);
}

#[test]
fn entity_ids_are_derived_from_lei() {
    let raw = make_df(&[
        ("lei", vec![Some("abc123")]),
        ("legalName", vec![Some("Acme")]),
    ]);
    let out = EntityNormalizer::default().normalize(&raw).unwrap();
    assert_eq!(
        strings(&out.data, "entity_id"),
        vec![Some(entity_id("ABC123"))]
    );
    assert_eq!(out.valid_leis().len(), 1);
    assert!(out.valid_leis().contains("ABC123"));
}

#[test]
fn relationship_status_is_standardized_after_integrity() {
    let raw = make_df(&[
        ("child_lei", vec![Some("A"), Some("A")]),
        ("parent_lei", vec![Some("B"), Some("Z")]),
        ("relationship_status", vec![Some("lapsed"), Some("bogus")]),
    ]);
    let valid: ValidLeiSet = ["A", "B"].into_iter().collect();
    let out = RelationshipNormalizer::default()
        .normalize(&raw, &valid)
        .unwrap();

    assert_eq!(strings(&out.data, "relationshipStatus"), owned(&[Some("ACTIVE")]));
    assert!(
        out.report
            .warnings
            .iter()
            .any(|w| w.starts_with("Found 1 records with unknown relationshipStatus"))
    );
}

#[test]
fn prepare_then_finish_matches_normalize() {
    let raw = make_df(&[
        ("ChildLEI", vec![Some("a"), Some("b"), None]),
        ("ParentLEI", vec![Some("b"), Some("c"), Some("a")]),
        ("RelationshipStatus", vec![Some("ACTIVE"), Some("INACTIVE"), Some("ACTIVE")]),
    ]);
    let valid: ValidLeiSet = ["A", "B"].into_iter().collect();
    let normalizer = RelationshipNormalizer::default();

    let prepared = normalizer.prepare(&raw).unwrap();
    assert_eq!(prepared.data().height(), 2);
    assert_eq!(prepared.report().total_records, 3);

    let split = normalizer.finish(prepared, &valid).unwrap();
    let whole = normalizer.normalize(&raw, &valid).unwrap();
    assert!(split.data.equals_missing(&whole.data));
    assert_eq!(split.report, whole.report);
    assert_eq!(split.data.height(), 1);
}

#[test]
fn typed_records_round_out_normalized_batches() {
    let raw = make_df(&[
        ("LEI", vec![Some("abc123")]),
        ("LegalName", vec![Some("Acme")]),
        ("EntityStatus", vec![Some("merged")]),
        ("InitialRegistrationDate", vec![Some("2012-06-06")]),
    ]);
    let entities = EntityNormalizer::default().normalize(&raw).unwrap();
    let records = entity_records(&entities.data).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.lei, "ABC123");
    assert_eq!(record.entity_status.as_str(), "MERGED");
    assert_eq!(record.entity_id, entity_id("ABC123"));
    assert_eq!(record.city, "");
    assert_eq!(
        record.registration_date,
        chrono::NaiveDate::from_ymd_opt(2012, 6, 6)
    );

    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["legalName"], "Acme");
    assert!(json.get("entity_id").is_some());

    let rels = make_df(&[
        ("childLei", vec![Some("ABC123")]),
        ("parentLei", vec![Some("ABC123")]),
        ("ownershipPercentage", vec![Some("25.5")]),
    ]);
    let rels = RelationshipNormalizer::default()
        .normalize(&rels, &entities.valid_leis())
        .unwrap();
    let records = relationship_records(&rels.data).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ownership_percentage, Some(25.5));
    assert_eq!(records[0].relationship_status.as_str(), "ACTIVE");
}
