//! End-to-end pipeline runs over scratch source files.

use std::fs;
use std::path::{Path, PathBuf};

use lei_cli::config::PipelineConfig;
use lei_cli::pipeline::{RunRequest, load_dataset, run_pipeline};
use lei_common::optional_string_values;
use lei_ingest::IngestOptions;
use lei_model::{DatasetType, DuplicatePolicy};
use lei_persist::{SnapshotStore, SnapshotVersion};
use tempfile::{TempDir, tempdir};

const ENTITIES_CSV: &str = "\
LEI,LegalName,EntityStatus,LegalAddressCity
L1,Alpha Holdings,ACTIVE,Berlin
L2,Beta Industries,INACTIVE,
L3,,ACTIVE,Paris
";

const RELATIONSHIPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rr:RelationshipData xmlns:rr="http://www.gleif.org/data/schema/rr/2016">
  <rr:RelationshipRecords>
    <rr:RelationshipRecord>
      <rr:Relationship>
        <rr:StartNode><rr:NodeID>L1</rr:NodeID></rr:StartNode>
        <rr:EndNode><rr:NodeID>L2</rr:NodeID></rr:EndNode>
        <rr:RelationshipType>IS_DIRECTLY_CONSOLIDATED_BY</rr:RelationshipType>
        <rr:RelationshipStatus>ACTIVE</rr:RelationshipStatus>
      </rr:Relationship>
    </rr:RelationshipRecord>
    <rr:RelationshipRecord>
      <rr:Relationship>
        <rr:StartNode><rr:NodeID>L1</rr:NodeID></rr:StartNode>
        <rr:EndNode><rr:NodeID>L9</rr:NodeID></rr:EndNode>
        <rr:RelationshipType>IS_ULTIMATELY_CONSOLIDATED_BY</rr:RelationshipType>
      </rr:Relationship>
    </rr:RelationshipRecord>
    <rr:RelationshipRecord>
      <rr:Relationship>
        <rr:StartNode><rr:NodeID>L3</rr:NodeID></rr:StartNode>
        <rr:EndNode><rr:NodeID>L1</rr:NodeID></rr:EndNode>
        <rr:RelationshipType>IS_DIRECTLY_CONSOLIDATED_BY</rr:RelationshipType>
      </rr:Relationship>
    </rr:RelationshipRecord>
  </rr:RelationshipRecords>
</rr:RelationshipData>
"#;

// The second record has no identifier, the third no text at all.
const ENTITIES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lei:LEIData xmlns:lei="http://www.gleif.org/data/schema/leidata/2016">
  <lei:LEIRecords>
    <lei:LEIRecord>
      <lei:LEI>L1</lei:LEI>
      <lei:Entity><lei:LegalName>Alpha Holdings</lei:LegalName></lei:Entity>
    </lei:LEIRecord>
    <lei:LEIRecord>
      <lei:Entity><lei:LegalName>Nameless Key Ltd</lei:LegalName></lei:Entity>
    </lei:LEIRecord>
    <lei:LEIRecord>
      <lei:Entity/>
    </lei:LEIRecord>
  </lei:LEIRecords>
</lei:LEIData>
"#;

struct Fixture {
    dir: TempDir,
    entities: PathBuf,
    relationships: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let entities = dir.path().join("lei2.csv");
        let relationships = dir.path().join("rr.xml");
        fs::write(&entities, ENTITIES_CSV).unwrap();
        fs::write(&relationships, RELATIONSHIPS_XML).unwrap();
        Self {
            dir,
            entities,
            relationships,
        }
    }

    fn output_dir(&self) -> PathBuf {
        self.dir.path().join("snapshots")
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            output_dir: self.output_dir(),
            batch_size: 1,
            ..PipelineConfig::default()
        }
    }

    fn request(&self, version: Option<&str>) -> RunRequest {
        RunRequest {
            entities: self.entities.clone(),
            relationships: Some(self.relationships.clone()),
            version: version.map(str::to_string),
        }
    }
}

fn no_outputs(root: &Path) -> bool {
    let store = SnapshotStore::open(root).unwrap();
    store.list_all_versions().unwrap().values().all(Vec::is_empty)
        && store.list_quality_reports().unwrap().is_empty()
}

#[tokio::test]
async fn run_writes_snapshot_pair_and_report() {
    let fixture = Fixture::new();
    let outcome = run_pipeline(&fixture.config(), fixture.request(Some("v1")))
        .await
        .unwrap();

    assert_eq!(outcome.version, "v1");
    assert_eq!(outcome.datasets.len(), 2);

    let entities = outcome.dataset(DatasetType::LegalEntities).unwrap();
    assert_eq!(entities.summary.total_records, 3);
    assert_eq!(entities.summary.valid_records, 2);
    assert_eq!(entities.summary.validity_rate, 66.67);

    let relationships = outcome.dataset(DatasetType::Relationships).unwrap();
    assert_eq!(relationships.summary.total_records, 3);
    assert_eq!(relationships.summary.valid_records, 1);
    assert_eq!(relationships.summary.referential_integrity_issues, 2);
    assert_eq!(relationships.summary.validity_rate, 33.33);

    let store = SnapshotStore::open(fixture.output_dir()).unwrap();
    let version = SnapshotVersion::named("v1");
    let entity_snapshot = store.read(DatasetType::LegalEntities, &version).unwrap();
    assert_eq!(
        optional_string_values(&entity_snapshot, "lei").unwrap(),
        vec![Some("L1".to_string()), Some("L2".to_string())]
    );
    assert!(entity_snapshot.column("entity_id").is_ok());

    let relationship_snapshot = store.read(DatasetType::Relationships, &version).unwrap();
    assert_eq!(
        optional_string_values(&relationship_snapshot, "parentLei").unwrap(),
        vec![Some("L2".to_string())]
    );

    let report = store.read_quality_report(&version).unwrap();
    assert_eq!(report.get(DatasetType::LegalEntities), Some(&entities.summary));
    assert_eq!(
        report.get(DatasetType::Relationships),
        Some(&relationships.summary)
    );
    assert_eq!(outcome.quality_report, store.quality_report_path("v1"));
}

#[tokio::test]
async fn repeated_runs_are_reproducible() {
    let fixture = Fixture::new();
    let config = fixture.config();
    run_pipeline(&config, fixture.request(Some("20240101_000000")))
        .await
        .unwrap();
    run_pipeline(&config, fixture.request(Some("20240102_000000")))
        .await
        .unwrap();

    let store = SnapshotStore::open(fixture.output_dir()).unwrap();
    let first = store
        .read(
            DatasetType::LegalEntities,
            &SnapshotVersion::named("20240101_000000"),
        )
        .unwrap();
    let latest = store
        .read(DatasetType::LegalEntities, &SnapshotVersion::Latest)
        .unwrap();
    assert!(first.equals_missing(&latest));
    assert_eq!(
        store.read_quality_report(&SnapshotVersion::Latest).unwrap(),
        store
            .read_quality_report(&SnapshotVersion::named("20240101_000000"))
            .unwrap()
    );
}

#[tokio::test]
async fn entity_only_run_skips_relationships() {
    let fixture = Fixture::new();
    let request = RunRequest {
        relationships: None,
        ..fixture.request(None)
    };
    let outcome = run_pipeline(&fixture.config(), request).await.unwrap();

    assert_eq!(outcome.datasets.len(), 1);
    assert_eq!(outcome.version.len(), 15);

    let store = SnapshotStore::open(fixture.output_dir()).unwrap();
    assert!(store.list_versions(DatasetType::Relationships).unwrap().is_empty());
    let report = store.read_quality_report(&SnapshotVersion::Latest).unwrap();
    assert!(report.relationships.is_none());
    assert!(report.legal_entities.is_some());
}

#[tokio::test]
async fn missing_relationship_source_writes_nothing() {
    let fixture = Fixture::new();
    let request = RunRequest {
        relationships: Some(fixture.dir.path().join("absent.xml")),
        ..fixture.request(Some("v1"))
    };

    let err = run_pipeline(&fixture.config(), request).await.unwrap_err();
    assert!(format!("{err:#}").contains("absent.xml"));
    assert!(no_outputs(&fixture.output_dir()));
}

#[tokio::test]
async fn unresolvable_entity_schema_writes_nothing() {
    let fixture = Fixture::new();
    fs::write(&fixture.entities, "foo,bar\n1,2\n").unwrap();

    let err = run_pipeline(&fixture.config(), fixture.request(Some("v1")))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("foo"));
    assert!(no_outputs(&fixture.output_dir()));
}

#[tokio::test]
async fn invalid_version_fails_before_normalizing() {
    let fixture = Fixture::new();
    let err = run_pipeline(&fixture.config(), fixture.request(Some("../v1")))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid snapshot version"));
}

#[tokio::test]
async fn reject_policy_drops_duplicate_entities() {
    let fixture = Fixture::new();
    fs::write(
        &fixture.entities,
        "LEI,LegalName\nL1,Alpha\nL2,Beta\nL1,Alpha again\n",
    )
    .unwrap();
    let config = PipelineConfig {
        duplicate_policy: DuplicatePolicy::Reject,
        ..fixture.config()
    };
    let request = RunRequest {
        relationships: None,
        ..fixture.request(Some("v1"))
    };

    let outcome = run_pipeline(&config, request).await.unwrap();
    let entities = outcome.dataset(DatasetType::LegalEntities).unwrap();
    assert_eq!(entities.summary.duplicate_count, 2);
    assert_eq!(entities.summary.valid_records, 2);
    assert_eq!(entities.rows, 2);
}

#[tokio::test]
async fn failed_relationship_write_leaves_no_partial_version() {
    let fixture = Fixture::new();
    let store = SnapshotStore::open(fixture.output_dir()).unwrap();
    fs::create_dir_all(store.snapshot_path(DatasetType::Relationships, "v1")).unwrap();

    let err = run_pipeline(&fixture.config(), fixture.request(Some("v1")))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("v1"));

    assert!(!store.snapshot_path(DatasetType::LegalEntities, "v1").exists());
    assert!(!store.quality_report_path("v1").exists());
    assert!(no_outputs(&fixture.output_dir()));
}

#[tokio::test]
async fn xml_records_without_identifier_are_dropped_not_fatal() {
    let fixture = Fixture::new();
    let entities = fixture.dir.path().join("lei.xml");
    fs::write(&entities, ENTITIES_XML).unwrap();
    let request = RunRequest {
        entities,
        relationships: None,
        version: Some("v1".to_string()),
    };

    let outcome = run_pipeline(&fixture.config(), request).await.unwrap();
    let summary = &outcome.dataset(DatasetType::LegalEntities).unwrap().summary;
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.valid_records, 1);
    assert_eq!(summary.invalid_records, 2);
    assert!(
        outcome.datasets[0]
            .warnings
            .contains(&"Removed 2 records with null lei".to_string())
    );

    let snapshot = SnapshotStore::open(fixture.output_dir())
        .unwrap()
        .read(DatasetType::LegalEntities, &SnapshotVersion::named("v1"))
        .unwrap();
    assert_eq!(
        optional_string_values(&snapshot, "lei").unwrap(),
        vec![Some("L1".to_string())]
    );
}

#[test]
fn load_dataset_keeps_keyless_xml_batches() {
    let fixture = Fixture::new();
    let path = fixture.dir.path().join("lei.xml");
    fs::write(&path, ENTITIES_XML).unwrap();
    let options = IngestOptions::new(DatasetType::LegalEntities).with_batch_size(1);

    let df = load_dataset(DatasetType::LegalEntities, &path, options).unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(
        optional_string_values(&df, "lei").unwrap(),
        vec![Some("L1".to_string()), None, None]
    );
}

#[test]
fn load_dataset_combines_batches() {
    let fixture = Fixture::new();
    let options = IngestOptions::new(DatasetType::Relationships).with_batch_size(2);
    let df = load_dataset(DatasetType::Relationships, &fixture.relationships, options).unwrap();

    assert_eq!(df.height(), 3);
    assert_eq!(
        optional_string_values(&df, "childLei").unwrap(),
        vec![
            Some("L1".to_string()),
            Some("L1".to_string()),
            Some("L3".to_string())
        ]
    );
    assert_eq!(df.width(), DatasetType::Relationships.fields().len());
}

#[test]
fn load_dataset_respects_record_limit() {
    let fixture = Fixture::new();
    let options = IngestOptions::new(DatasetType::LegalEntities).with_max_records(Some(2));
    let df = load_dataset(DatasetType::LegalEntities, &fixture.entities, options).unwrap();
    assert_eq!(df.height(), 2);
}
