#[path = "../common/mod.rs"]
mod common;

use datarepo::model::{Dataset, RowSelectionTable, Snapshot, SnapshotRequestContents};
use datarepo::render::{render_map_tables, Include, MapColumnModel, SnapshotModel};
use datarepo::snapshot::{SnapshotBuilder, SnapshotError};

fn asset_snapshot() -> (Snapshot, Dataset) {
    let dataset = common::dataset_d();
    let catalog = common::catalog_with(dataset.clone());
    let snapshot = SnapshotBuilder::new(&catalog)
        .build(&common::request(SnapshotRequestContents::by_asset("D", "Sample")))
        .unwrap();
    (snapshot, dataset)
}

#[test]
fn test_default_sections() {
    let (snapshot, _) = asset_snapshot();
    let model = SnapshotModel::render(&snapshot, &Include::DEFAULT);

    let sources = model.source.unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].dataset.name, "D");
    assert_eq!(sources[0].asset.as_deref(), Some("Sample"));

    let tables = model.tables.unwrap();
    assert_eq!(tables[0].name, "sample");
    assert_eq!(tables[0].primary_key, vec!["id"]);

    let relationships = model.relationships.unwrap();
    assert_eq!(relationships[0].from.table, "participant");
    assert_eq!(relationships[0].to.column, "participant_id");
    assert_eq!(model.profile_id, snapshot.profile_id);
}

#[test]
fn test_none_supersedes_other_sections() {
    let (snapshot, _) = asset_snapshot();
    let include = Include::parse_list(["TABLES", "none", "PROFILE"]).unwrap();
    let model = SnapshotModel::render(&snapshot, &include);

    assert!(model.source.is_none());
    assert!(model.tables.is_none());
    assert!(model.relationships.is_none());
    assert!(model.profile_id.is_none());

    let json = serde_json::to_value(&model).unwrap();
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["description", "name"]);
}

#[test]
fn test_only_requested_sections() {
    let (snapshot, _) = asset_snapshot();
    let model = SnapshotModel::render(&snapshot, &[Include::Tables, Include::DataProject]);

    assert!(model.tables.is_some());
    assert!(model.source.is_none());
    assert!(model.relationships.is_none());
}

#[test]
fn test_json_uses_camel_case() {
    let (snapshot, _) = asset_snapshot();
    let model = SnapshotModel::render(&snapshot, &Include::DEFAULT);
    let json = serde_json::to_value(&model).unwrap();

    assert!(json.get("profileId").is_some());
    let column = &json["tables"][0]["columns"][0];
    assert_eq!(column["name"], "id");
    assert_eq!(column["datatype"], "string");
    assert_eq!(column["arrayOf"], false);
    assert_eq!(json["tables"][0]["primaryKey"][0], "id");
}

#[test]
fn test_map_tables_by_name() {
    let (snapshot, dataset) = asset_snapshot();
    let maps = render_map_tables(&snapshot, &dataset).unwrap();

    assert_eq!(maps.len(), 2);
    assert_eq!(maps[0].from_table, "sample");
    assert_eq!(maps[0].to_table, "sample");
    assert_eq!(
        maps[1].columns,
        vec![
            MapColumnModel {
                from_column: "id".to_string(),
                to_column: "id".to_string(),
            },
            MapColumnModel {
                from_column: "age".to_string(),
                to_column: "age".to_string(),
            },
        ]
    );
}

#[test]
fn test_map_tables_reject_foreign_dataset() {
    let (snapshot, _) = asset_snapshot();
    let other = common::dataset_d();
    let err = render_map_tables(&snapshot, &other).unwrap_err();
    assert!(matches!(err, SnapshotError::CorruptMetadata(_)));
}

#[test]
fn test_row_selection_relationships_render_empty() {
    let dataset = common::dataset_d();
    let catalog = common::catalog_with(dataset);
    let snapshot = SnapshotBuilder::new(&catalog)
        .build(&common::request(SnapshotRequestContents::by_row_selection(
            "D",
            vec![RowSelectionTable {
                table_name: "sample".to_string(),
                columns: vec!["id".to_string()],
                row_ids: vec!["s1".to_string()],
            }],
        )))
        .unwrap();

    let model = SnapshotModel::render(&snapshot, &[Include::Relationships]);
    assert_eq!(model.relationships, Some(Vec::new()));
    insta::assert_snapshot!(
        serde_json::to_string(&model).unwrap(),
        @r#"{"name":"snap","description":"a snapshot of D","relationships":[]}"#
    );
}
