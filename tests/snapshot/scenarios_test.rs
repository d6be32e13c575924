//! End-to-end derivations over dataset D.

#[path = "../common/mod.rs"]
mod common;

use datarepo::model::{RowSelectionTable, SnapshotRequestContents};
use datarepo::snapshot::{SnapshotBuilder, SnapshotError};

#[test]
fn test_asset_snapshot() {
    let catalog = common::catalog_with(common::dataset_d());
    let dataset = common::dataset_d();
    let request = common::request(SnapshotRequestContents::by_asset("D", "Sample"));

    let snapshot = SnapshotBuilder::new(&catalog).build(&request).unwrap();

    assert_eq!(common::table_names(&snapshot), vec!["sample", "participant"]);
    for table in &snapshot.tables {
        let dataset_table = dataset.table_by_name(&table.name).unwrap();
        let expected: Vec<_> = dataset_table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(common::column_names(table), expected);
    }
    assert_eq!(
        common::relationship_lines(&snapshot),
        vec!["participant_sample: participant.id -> sample.participant_id"]
    );
    assert_eq!(
        snapshot.first_source().unwrap().asset.as_ref().unwrap().name,
        "Sample"
    );
}

#[test]
fn test_row_selection_snapshot() {
    let catalog = common::catalog_with(common::dataset_d());
    let request = common::request(SnapshotRequestContents::by_row_selection(
        "D",
        vec![RowSelectionTable {
            table_name: "participant".to_string(),
            columns: vec!["id".to_string()],
            row_ids: vec!["p1".to_string(), "p2".to_string()],
        }],
    ));

    let snapshot = SnapshotBuilder::new(&catalog).build(&request).unwrap();

    assert_eq!(common::table_names(&snapshot), vec!["participant"]);
    assert_eq!(common::column_names(&snapshot.tables[0]), vec!["id"]);
    assert!(snapshot.relationships.is_empty());
    assert!(snapshot.first_source().unwrap().asset.is_none());
}

#[test]
fn test_full_view_snapshot() {
    let catalog = common::catalog_with(common::dataset_d());
    let dataset = common::dataset_d();
    let request = common::request(SnapshotRequestContents::full_view("D"));

    let snapshot = SnapshotBuilder::new(&catalog).build(&request).unwrap();

    assert_eq!(snapshot.tables.len(), dataset.tables.len());
    for (table, dataset_table) in snapshot.tables.iter().zip(&dataset.tables) {
        assert_eq!(table.columns.len(), dataset_table.columns.len());
    }
    assert_eq!(
        common::relationship_lines(&snapshot),
        common::dataset_relationship_lines(&dataset)
    );
}

#[test]
fn test_query_snapshot_matches_asset_snapshot() {
    let catalog = common::catalog_with(common::dataset_d());
    let builder = SnapshotBuilder::new(&catalog);

    let by_asset = builder
        .build(&common::request(SnapshotRequestContents::by_asset("D", "Sample")))
        .unwrap();
    let by_query = builder
        .build(&common::request(SnapshotRequestContents::by_query(
            "D",
            "Sample",
            "SELECT D.sample.id FROM D.sample",
        )))
        .unwrap();

    assert_eq!(by_query.tables, by_asset.tables);
    assert_eq!(by_query.relationships, by_asset.relationships);
    assert_eq!(by_query.sources, by_asset.sources);
    assert_ne!(by_query.creation_information, by_asset.creation_information);
}

#[test]
fn test_missing_asset_produces_nothing() {
    let catalog = common::catalog_with(common::dataset_d());
    let request = common::request(SnapshotRequestContents::by_asset("D", "NoSuchAsset"));

    let result = SnapshotBuilder::new(&catalog).build(&request);
    assert_eq!(
        result,
        Err(SnapshotError::AssetNotFound {
            dataset: "D".to_string(),
            asset: "NoSuchAsset".to_string(),
        })
    );
}

#[test]
fn test_maps_have_no_dangling_references() {
    let dataset = common::dataset_d();
    let catalog = common::catalog_with(dataset.clone());
    let builder = SnapshotBuilder::new(&catalog);

    let requests = [
        SnapshotRequestContents::full_view("D"),
        SnapshotRequestContents::by_asset("D", "Sample"),
        SnapshotRequestContents::by_row_selection(
            "D",
            vec![RowSelectionTable {
                table_name: "sample".to_string(),
                columns: vec!["participant_id".to_string(), "id".to_string()],
                row_ids: vec!["s1".to_string()],
            }],
        ),
    ];
    for contents in requests {
        let snapshot = builder.build(&common::request(contents)).unwrap();
        common::assert_maps_consistent(&snapshot, &dataset);
    }
}

#[test]
fn test_derivation_is_deterministic_up_to_identity() {
    // Two independently built copies of D have different ids but the same shape.
    let first = common::catalog_with(common::dataset_d());
    let second = common::catalog_with(common::dataset_d());
    let request = common::request(SnapshotRequestContents::by_asset("D", "Sample"));

    let a = SnapshotBuilder::new(&first).build(&request).unwrap();
    let b = SnapshotBuilder::new(&second).build(&request).unwrap();

    assert_ne!(a.sources[0].dataset.id, b.sources[0].dataset.id);
    assert_eq!(a.tables, b.tables);
    assert_eq!(common::relationship_lines(&a), common::relationship_lines(&b));
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}

#[test]
fn test_build_from_resolved_dataset() {
    let dataset = common::shared(common::dataset_d());
    let catalog = datarepo::catalog::InMemoryCatalog::new();
    let request = common::request(SnapshotRequestContents::full_view("D"));

    let snapshot = SnapshotBuilder::new(&catalog)
        .build_from(dataset.clone(), &request)
        .unwrap();
    assert_eq!(snapshot.sources[0].dataset.id, dataset.id);
    assert_eq!(snapshot.name, "snap");
    assert_eq!(snapshot.description, "a snapshot of D");
    assert_eq!(snapshot.profile_id, request.profile_id);
}
