#[path = "../common/mod.rs"]
mod common;

use datarepo::model::{AssetTable, SnapshotMode};
use datarepo::snapshot::{AssetBased, Deriver, SnapshotError};

#[test]
fn test_one_table_per_asset_table() {
    let dataset = common::dataset_d();
    let asset = dataset.asset_by_name("Sample").unwrap().clone();
    let derivation = AssetBased::new(common::shared(dataset), "Sample")
        .derive()
        .unwrap();

    assert_eq!(derivation.tables.len(), asset.asset_tables.len());
    for (table, asset_table) in derivation.tables.iter().zip(&asset.asset_tables) {
        assert_eq!(table.columns.len(), asset_table.columns.len());
    }
    assert_eq!(derivation.map_tables.len(), derivation.tables.len());
}

#[test]
fn test_tables_follow_asset_order() {
    let derivation = AssetBased::new(common::shared(common::dataset_d()), "Sample")
        .derive()
        .unwrap();
    let names: Vec<_> = derivation.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["sample", "participant"]);
}

#[test]
fn test_asset_subset_of_columns() {
    let mut dataset = common::dataset_d();
    let sample = dataset.table_by_name("sample").unwrap();
    let narrow = AssetTable {
        table: sample.id,
        columns: vec![sample.columns[2].id, sample.columns[0].id],
    };
    dataset.assets[0].asset_tables = vec![narrow];

    let derivation = AssetBased::new(common::shared(dataset), "Sample")
        .derive()
        .unwrap();
    assert_eq!(derivation.tables.len(), 1);
    let table = &derivation.tables[0];
    let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["date_collected", "id"]);

    let key: Vec<_> = table.primary_key_columns().map(|c| c.name.as_str()).collect();
    assert_eq!(key, vec!["id"]);
}

#[test]
fn test_derivation_records_asset_and_source() {
    let dataset = common::shared(common::dataset_d());
    let deriver = AssetBased::new(dataset.clone(), "Sample");
    assert_eq!(deriver.mode(), SnapshotMode::ByAsset);

    let derivation = deriver.derive().unwrap();
    assert_eq!(derivation.source.id, dataset.id);
    let asset = derivation.asset.unwrap();
    assert_eq!(asset.name, "Sample");
    assert_eq!(asset.id, dataset.assets[0].id);
}

#[test]
fn test_unknown_asset_fails_without_output() {
    let err = AssetBased::new(common::shared(common::dataset_d()), "Blood")
        .derive()
        .unwrap_err();
    assert_eq!(
        err,
        SnapshotError::AssetNotFound {
            dataset: "D".to_string(),
            asset: "Blood".to_string(),
        }
    );
    assert!(!err.is_retryable());
}

#[test]
fn test_repeated_column_is_mapped_once() {
    let mut dataset = common::dataset_d();
    let sample = dataset.table_by_name("sample").unwrap();
    let id = sample.columns[0].id;
    dataset.assets[0].asset_tables[0].columns = vec![id, id];

    let derivation = AssetBased::new(common::shared(dataset), "Sample")
        .derive()
        .unwrap();
    assert_eq!(derivation.tables[0].columns.len(), 1);
    let from: Vec<_> = derivation.map_tables[0]
        .map_columns
        .iter()
        .map(|m| m.from_column)
        .collect();
    assert_eq!(from, vec![id]);
}
