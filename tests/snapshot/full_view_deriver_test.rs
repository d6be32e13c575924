#[path = "../common/mod.rs"]
mod common;

use datarepo::model::{Column, DataType, DatasetTable, SnapshotMode};
use datarepo::snapshot::{Deriver, FullView};

#[test]
fn test_full_view_fidelity() {
    let dataset = common::dataset_d();
    let derivation = FullView::new(common::shared(dataset.clone()))
        .derive()
        .unwrap();

    assert_eq!(derivation.tables.len(), dataset.tables.len());
    for (snapshot_table, dataset_table) in derivation.tables.iter().zip(&dataset.tables) {
        assert_eq!(snapshot_table.name, dataset_table.name);
        let snapshot_columns: Vec<_> = snapshot_table.columns.iter().map(|c| &c.name).collect();
        let dataset_columns: Vec<_> = dataset_table.columns.iter().map(|c| &c.name).collect();
        assert_eq!(snapshot_columns, dataset_columns);
    }
    assert!(derivation.asset.is_none());
}

#[test]
fn test_full_view_copies_types_and_arrays() {
    let mut dataset = common::dataset_d();
    dataset.tables.push(DatasetTable::new(
        "files",
        vec![
            Column::new("paths", DataType::Fileref).array(),
            Column::new("size", DataType::Int64),
        ],
    ));

    let derivation = FullView::new(common::shared(dataset)).derive().unwrap();
    let files = derivation.tables.iter().find(|t| t.name == "files").unwrap();
    assert_eq!(files.columns[0].data_type, DataType::Fileref);
    assert!(files.columns[0].array_of);
    assert_eq!(files.columns[1].data_type, DataType::Int64);
    assert!(!files.columns[1].array_of);
}

#[test]
fn test_full_view_maps_every_column() {
    let dataset = common::dataset_d();
    let derivation = FullView::new(common::shared(dataset.clone()))
        .derive()
        .unwrap();

    let mapped: usize = derivation
        .map_tables
        .iter()
        .map(|m| m.map_columns.len())
        .sum();
    assert_eq!(mapped, dataset.column_count());
    assert_eq!(derivation.column_count(), dataset.column_count());
}

#[test]
fn test_mode() {
    let deriver = FullView::new(common::shared(common::dataset_d()));
    assert_eq!(deriver.mode(), SnapshotMode::ByFullView);
}
