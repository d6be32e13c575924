//! Shared fixtures: the participant/sample dataset `D`.
#![allow(dead_code)]

use std::sync::Arc;

use datarepo::catalog::InMemoryCatalog;
use datarepo::model::{
    AssetId, AssetSpecification, AssetTable, Column, DataType, Dataset, DatasetTable,
    Relationship, Snapshot, SnapshotRequest, SnapshotRequestContents, SnapshotTable,
};
use uuid::Uuid;

/// Dataset `D`:
///
/// - `participant(id, age)`, keyed on `id`
/// - `sample(id, participant_id, date_collected)`, keyed on `id`
/// - `participant_sample: participant.id → sample.participant_id`
/// - asset `Sample`: root `sample.id`, tables `sample` and `participant`,
///   follows `participant_sample`
pub fn dataset_d() -> Dataset {
    let participant = DatasetTable::new(
        "participant",
        vec![
            Column::new("id", DataType::String),
            Column::new("age", DataType::Integer),
        ],
    )
    .with_primary_key(&["id"]);

    let sample = DatasetTable::new(
        "sample",
        vec![
            Column::new("id", DataType::String),
            Column::new("participant_id", DataType::String),
            Column::new("date_collected", DataType::Date),
        ],
    )
    .with_primary_key(&["id"]);

    let relationship = Relationship::between(
        "participant_sample",
        &participant,
        "id",
        &sample,
        "participant_id",
    )
    .unwrap();

    let asset = AssetSpecification {
        id: AssetId::generate(),
        name: "Sample".to_string(),
        root_table: sample.id,
        root_column: sample.columns[0].id,
        asset_tables: vec![
            AssetTable {
                table: sample.id,
                columns: sample.columns.iter().map(|c| c.id).collect(),
            },
            AssetTable {
                table: participant.id,
                columns: participant.columns.iter().map(|c| c.id).collect(),
            },
        ],
        follow: vec![relationship.id],
    };

    let mut dataset = Dataset::new("D");
    dataset.description = Some("participants and their samples".to_string());
    dataset.tables = vec![participant, sample];
    dataset.relationships = vec![relationship];
    dataset.assets = vec![asset];
    dataset
}

/// JSON definition of dataset `D`, for catalog loading.
pub const DATASET_D_JSON: &str = r#"{
    "name": "D",
    "description": "participants and their samples",
    "schema": {
        "tables": [
            {
                "name": "participant",
                "primaryKey": ["id"],
                "columns": [
                    {"name": "id", "datatype": "string"},
                    {"name": "age", "datatype": "integer"}
                ]
            },
            {
                "name": "sample",
                "primaryKey": ["id"],
                "columns": [
                    {"name": "id", "datatype": "string"},
                    {"name": "participant_id", "datatype": "string"},
                    {"name": "date_collected", "datatype": "date"}
                ]
            }
        ],
        "relationships": [
            {
                "name": "participant_sample",
                "from": {"table": "participant", "column": "id"},
                "to": {"table": "sample", "column": "participant_id"}
            }
        ],
        "assets": [
            {
                "name": "Sample",
                "rootTable": "sample",
                "rootColumn": "id",
                "tables": [
                    {"name": "sample", "columns": []},
                    {"name": "participant", "columns": []}
                ],
                "follow": ["participant_sample"]
            }
        ]
    }
}"#;

pub fn catalog_with(dataset: Dataset) -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert(dataset).unwrap();
    catalog
}

pub fn shared(dataset: Dataset) -> Arc<Dataset> {
    Arc::new(dataset)
}

pub fn request(contents: SnapshotRequestContents) -> SnapshotRequest {
    SnapshotRequest::new("snap", "a snapshot of D")
        .with_profile(Uuid::nil())
        .with_contents(contents)
}

pub fn table_names(snapshot: &Snapshot) -> Vec<&str> {
    snapshot.tables.iter().map(|t| t.name.as_str()).collect()
}

pub fn column_names(table: &SnapshotTable) -> Vec<&str> {
    table.columns.iter().map(|c| c.name.as_str()).collect()
}

/// Relationships as `name: table.column -> table.column`.
pub fn relationship_lines(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .relationships
        .iter()
        .map(|r| {
            let (from_table, from_column) = snapshot.term_names(&r.from).unwrap();
            let (to_table, to_column) = snapshot.term_names(&r.to).unwrap();
            format!(
                "{}: {}.{} -> {}.{}",
                r.name, from_table, from_column, to_table, to_column
            )
        })
        .collect()
}

/// Same relationship rendering for the dataset side.
pub fn dataset_relationship_lines(dataset: &Dataset) -> Vec<String> {
    dataset
        .relationships
        .iter()
        .map(|r| {
            let (from_table, from_column) = dataset.column(r.from.column).unwrap();
            let (to_table, to_column) = dataset.column(r.to.column).unwrap();
            format!(
                "{}: {}.{} -> {}.{}",
                r.name, from_table.name, from_column.name, to_table.name, to_column.name
            )
        })
        .collect()
}

/// Every map column points at a real dataset column and a real snapshot
/// column, and every snapshot column is mapped exactly once.
pub fn assert_maps_consistent(snapshot: &Snapshot, dataset: &Dataset) {
    let source = snapshot.first_source().unwrap();
    assert_eq!(source.map_tables.len(), snapshot.tables.len());

    for table in &snapshot.tables {
        let map = source.map_table_for(table.id).unwrap();
        let dataset_table = dataset.table(map.from_table).unwrap();
        assert_eq!(dataset_table.name, table.name);
        assert_eq!(map.map_columns.len(), table.columns.len());

        for column in &table.columns {
            let mapped: Vec<_> = map
                .map_columns
                .iter()
                .filter(|m| m.to_column == column.id)
                .collect();
            assert_eq!(mapped.len(), 1, "column {} mapped once", column.name);
            let from = dataset_table.column(mapped[0].from_column).unwrap();
            assert_eq!(from.name, column.name);
            assert_eq!(from.data_type, column.data_type);
            assert_eq!(from.array_of, column.array_of);
        }
    }
}
