#[path = "../common/mod.rs"]
mod common;

use datarepo::model::{
    Column, DataType, DatasetTable, Relationship, RowSelectionSpec, RowSelectionTable,
};
use datarepo::snapshot::{project_relationships, Deriver, FullView, IdentityMapper, RowSelection};

/// D plus a `visit` table with two relationships pointing into `participant`.
fn dataset_with_visits() -> datarepo::model::Dataset {
    let mut dataset = common::dataset_d();
    let visit = DatasetTable::new(
        "visit",
        vec![
            Column::new("id", DataType::String),
            Column::new("participant_id", DataType::String),
            Column::new("referrer_id", DataType::String),
        ],
    );
    let participant = dataset.table_by_name("participant").unwrap().clone();
    let visits = Relationship::between("participant_visit", &participant, "id", &visit, "participant_id")
        .unwrap();
    let referrals = Relationship::between("referral", &participant, "id", &visit, "referrer_id")
        .unwrap();
    dataset.tables.push(visit);
    dataset.relationships.push(visits);
    dataset.relationships.push(referrals);
    dataset
}

fn row_selection(tables: &[(&str, &[&str])]) -> RowSelectionSpec {
    RowSelectionSpec {
        tables: tables
            .iter()
            .map(|(name, columns)| RowSelectionTable {
                table_name: name.to_string(),
                columns: columns.iter().map(|c| c.to_string()).collect(),
                row_ids: vec!["1".to_string()],
            })
            .collect(),
    }
}

#[test]
fn test_survivors_keep_name_and_endpoints() {
    let dataset = dataset_with_visits();
    let derivation = FullView::new(common::shared(dataset.clone()))
        .derive()
        .unwrap();
    let mapper = IdentityMapper::from_map_tables(&derivation.map_tables);
    let projected = project_relationships(&dataset.relationships, &mapper);

    assert_eq!(projected.len(), dataset.relationships.len());
    for (snapshot_rel, dataset_rel) in projected.iter().zip(&dataset.relationships) {
        assert_eq!(snapshot_rel.name, dataset_rel.name);
        let from = &derivation.tables[snapshot_rel.from.table.0];
        let (dataset_from_table, dataset_from_column) =
            dataset.column(dataset_rel.from.column).unwrap();
        assert_eq!(from.name, dataset_from_table.name);
        assert_eq!(
            from.column(snapshot_rel.from.column).unwrap().name,
            dataset_from_column.name
        );
    }
}

#[test]
fn test_excluded_table_drops_relationships() {
    let dataset = dataset_with_visits();
    let spec = row_selection(&[
        ("participant", &["id", "age"]),
        ("sample", &["id", "participant_id"]),
    ]);
    let derivation = RowSelection::new(common::shared(dataset.clone()), spec)
        .derive()
        .unwrap();
    let mapper = IdentityMapper::from_map_tables(&derivation.map_tables);
    let projected = project_relationships(&dataset.relationships, &mapper);

    let names: Vec<_> = projected.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["participant_sample"]);
    assert!(projected.len() < dataset.relationships.len());
}

#[test]
fn test_excluded_column_drops_only_its_relationship() {
    let dataset = dataset_with_visits();
    let spec = row_selection(&[
        ("participant", &["id"]),
        ("visit", &["id", "participant_id"]),
    ]);
    let derivation = RowSelection::new(common::shared(dataset.clone()), spec)
        .derive()
        .unwrap();
    let mapper = IdentityMapper::from_map_tables(&derivation.map_tables);
    let projected = project_relationships(&dataset.relationships, &mapper);

    let names: Vec<_> = projected.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["participant_visit"]);
}

#[test]
fn test_output_keeps_input_order() {
    let mut dataset = dataset_with_visits();
    dataset.relationships.reverse();
    let derivation = FullView::new(common::shared(dataset.clone()))
        .derive()
        .unwrap();
    let mapper = IdentityMapper::from_map_tables(&derivation.map_tables);

    let names: Vec<_> = project_relationships(&dataset.relationships, &mapper)
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["referral", "participant_visit", "participant_sample"]);
}

#[test]
fn test_empty_mapper_drops_everything() {
    let dataset = dataset_with_visits();
    let projected = project_relationships(&dataset.relationships, &IdentityMapper::default());
    assert!(projected.is_empty());
}
