#[path = "../common/mod.rs"]
mod common;

use datarepo::model::{Dataset, SnapshotRequestContents};
use datarepo::query::QueryError;
use datarepo::snapshot::{AssetBased, ByQuery, Deriver, SnapshotBuilder, SnapshotError};

const QUERY: &str = "SELECT D.sample.id FROM D.sample WHERE D.sample.date_collected > '2020-01-01'";

#[test]
fn test_query_matches_asset_derivation() {
    let catalog = common::catalog_with(common::dataset_d());
    let by_query = ByQuery::new(&catalog, "D", "Sample", QUERY).derive().unwrap();

    let dataset = by_query.source.clone();
    let by_asset = AssetBased::new(dataset, "Sample").derive().unwrap();

    assert_eq!(by_query.tables, by_asset.tables);
    assert_eq!(by_query.map_tables, by_asset.map_tables);
    assert_eq!(by_query.asset, by_asset.asset);
}

#[test]
fn test_first_dataset_wins() {
    let mut catalog = common::catalog_with(common::dataset_d());
    catalog.insert(Dataset::new("E")).unwrap();

    let query = "SELECT D.sample.id FROM D.sample JOIN E.other ON D.sample.id = E.other.id";
    let derivation = ByQuery::new(&catalog, "D", "Sample", query).derive().unwrap();
    assert_eq!(derivation.source.name, "D");
}

#[test]
fn test_asset_missing_on_query_dataset() {
    let mut catalog = common::catalog_with(common::dataset_d());
    catalog.insert(Dataset::new("E")).unwrap();

    let err = ByQuery::new(&catalog, "E", "Sample", "SELECT E.t.id FROM E.t")
        .derive()
        .unwrap_err();
    assert_eq!(
        err,
        SnapshotError::AssetNotFound {
            dataset: "E".to_string(),
            asset: "Sample".to_string(),
        }
    );
}

#[test]
fn test_query_without_dataset() {
    let catalog = common::catalog_with(common::dataset_d());
    let err = ByQuery::new(&catalog, "D", "Sample", "SELECT 1").derive().unwrap_err();
    assert_eq!(err, SnapshotError::InvalidQuery(QueryError::NoDatasets));
}

#[test]
fn test_unparseable_query() {
    let catalog = common::catalog_with(common::dataset_d());
    let err = ByQuery::new(&catalog, "D", "Sample", "not a query at all")
        .derive()
        .unwrap_err();
    assert!(matches!(err, SnapshotError::InvalidQuery(QueryError::Syntax(_))));
}

#[test]
fn test_query_must_select_from_requested_dataset() {
    let mut d = common::dataset_d();
    d.name = "E".to_string();
    let mut catalog = common::catalog_with(common::dataset_d());
    catalog.insert(d).unwrap();

    let err = ByQuery::new(&catalog, "E", "Sample", QUERY)
        .derive()
        .unwrap_err();
    assert!(matches!(err, SnapshotError::Validation { .. }));
    assert_eq!(
        err.details(),
        ["query selects from 'D', request names 'E'".to_string()]
    );
}

#[test]
fn test_builder_rejects_query_on_other_dataset() {
    let mut catalog = common::catalog_with(common::dataset_d());
    catalog.insert(Dataset::new("E")).unwrap();
    let request = common::request(SnapshotRequestContents::by_query(
        "E",
        "Sample",
        "SELECT D.sample.id FROM D.sample",
    ));

    let err = SnapshotBuilder::new(&catalog).build(&request).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Snapshot query must select from the requested dataset."
    );
}
