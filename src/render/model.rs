//! Outbound snapshot structures.

use serde::Serialize;
use uuid::Uuid;

use super::include::Include;
use crate::model::{
    DataType, Dataset, DatasetId, Snapshot, SnapshotMapTable, SnapshotRelationship, SnapshotSource,
    SnapshotTable, SnapshotTerm,
};
use crate::snapshot::{SnapshotError, SnapshotResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnModel {
    pub name: String,
    pub datatype: DataType,
    pub array_of: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableModel {
    pub name: String,
    pub primary_key: Vec<String>,
    pub columns: Vec<ColumnModel>,
}

impl TableModel {
    pub fn from_table(table: &SnapshotTable) -> Self {
        Self {
            name: table.name.clone(),
            primary_key: table
                .primary_key_columns()
                .map(|c| c.name.clone())
                .collect(),
            columns: table
                .columns
                .iter()
                .map(|c| ColumnModel {
                    name: c.name.clone(),
                    datatype: c.data_type,
                    array_of: c.array_of,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipTermModel {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipModel {
    pub name: String,
    pub from: RelationshipTermModel,
    pub to: RelationshipTermModel,
}

impl RelationshipModel {
    /// `None` if an endpoint does not resolve within the snapshot.
    pub fn from_relationship(snapshot: &Snapshot, relationship: &SnapshotRelationship) -> Option<Self> {
        let term = |term: &SnapshotTerm| {
            snapshot
                .term_names(term)
                .map(|(table, column)| RelationshipTermModel {
                    table: table.to_string(),
                    column: column.to_string(),
                })
        };
        Some(Self {
            name: relationship.name.clone(),
            from: term(&relationship.from)?,
            to: term(&relationship.to)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapColumnModel {
    pub from_column: String,
    pub to_column: String,
}

/// One dataset table → snapshot table link, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTableModel {
    pub from_table: String,
    pub to_table: String,
    pub columns: Vec<MapColumnModel>,
}

impl MapTableModel {
    /// Resolve a map table's ids against the snapshot and its source dataset.
    pub fn resolve(
        snapshot: &Snapshot,
        dataset: &Dataset,
        map_table: &SnapshotMapTable,
    ) -> SnapshotResult<Self> {
        let from_table = dataset.table(map_table.from_table).ok_or_else(|| {
            SnapshotError::CorruptMetadata(format!(
                "map refers to table {} not in dataset '{}'",
                map_table.from_table, dataset.name
            ))
        })?;
        let to_table = snapshot.table(map_table.to_table).ok_or_else(|| {
            SnapshotError::CorruptMetadata(format!(
                "map refers to missing snapshot table {:?}",
                map_table.to_table
            ))
        })?;

        let columns = map_table
            .map_columns
            .iter()
            .map(|m| {
                let from = from_table.column(m.from_column).ok_or_else(|| {
                    SnapshotError::CorruptMetadata(format!(
                        "map refers to column {} not in table '{}'",
                        m.from_column, from_table.name
                    ))
                })?;
                let to = to_table.column(m.to_column).ok_or_else(|| {
                    SnapshotError::CorruptMetadata(format!(
                        "map refers to missing snapshot column {:?}",
                        m.to_column
                    ))
                })?;
                Ok(MapColumnModel {
                    from_column: from.name.clone(),
                    to_column: to.name.clone(),
                })
            })
            .collect::<SnapshotResult<Vec<_>>>()?;

        Ok(Self {
            from_table: from_table.name.clone(),
            to_table: to_table.name.clone(),
            columns,
        })
    }
}

/// Map graph of a snapshot's first source, by name.
///
/// `dataset` must be the dataset that source was derived from.
pub fn render_map_tables(snapshot: &Snapshot, dataset: &Dataset) -> SnapshotResult<Vec<MapTableModel>> {
    let Some(source) = snapshot.first_source() else {
        return Ok(Vec::new());
    };
    if source.dataset.id != dataset.id {
        return Err(SnapshotError::CorruptMetadata(format!(
            "snapshot '{}' was not derived from dataset '{}'",
            snapshot.name, dataset.name
        )));
    }
    source
        .map_tables
        .iter()
        .map(|m| MapTableModel::resolve(snapshot, dataset, m))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummaryModel {
    pub id: DatasetId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceModel {
    pub dataset: DatasetSummaryModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

impl SourceModel {
    pub fn from_source(source: &SnapshotSource) -> Self {
        Self {
            dataset: DatasetSummaryModel {
                id: source.dataset.id,
                name: source.dataset.name.clone(),
            },
            asset: source.asset.as_ref().map(|a| a.name.clone()),
        }
    }
}

/// A snapshot as returned to callers, limited to the requested sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotModel {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<SourceModel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<TableModel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<RelationshipModel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<Uuid>,
}

impl SnapshotModel {
    /// Render the sections named in `include`. `Include::None` wins over
    /// everything else.
    pub fn render(snapshot: &Snapshot, include: &[Include]) -> Self {
        let mut model = Self {
            name: snapshot.name.clone(),
            description: snapshot.description.clone(),
            source: None,
            tables: None,
            relationships: None,
            profile_id: None,
        };

        if include.contains(&Include::None) {
            return model;
        }

        if include.contains(&Include::Sources) {
            model.source = Some(snapshot.sources.iter().map(SourceModel::from_source).collect());
        }
        if include.contains(&Include::Tables) {
            model.tables = Some(snapshot.tables.iter().map(TableModel::from_table).collect());
        }
        if include.contains(&Include::Relationships) {
            model.relationships = Some(
                snapshot
                    .relationships
                    .iter()
                    .filter_map(|r| RelationshipModel::from_relationship(snapshot, r))
                    .collect(),
            );
        }
        if include.contains(&Include::Profile) {
            model.profile_id = snapshot.profile_id;
        }
        model
    }
}
