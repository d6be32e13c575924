//! Snapshot-side schema entities.
//!
//! A snapshot is produced in memory with no persisted identity. Tables and
//! columns are addressed positionally (`SnapshotTableId`, `SnapshotColumnId`),
//! which keeps derivation deterministic; the persistence layer assigns
//! surrogate keys when it stores the graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::dataset::{AssetId, Column, ColumnId, DatasetId, TableId};
use super::request::SnapshotRequestContents;
use super::types::DataType;
use crate::cache::compute_hash;

/// Position of a table within `Snapshot::tables`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotTableId(pub usize);

impl fmt::Debug for SnapshotTableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SnapshotTableId({})", self.0)
    }
}

/// Position of a column within its snapshot table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotColumnId {
    pub table: SnapshotTableId,
    pub index: usize,
}

impl fmt::Debug for SnapshotColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SnapshotColumnId({}/{})", self.table.0, self.index)
    }
}

/// A snapshot column: same shape as the dataset column it was copied from,
/// with its own identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotColumn {
    pub id: SnapshotColumnId,
    pub name: String,
    pub data_type: DataType,
    pub array_of: bool,
}

impl SnapshotColumn {
    /// Copy the shape of a dataset column under a new identity.
    pub fn copy_of(column: &Column, id: SnapshotColumnId) -> Self {
        Self {
            id,
            name: column.name.clone(),
            data_type: column.data_type,
            array_of: column.array_of,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTable {
    pub id: SnapshotTableId,
    pub name: String,
    pub primary_key: Vec<SnapshotColumnId>,
    pub columns: Vec<SnapshotColumn>,
}

impl SnapshotTable {
    pub fn column(&self, id: SnapshotColumnId) -> Option<&SnapshotColumn> {
        if id.table != self.id {
            return None;
        }
        self.columns.get(id.index)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&SnapshotColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &SnapshotColumn> + '_ {
        self.primary_key.iter().filter_map(|id| self.column(*id))
    }
}

/// Records which dataset column a snapshot column was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMapColumn {
    pub from_column: ColumnId,
    pub to_column: SnapshotColumnId,
}

/// Records which dataset table a snapshot table was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMapTable {
    pub from_table: TableId,
    pub to_table: SnapshotTableId,
    pub map_columns: Vec<SnapshotMapColumn>,
}

/// Non-owning reference to the source dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRef {
    pub id: DatasetId,
    pub name: String,
}

/// Non-owning reference to the asset a snapshot was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: AssetId,
    pub name: String,
}

/// One dataset feeding a snapshot, with the table and column maps from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSource {
    /// Name of the owning snapshot. Snapshot names are unique in the catalog,
    /// so this is the lookup key back to the owner until it is persisted.
    pub snapshot: String,
    pub dataset: DatasetRef,
    pub asset: Option<AssetRef>,
    pub map_tables: Vec<SnapshotMapTable>,
}

impl SnapshotSource {
    /// Map entry for a given snapshot table.
    pub fn map_table_for(&self, table: SnapshotTableId) -> Option<&SnapshotMapTable> {
        self.map_tables.iter().find(|m| m.to_table == table)
    }
}

/// One side of a snapshot relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotTerm {
    pub table: SnapshotTableId,
    pub column: SnapshotColumnId,
}

/// A dataset relationship re-projected onto snapshot tables and columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRelationship {
    pub name: String,
    pub from: SnapshotTerm,
    pub to: SnapshotTerm,
}

/// A derived snapshot schema, prior to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub description: String,
    pub profile_id: Option<Uuid>,
    pub consent_code: Option<String>,
    /// Verbatim copy of the request contents the snapshot was built from.
    pub creation_information: SnapshotRequestContents,
    pub tables: Vec<SnapshotTable>,
    pub sources: Vec<SnapshotSource>,
    pub relationships: Vec<SnapshotRelationship>,
}

impl Snapshot {
    pub fn table(&self, id: SnapshotTableId) -> Option<&SnapshotTable> {
        self.tables.get(id.0).filter(|t| t.id == id)
    }

    pub fn table_by_name(&self, name: &str) -> Option<&SnapshotTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn column(&self, id: SnapshotColumnId) -> Option<&SnapshotColumn> {
        self.table(id.table).and_then(|t| t.column(id))
    }

    /// The only source a snapshot currently has.
    pub fn first_source(&self) -> Option<&SnapshotSource> {
        self.sources.first()
    }

    pub fn relationship_by_name(&self, name: &str) -> Option<&SnapshotRelationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Resolve a relationship term to `(table name, column name)`.
    pub fn term_names(&self, term: &SnapshotTerm) -> Option<(&str, &str)> {
        let table = self.table(term.table)?;
        let column = table.column(term.column)?;
        Some((table.name.as_str(), column.name.as_str()))
    }

    /// Hash of the snapshot's shape, independent of dataset identities.
    ///
    /// Covers names, column types, key columns, relationship endpoints by
    /// name, and which snapshot columns each source maps.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        compute_hash(&self.shape())
    }

    fn shape(&self) -> serde_json::Value {
        let column_name = |id: &SnapshotColumnId| self.column(*id).map(|c| c.name.as_str());
        let term = |term: &SnapshotTerm| self.term_names(term);

        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "consentCode": self.consent_code,
            "creationInformation": self.creation_information,
            "tables": self.tables.iter().map(|table| serde_json::json!({
                "name": table.name,
                "primaryKey": table.primary_key.iter().map(column_name).collect::<Vec<_>>(),
                "columns": table.columns.iter().map(|c| serde_json::json!({
                    "name": c.name,
                    "datatype": c.data_type,
                    "arrayOf": c.array_of,
                })).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
            "relationships": self.relationships.iter().map(|r| serde_json::json!({
                "name": r.name,
                "from": term(&r.from),
                "to": term(&r.to),
            })).collect::<Vec<_>>(),
            "sources": self.sources.iter().map(|source| serde_json::json!({
                "dataset": source.dataset.name,
                "asset": source.asset.as_ref().map(|a| a.name.as_str()),
                "mapTables": source.map_tables.iter().map(|m| serde_json::json!({
                    "toTable": self.table(m.to_table).map(|t| t.name.as_str()),
                    "toColumns": m.map_columns.iter()
                        .map(|c| column_name(&c.to_column))
                        .collect::<Vec<_>>(),
                })).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
        })
    }
}
