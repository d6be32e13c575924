//! Dataset-side schema entities.
//!
//! These are the read-only inputs of snapshot derivation. Every entity
//! carries a persisted identity; relationships and assets refer to tables
//! and columns by id rather than by owning copies.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::types::DataType;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identity.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_id!(
    /// Identity of a dataset.
    DatasetId
);
uuid_id!(
    /// Identity of a dataset table.
    TableId
);
uuid_id!(
    /// Identity of a dataset column, unique across the whole dataset.
    ColumnId
);
uuid_id!(
    /// Identity of a dataset relationship.
    RelationshipId
);
uuid_id!(
    /// Identity of an asset specification.
    AssetId
);

/// A dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub data_type: DataType,
    pub array_of: bool,
}

impl Column {
    /// Create a scalar column with a fresh identity.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: ColumnId::generate(),
            name: name.into(),
            data_type,
            array_of: false,
        }
    }

    /// Mark the column as holding an array of `data_type`.
    pub fn array(mut self) -> Self {
        self.array_of = true;
        self
    }
}

/// A dataset table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetTable {
    pub id: TableId,
    pub name: String,
    /// Columns in declared order.
    pub columns: Vec<Column>,
    /// Primary key columns, in key order.
    pub primary_key: Vec<ColumnId>,
}

impl DatasetTable {
    /// Create a table with a fresh identity and no primary key.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: TableId::generate(),
            name: name.into(),
            columns,
            primary_key: Vec::new(),
        }
    }

    /// Set the primary key by column name. Unknown names are ignored.
    pub fn with_primary_key(mut self, names: &[&str]) -> Self {
        self.primary_key = names
            .iter()
            .filter_map(|name| self.column_by_name(name).map(|c| c.id))
            .collect();
        self
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary key columns in key order.
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.primary_key.iter().filter_map(|id| self.column(*id))
    }
}

/// One side of a relationship: a column within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipTerm {
    pub table: TableId,
    pub column: ColumnId,
}

/// A directed edge between two (table, column) pairs of the same dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub name: String,
    pub from: RelationshipTerm,
    pub to: RelationshipTerm,
}

impl Relationship {
    /// Relate `from_table.from_column` to `to_table.to_column`.
    ///
    /// Returns `None` if either column name is not on its table.
    pub fn between(
        name: impl Into<String>,
        from_table: &DatasetTable,
        from_column: &str,
        to_table: &DatasetTable,
        to_column: &str,
    ) -> Option<Self> {
        let from = from_table.column_by_name(from_column)?;
        let to = to_table.column_by_name(to_column)?;
        Some(Self {
            id: RelationshipId::generate(),
            name: name.into(),
            from: RelationshipTerm {
                table: from_table.id,
                column: from.id,
            },
            to: RelationshipTerm {
                table: to_table.id,
                column: to.id,
            },
        })
    }
}

/// The columns of one dataset table included in an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTable {
    pub table: TableId,
    /// Included columns, in asset order.
    pub columns: Vec<ColumnId>,
}

/// A named, predefined view over a subset of a dataset's tables and columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSpecification {
    pub id: AssetId,
    pub name: String,
    pub root_table: TableId,
    pub root_column: ColumnId,
    pub asset_tables: Vec<AssetTable>,
    /// Relationships walked from the root when selecting rows.
    pub follow: Vec<RelationshipId>,
}

/// A dataset schema, fully loaded and immutable for the duration of a derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    pub description: Option<String>,
    pub default_profile_id: Option<Uuid>,
    pub tables: Vec<DatasetTable>,
    pub relationships: Vec<Relationship>,
    pub assets: Vec<AssetSpecification>,
}

impl Dataset {
    /// Create an empty dataset with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DatasetId::generate(),
            name: name.into(),
            description: None,
            default_profile_id: None,
            tables: Vec::new(),
            relationships: Vec::new(),
            assets: Vec::new(),
        }
    }

    pub fn table(&self, id: TableId) -> Option<&DatasetTable> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn table_by_name(&self, name: &str) -> Option<&DatasetTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Find a column anywhere in the dataset, along with its table.
    pub fn column(&self, id: ColumnId) -> Option<(&DatasetTable, &Column)> {
        self.tables
            .iter()
            .find_map(|t| t.column(id).map(|c| (t, c)))
    }

    pub fn relationship_by_name(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    pub fn asset_by_name(&self, name: &str) -> Option<&AssetSpecification> {
        self.assets.iter().find(|a| a.name == name)
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}
