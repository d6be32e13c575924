//! Dataset → snapshot identity lookups.

use std::collections::HashMap;

use crate::model::{ColumnId, SnapshotColumnId, SnapshotMapTable, SnapshotTableId, TableId};

/// Lookups from dataset table and column ids to the snapshot tables and
/// columns derived from them, built from a derivation's map tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityMapper {
    tables: HashMap<TableId, SnapshotTableId>,
    columns: HashMap<ColumnId, SnapshotColumnId>,
}

impl IdentityMapper {
    pub fn from_map_tables(map_tables: &[SnapshotMapTable]) -> Self {
        let mut mapper = Self::default();
        for map_table in map_tables {
            mapper
                .tables
                .insert(map_table.from_table, map_table.to_table);
            for map_column in &map_table.map_columns {
                mapper
                    .columns
                    .insert(map_column.from_column, map_column.to_column);
            }
        }
        mapper
    }

    pub fn table(&self, id: TableId) -> Option<SnapshotTableId> {
        self.tables.get(&id).copied()
    }

    pub fn column(&self, id: ColumnId) -> Option<SnapshotColumnId> {
        self.columns.get(&id).copied()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
