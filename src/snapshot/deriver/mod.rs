//! Snapshot table derivation.
//!
//! Each selection mode decides *which* dataset tables and columns go into a
//! snapshot. Copying their shape, assigning snapshot positions and recording
//! the dataset → snapshot maps is shared by every mode and lives here.

mod asset;
mod full_view;
mod query;
mod row_selection;

pub use asset::AssetBased;
pub use full_view::FullView;
pub use query::ByQuery;
pub use row_selection::RowSelection;

use std::collections::HashSet;
use std::sync::Arc;

use super::error::SnapshotResult;
use crate::model::{
    AssetRef, Column, ColumnId, Dataset, DatasetTable, SnapshotColumn, SnapshotColumnId,
    SnapshotMapColumn, SnapshotMapTable, SnapshotMode, SnapshotTable, SnapshotTableId, TableId,
};

/// A selection strategy producing snapshot tables from one dataset.
pub trait Deriver {
    /// The mode this deriver implements.
    fn mode(&self) -> SnapshotMode;

    /// Produce snapshot tables and their maps. Never partially succeeds.
    fn derive(&self) -> SnapshotResult<Derivation>;
}

/// The output of a deriver.
#[derive(Debug, Clone)]
pub struct Derivation {
    /// Dataset the tables were derived from.
    pub source: Arc<Dataset>,
    pub asset: Option<AssetRef>,
    pub tables: Vec<SnapshotTable>,
    /// One entry per table in `tables`, in the same order.
    pub map_tables: Vec<SnapshotMapTable>,
}

impl Derivation {
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}

/// Dataset columns of one table chosen for a snapshot, in output order.
#[derive(Debug, Clone)]
pub struct TableSelection<'d> {
    pub table: &'d DatasetTable,
    pub columns: Vec<&'d Column>,
}

impl<'d> TableSelection<'d> {
    /// Every column of the table, in declared order.
    pub fn whole(table: &'d DatasetTable) -> Self {
        Self {
            table,
            columns: table.columns.iter().collect(),
        }
    }
}

/// Copy the selected tables into fresh snapshot tables.
///
/// A dataset table selected twice is copied once, and a dataset column is
/// copied at most once. The snapshot primary key keeps the dataset key
/// columns that were selected, in key order.
pub fn copy_tables(selections: &[TableSelection<'_>]) -> (Vec<SnapshotTable>, Vec<SnapshotMapTable>) {
    let mut tables = Vec::with_capacity(selections.len());
    let mut map_tables = Vec::with_capacity(selections.len());
    let mut seen_tables: HashSet<TableId> = HashSet::new();
    let mut seen_columns: HashSet<ColumnId> = HashSet::new();

    for selection in selections {
        if !seen_tables.insert(selection.table.id) {
            tracing::debug!(table = %selection.table.name, "table selected twice, keeping first");
            continue;
        }

        let id = SnapshotTableId(tables.len());
        let mut columns = Vec::with_capacity(selection.columns.len());
        let mut map_columns = Vec::with_capacity(selection.columns.len());

        for column in &selection.columns {
            if !seen_columns.insert(column.id) {
                continue;
            }
            let to_column = SnapshotColumnId {
                table: id,
                index: columns.len(),
            };
            columns.push(SnapshotColumn::copy_of(column, to_column));
            map_columns.push(SnapshotMapColumn {
                from_column: column.id,
                to_column,
            });
        }

        let primary_key = selection
            .table
            .primary_key
            .iter()
            .filter_map(|key| {
                map_columns
                    .iter()
                    .find(|m| m.from_column == *key)
                    .map(|m| m.to_column)
            })
            .collect();

        tables.push(SnapshotTable {
            id,
            name: selection.table.name.clone(),
            primary_key,
            columns,
        });
        map_tables.push(SnapshotMapTable {
            from_table: selection.table.id,
            to_table: id,
            map_columns,
        });
    }

    (tables, map_tables)
}
