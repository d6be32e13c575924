//! Selection of the whole dataset.

use std::sync::Arc;

use super::{copy_tables, Derivation, Deriver, TableSelection};
use crate::model::{Dataset, SnapshotMode};
use crate::snapshot::error::SnapshotResult;

/// Mirrors every dataset table and column in declared order.
#[derive(Debug, Clone)]
pub struct FullView {
    dataset: Arc<Dataset>,
}

impl FullView {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }
}

impl Deriver for FullView {
    fn mode(&self) -> SnapshotMode {
        SnapshotMode::ByFullView
    }

    fn derive(&self) -> SnapshotResult<Derivation> {
        let selections: Vec<_> = self.dataset.tables.iter().map(TableSelection::whole).collect();
        let (tables, map_tables) = copy_tables(&selections);

        tracing::debug!(
            dataset = %self.dataset.name,
            tables = tables.len(),
            "derived full view"
        );

        Ok(Derivation {
            source: Arc::clone(&self.dataset),
            asset: None,
            tables,
            map_tables,
        })
    }
}
