//! Selection through a named asset.

use std::sync::Arc;

use super::{copy_tables, Derivation, Deriver, TableSelection};
use crate::model::{AssetRef, AssetSpecification, Dataset, SnapshotMode};
use crate::snapshot::error::{SnapshotError, SnapshotResult};

/// Derives one snapshot table per asset table, holding exactly the asset's
/// columns in asset order.
#[derive(Debug, Clone)]
pub struct AssetBased {
    dataset: Arc<Dataset>,
    asset_name: String,
}

impl AssetBased {
    pub fn new(dataset: Arc<Dataset>, asset_name: impl Into<String>) -> Self {
        Self {
            dataset,
            asset_name: asset_name.into(),
        }
    }

    fn asset(&self) -> SnapshotResult<&AssetSpecification> {
        self.dataset
            .asset_by_name(&self.asset_name)
            .ok_or_else(|| SnapshotError::AssetNotFound {
                dataset: self.dataset.name.clone(),
                asset: self.asset_name.clone(),
            })
    }

    fn selections<'d>(
        &self,
        dataset: &'d Dataset,
        asset: &'d AssetSpecification,
    ) -> SnapshotResult<Vec<TableSelection<'d>>> {
        asset
            .asset_tables
            .iter()
            .map(|asset_table| {
                let table = dataset.table(asset_table.table).ok_or_else(|| {
                    SnapshotError::CorruptMetadata(format!(
                        "asset '{}' refers to unknown table {}",
                        asset.name, asset_table.table
                    ))
                })?;
                let columns = asset_table
                    .columns
                    .iter()
                    .map(|id| {
                        table.column(*id).ok_or_else(|| {
                            SnapshotError::CorruptMetadata(format!(
                                "asset '{}' refers to column {} not in table '{}'",
                                asset.name, id, table.name
                            ))
                        })
                    })
                    .collect::<SnapshotResult<Vec<_>>>()?;
                Ok(TableSelection { table, columns })
            })
            .collect()
    }
}

impl Deriver for AssetBased {
    fn mode(&self) -> SnapshotMode {
        SnapshotMode::ByAsset
    }

    fn derive(&self) -> SnapshotResult<Derivation> {
        let asset = self.asset()?;
        let selections = self.selections(&self.dataset, asset)?;
        let (tables, map_tables) = copy_tables(&selections);

        tracing::debug!(
            dataset = %self.dataset.name,
            asset = %asset.name,
            tables = tables.len(),
            "derived tables from asset"
        );

        Ok(Derivation {
            source: Arc::clone(&self.dataset),
            asset: Some(AssetRef {
                id: asset.id,
                name: asset.name.clone(),
            }),
            tables,
            map_tables,
        })
    }
}
