//! Selection of an asset through a snapshot query.

use super::{AssetBased, Derivation, Deriver};
use crate::catalog::DatasetProvider;
use crate::model::SnapshotMode;
use crate::query::Query;
use crate::snapshot::error::{SnapshotError, SnapshotResult};

/// Resolves the dataset named by a query, then selects the asset from it.
///
/// The first dataset the query references must be the dataset the request
/// names; a snapshot has a single source.
pub struct ByQuery<'p> {
    provider: &'p dyn DatasetProvider,
    dataset_name: String,
    asset_name: String,
    query: String,
}

impl<'p> ByQuery<'p> {
    pub fn new(
        provider: &'p dyn DatasetProvider,
        dataset_name: impl Into<String>,
        asset_name: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            dataset_name: dataset_name.into(),
            asset_name: asset_name.into(),
            query: query.into(),
        }
    }

    fn resolve(&self) -> SnapshotResult<AssetBased> {
        let query = Query::parse(&self.query)?;
        let dataset_name = query.primary_dataset()?;
        if dataset_name != self.dataset_name {
            return Err(SnapshotError::Validation {
                message: "Snapshot query must select from the requested dataset.".to_string(),
                details: vec![format!(
                    "query selects from '{}', request names '{}'",
                    dataset_name, self.dataset_name
                )],
            });
        }
        if query.dataset_names().len() > 1 {
            tracing::debug!(
                datasets = ?query.dataset_names(),
                using = dataset_name,
                "query references several datasets"
            );
        }
        let dataset = self.provider.retrieve_by_name(dataset_name)?;
        Ok(AssetBased::new(dataset, self.asset_name.clone()))
    }
}

impl Deriver for ByQuery<'_> {
    fn mode(&self) -> SnapshotMode {
        SnapshotMode::ByQuery
    }

    fn derive(&self) -> SnapshotResult<Derivation> {
        self.resolve()?.derive()
    }
}

impl std::fmt::Debug for ByQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByQuery")
            .field("dataset_name", &self.dataset_name)
            .field("asset_name", &self.asset_name)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}
