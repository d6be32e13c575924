//! Mode selection: picks the deriver for a request's contents entry.

use std::sync::Arc;

use super::deriver::{AssetBased, ByQuery, Derivation, Deriver, FullView, RowSelection};
use super::error::{SnapshotError, SnapshotResult};
use crate::catalog::DatasetProvider;
use crate::model::{Dataset, ModeTag, SnapshotMode, SnapshotRequestContents};

/// The deriver chosen for one contents entry.
#[derive(Debug)]
pub enum ModeDeriver<'p> {
    Asset(AssetBased),
    FullView(FullView),
    Query(ByQuery<'p>),
    RowSelection(RowSelection),
}

impl<'p> ModeDeriver<'p> {
    /// Choose a deriver from the contents' mode tag.
    ///
    /// `dataset` is the dataset the contents entry names. Query selections
    /// resolve their dataset through `provider` and must name the same one.
    pub fn select(
        contents: &SnapshotRequestContents,
        dataset: Arc<Dataset>,
        provider: &'p dyn DatasetProvider,
    ) -> SnapshotResult<Self> {
        let mode = match &contents.mode {
            Some(ModeTag::Known(mode)) => *mode,
            Some(ModeTag::Unrecognized(tag)) => {
                return Err(SnapshotError::InvalidSnapshot(format!(
                    "unrecognized mode '{tag}'"
                )))
            }
            None => return Err(SnapshotError::InvalidSnapshot("mode is missing".to_string())),
        };

        let deriver = match mode {
            SnapshotMode::ByAsset => {
                let asset_name = contents
                    .asset_spec
                    .as_ref()
                    .and_then(|spec| spec.asset_name.as_deref())
                    .ok_or_else(|| missing_payload(mode, "assetSpec.assetName"))?;
                ModeDeriver::Asset(AssetBased::new(dataset, asset_name))
            }
            SnapshotMode::ByFullView => ModeDeriver::FullView(FullView::new(dataset)),
            SnapshotMode::ByQuery => {
                let spec = contents
                    .query_spec
                    .as_ref()
                    .ok_or_else(|| missing_payload(mode, "querySpec"))?;
                let asset_name = spec
                    .asset_name
                    .as_deref()
                    .ok_or_else(|| missing_payload(mode, "querySpec.assetName"))?;
                let query = spec
                    .query
                    .as_deref()
                    .ok_or_else(|| missing_payload(mode, "querySpec.query"))?;
                ModeDeriver::Query(ByQuery::new(
                    provider,
                    dataset.name.clone(),
                    asset_name,
                    query,
                ))
            }
            SnapshotMode::ByRowSelection => {
                let spec = contents
                    .row_selection_spec
                    .clone()
                    .ok_or_else(|| missing_payload(mode, "rowSelectionSpec"))?;
                ModeDeriver::RowSelection(RowSelection::new(dataset, spec))
            }
        };

        tracing::debug!(%mode, "selected deriver");
        Ok(deriver)
    }
}

fn missing_payload(mode: SnapshotMode, field: &str) -> SnapshotError {
    SnapshotError::InvalidSnapshot(format!("{mode} requires {field}"))
}

impl Deriver for ModeDeriver<'_> {
    fn mode(&self) -> SnapshotMode {
        match self {
            ModeDeriver::Asset(d) => d.mode(),
            ModeDeriver::FullView(d) => d.mode(),
            ModeDeriver::Query(d) => d.mode(),
            ModeDeriver::RowSelection(d) => d.mode(),
        }
    }

    fn derive(&self) -> SnapshotResult<Derivation> {
        match self {
            ModeDeriver::Asset(d) => d.derive(),
            ModeDeriver::FullView(d) => d.derive(),
            ModeDeriver::Query(d) => d.derive(),
            ModeDeriver::RowSelection(d) => d.derive(),
        }
    }
}
