//! Snapshot assembly: `(Dataset, Request) → Snapshot`.

use std::sync::Arc;

use super::deriver::{Derivation, Deriver};
use super::error::{SnapshotError, SnapshotResult};
use super::mapping::IdentityMapper;
use super::mode::ModeDeriver;
use super::relationships::project_relationships;
use crate::catalog::DatasetProvider;
use crate::model::{
    Dataset, DatasetRef, Snapshot, SnapshotRequest, SnapshotRequestContents, SnapshotSource,
};

/// Builds snapshot schemas from requests, resolving datasets through a
/// provider.
///
/// # Example
///
/// ```
/// use datarepo::catalog::InMemoryCatalog;
/// use datarepo::model::{Dataset, SnapshotRequest, SnapshotRequestContents};
/// use datarepo::snapshot::SnapshotBuilder;
///
/// let mut catalog = InMemoryCatalog::new();
/// catalog.insert(Dataset::new("D")).unwrap();
///
/// let request = SnapshotRequest::new("snap", "everything")
///     .with_contents(SnapshotRequestContents::full_view("D"));
/// let snapshot = SnapshotBuilder::new(&catalog).build(&request).unwrap();
/// assert_eq!(snapshot.name, "snap");
/// ```
pub struct SnapshotBuilder<'p> {
    provider: &'p dyn DatasetProvider,
}

impl<'p> SnapshotBuilder<'p> {
    pub fn new(provider: &'p dyn DatasetProvider) -> Self {
        Self { provider }
    }

    /// Resolve the request's dataset by name, then derive the snapshot.
    pub fn build(&self, request: &SnapshotRequest) -> SnapshotResult<Snapshot> {
        let contents = single_contents(request)?;
        let dataset_name = contents
            .dataset_name
            .as_deref()
            .ok_or_else(|| SnapshotError::validation("Snapshot contents entry has no dataset name"))?;
        let dataset = self.provider.retrieve_by_name(dataset_name)?;
        self.build_from(dataset, request)
    }

    /// Derive a snapshot from an already resolved dataset.
    ///
    /// Nothing is returned unless every step succeeds.
    pub fn build_from(
        &self,
        dataset: Arc<Dataset>,
        request: &SnapshotRequest,
    ) -> SnapshotResult<Snapshot> {
        let contents = single_contents(request)?;
        let deriver = ModeDeriver::select(contents, dataset, self.provider)?;
        let derivation = deriver.derive()?;
        let snapshot = assemble(request, contents, derivation);

        tracing::info!(
            snapshot = %snapshot.name,
            mode = %deriver.mode(),
            tables = snapshot.tables.len(),
            relationships = snapshot.relationships.len(),
            "assembled snapshot"
        );
        Ok(snapshot)
    }
}

/// The one contents entry a snapshot may currently be built from.
fn single_contents(request: &SnapshotRequest) -> SnapshotResult<&SnapshotRequestContents> {
    match request.contents.as_slice() {
        [contents] => Ok(contents),
        [] => Err(SnapshotError::validation(
            "Snapshot request has no contents entry.",
        )),
        many => Err(SnapshotError::Validation {
            message: "Only a single snapshot contents entry is currently allowed.".to_string(),
            details: vec![format!("{} contents entries supplied", many.len())],
        }),
    }
}

/// Combine a derivation with the request metadata.
///
/// Relationships come from the derivation's source dataset and are kept
/// only where both ends survived the selection.
pub fn assemble(
    request: &SnapshotRequest,
    contents: &SnapshotRequestContents,
    derivation: Derivation,
) -> Snapshot {
    let Derivation {
        source,
        asset,
        tables,
        map_tables,
    } = derivation;

    let mapper = IdentityMapper::from_map_tables(&map_tables);
    let relationships = project_relationships(&source.relationships, &mapper);
    let name = request.name.clone().unwrap_or_default();

    let snapshot_source = SnapshotSource {
        snapshot: name.clone(),
        dataset: DatasetRef {
            id: source.id,
            name: source.name.clone(),
        },
        asset,
        map_tables,
    };

    Snapshot {
        name,
        description: request.description.clone().unwrap_or_default(),
        profile_id: request.profile_id,
        consent_code: request.consent_code.clone(),
        creation_information: contents.clone(),
        tables,
        sources: vec![snapshot_source],
        relationships,
    }
}
