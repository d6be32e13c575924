//! DatasetProvider trait and the in-memory catalog.
//!
//! The snapshot engine resolves datasets by name through `DatasetProvider`.
//! A resolved dataset is handed out as an `Arc` and never mutated afterwards,
//! so every derivation sees a fixed point-in-time schema.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::definition::{DatasetDefinition, SchemaError};
use crate::model::{CloudPlatform, Dataset};
use crate::snapshot::{SnapshotError, SnapshotResult};

/// Errors raised while loading dataset definitions into a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset definition {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Dataset definition {path} is invalid: {}", format_schema_errors(.errors))]
    InvalidDefinition {
        path: PathBuf,
        errors: Vec<SchemaError>,
    },

    #[error("Dataset '{0}' is already in the catalog")]
    DuplicateDataset(String),
}

fn format_schema_errors(errors: &[SchemaError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-only access to dataset schemas by name.
///
/// # Example
///
/// ```
/// use datarepo::catalog::{DatasetProvider, InMemoryCatalog};
/// use datarepo::model::Dataset;
///
/// let mut catalog = InMemoryCatalog::new();
/// catalog.insert(Dataset::new("D")).unwrap();
/// assert_eq!(catalog.retrieve_by_name("D").unwrap().name, "D");
/// assert!(catalog.retrieve_by_name("missing").is_err());
/// ```
pub trait DatasetProvider: Send + Sync {
    /// Fetch a fully loaded dataset. Unknown names are `DatasetNotFound`.
    fn retrieve_by_name(&self, name: &str) -> SnapshotResult<Arc<Dataset>>;
}

/// Datasets held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    datasets: BTreeMap<String, Arc<Dataset>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset. Names are unique within the catalog.
    pub fn insert(&mut self, dataset: Dataset) -> CatalogResult<Arc<Dataset>> {
        if self.datasets.contains_key(&dataset.name) {
            return Err(CatalogError::DuplicateDataset(dataset.name));
        }
        let dataset = Arc::new(dataset);
        self.datasets
            .insert(dataset.name.clone(), Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Dataset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Load every `*.json` dataset definition in `dir`.
    ///
    /// Files are read in name order. The first unreadable or invalid
    /// definition aborts the load.
    pub fn load_dir(dir: &Path, platform: CloudPlatform) -> CatalogResult<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Self::new();
        for path in paths {
            let dataset = load_definition(&path, platform)?;
            tracing::debug!(path = %path.display(), dataset = %dataset.name, "loaded dataset");
            catalog.insert(dataset)?;
        }
        Ok(catalog)
    }
}

fn load_definition(path: &Path, platform: CloudPlatform) -> CatalogResult<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let definition: DatasetDefinition =
        serde_json::from_str(&content).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    definition.build(platform).map_err(|errors| {
        tracing::warn!(
            path = %path.display(),
            dataset = %definition.name,
            errors = errors.len(),
            "rejected dataset definition"
        );
        CatalogError::InvalidDefinition {
            path: path.to_path_buf(),
            errors,
        }
    })
}

impl DatasetProvider for InMemoryCatalog {
    fn retrieve_by_name(&self, name: &str) -> SnapshotResult<Arc<Dataset>> {
        self.datasets
            .get(name)
            .cloned()
            .ok_or_else(|| SnapshotError::DatasetNotFound(name.to_string()))
    }
}
