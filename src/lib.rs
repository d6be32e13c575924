//! # datarepo
//!
//! Snapshot derivation for a research dataset metadata catalog.
//!
//! ## Architecture
//!
//! A snapshot is a read-oriented schema derived from one dataset. Given the
//! dataset schema and a snapshot request, the engine produces fresh snapshot
//! tables, a map from every snapshot table and column back to the dataset
//! table and column it came from, and the dataset relationships that still
//! connect surviving columns.
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │  catalog (Schema View)   │      │  SnapshotRequest (JSON)  │
//! │  DatasetDefinition ──►   │      │  validation              │
//! │  Dataset                 │      └────────────┬─────────────┘
//! └────────────┬─────────────┘                   │
//!              │                                 │
//!              ▼                                 ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  snapshot                                                   │
//! │  ModeDeriver ─► AssetBased | ByQuery | RowSelection |       │
//! │                 FullView                                    │
//! │             ─► IdentityMapper ─► project_relationships      │
//! │             ─► assemble                                     │
//! └─────────────────────────────┬───────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  render (SnapshotModel, MapTableModel)  cache (fingerprint) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Derivation is a pure function of its inputs: it does no I/O, assigns no
//! persisted identities, and returns either a whole snapshot or an error.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod model;
pub mod query;
pub mod render;
pub mod snapshot;
pub mod validation;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{DatasetProvider, InMemoryCatalog};
    pub use crate::model::{
        Dataset, Snapshot, SnapshotMode, SnapshotRequest, SnapshotRequestContents,
    };
    pub use crate::snapshot::{Deriver, SnapshotBuilder, SnapshotError, SnapshotResult};
}

pub use snapshot::{SnapshotBuilder, SnapshotError, SnapshotResult};
