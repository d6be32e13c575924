//! Catalog schema types: dataset inputs, snapshot outputs, and requests.

pub mod dataset;
pub mod request;
pub mod snapshot;
pub mod types;

pub use dataset::{
    AssetId, AssetSpecification, AssetTable, Column, ColumnId, Dataset, DatasetId, DatasetTable,
    Relationship, RelationshipId, RelationshipTerm, TableId,
};
pub use request::{
    AssetSpec, ModeTag, QuerySpec, RowSelectionSpec, RowSelectionTable, SnapshotMode,
    SnapshotRequest, SnapshotRequestContents,
};
pub use snapshot::{
    AssetRef, DatasetRef, Snapshot, SnapshotColumn, SnapshotColumnId, SnapshotMapColumn,
    SnapshotMapTable, SnapshotRelationship, SnapshotSource, SnapshotTable, SnapshotTableId,
    SnapshotTerm,
};
pub use types::{CloudPlatform, DataType};
