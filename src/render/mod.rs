//! Rendering of derived snapshots into their outbound, name-based form.
//!
//! Snapshot internals address tables and columns by position and dataset
//! ids. Downstream consumers (persistence, physical copy, relationship
//! display) want names, so everything here resolves ids to names.

mod include;
mod model;

pub use include::{Include, IncludeError};
pub use model::{
    render_map_tables, ColumnModel, DatasetSummaryModel, MapColumnModel, MapTableModel,
    RelationshipModel, RelationshipTermModel, SnapshotModel, SourceModel, TableModel,
};
