//! Snapshot derivation.
//!
//! Turns a dataset schema and a snapshot request into an in-memory snapshot
//! schema:
//!
//! ```text
//! SnapshotRequest ──► ModeDeriver::select ──► Deriver::derive ──► Derivation
//!                                                                  │
//!                     IdentityMapper ◄── map tables ◄──────────────┤
//!                           │                                      │
//!                           ▼                                      ▼
//!                  project_relationships ─────────────────────► assemble ──► Snapshot
//! ```
//!
//! Derivation is pure: it reads an immutable dataset, performs no I/O, and
//! either returns a whole snapshot or an error.

pub mod assembler;
pub mod deriver;
pub mod error;
pub mod mapping;
pub mod mode;
pub mod relationships;

pub use assembler::{assemble, SnapshotBuilder};
pub use deriver::{
    copy_tables, AssetBased, ByQuery, Derivation, Deriver, FullView, RowSelection, TableSelection,
};
pub use error::{SnapshotError, SnapshotResult};
pub use mapping::IdentityMapper;
pub use mode::ModeDeriver;
pub use relationships::project_relationships;
