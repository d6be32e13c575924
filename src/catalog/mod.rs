//! Dataset catalog.
//!
//! Supplies fully loaded dataset schemas to snapshot derivation and turns
//! name-based dataset definitions into identity-bearing `Dataset` values.

mod definition;
mod provider;

pub use definition::{
    AssetDefinition, AssetTableDefinition, ColumnDefinition, DatasetDefinition,
    RelationshipDefinition, SchemaDefinition, SchemaError, TableDefinition, TermDefinition,
};
pub use provider::{CatalogError, CatalogResult, DatasetProvider, InMemoryCatalog};
