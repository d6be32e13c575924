//! Dataset definitions: the name-based wire form of a dataset schema.
//!
//! A definition refers to tables and columns by name. Building it resolves
//! every name, assigns fresh identities, and checks the schema rules a
//! dataset must satisfy before snapshots can be derived from it.
//!
//! ```json
//! {
//!   "name": "D",
//!   "schema": {
//!     "tables": [
//!       {"name": "participant", "primaryKey": ["id"],
//!        "columns": [{"name": "id", "datatype": "string"}, {"name": "age", "datatype": "integer"}]}
//!     ],
//!     "relationships": [
//!       {"name": "r", "from": {"table": "participant", "column": "id"},
//!                     "to": {"table": "sample", "column": "participant_id"}}
//!     ],
//!     "assets": [
//!       {"name": "Sample", "rootTable": "sample", "rootColumn": "id",
//!        "tables": [{"name": "sample", "columns": []}], "follow": ["r"]}
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::model::{
    AssetId, AssetSpecification, AssetTable, CloudPlatform, Column, ColumnId, DataType, Dataset,
    DatasetId, DatasetTable, Relationship, RelationshipId, RelationshipTerm, TableId,
};

/// A schema rule violated by a dataset definition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Duplicate table name: '{0}'")]
    DuplicateTableName(String),

    #[error("Duplicate column name '{column}' in table '{table}'")]
    DuplicateColumnName { table: String, column: String },

    #[error("Primary key column '{column}' is not a column of table '{table}'")]
    InvalidPrimaryKey { table: String, column: String },

    #[error("Primary key column '{table}.{column}' cannot be {data_type} type")]
    InvalidPrimaryKeyType {
        table: String,
        column: String,
        data_type: DataType,
    },

    #[error("Duplicate relationship name: '{0}'")]
    DuplicateRelationshipName(String),

    #[error("Relationship '{relationship}' refers to invalid table {table}")]
    InvalidRelationshipTermTable { relationship: String, table: String },

    #[error("Relationship '{relationship}' refers to invalid column {table}.{column}")]
    InvalidRelationshipTermTableColumn {
        relationship: String,
        table: String,
        column: String,
    },

    #[error("Relationship column {column} cannot be {data_type} type")]
    InvalidRelationshipColumnType {
        relationship: String,
        column: String,
        data_type: DataType,
    },

    #[error(
        "Column data types in relationship must match: Column {from} has data type {from_type} \
         and Column {to} has data type {to_type}"
    )]
    RelationshipDatatypeMismatch {
        relationship: String,
        from: String,
        from_type: DataType,
        to: String,
        to_type: DataType,
    },

    #[error("Duplicate asset name: '{0}'")]
    DuplicateAssetName(String),

    #[error("Asset '{asset}' refers to invalid table '{table}'")]
    InvalidAssetTable { asset: String, table: String },

    #[error("Asset '{asset}' includes table '{table}' more than once")]
    DuplicateAssetTable { asset: String, table: String },

    #[error("Asset '{asset}' refers to invalid column {table}.{column}")]
    InvalidAssetTableColumn {
        asset: String,
        table: String,
        column: String,
    },

    #[error("Asset '{asset}' does not include its root table '{table}'")]
    NoRootTable { asset: String, table: String },

    #[error("Asset '{asset}' root column '{column}' is not included in the root table")]
    InvalidRootColumn { asset: String, column: String },

    #[error("Asset '{asset}' follows unknown relationship '{relationship}'")]
    InvalidFollowsRelationship { asset: String, relationship: String },
}

impl SchemaError {
    /// Stable error code, suitable for API error detail lists.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::DuplicateTableName(_) => "DuplicateTableNames",
            SchemaError::DuplicateColumnName { .. } => "DuplicateColumnNames",
            SchemaError::InvalidPrimaryKey { .. } => "InvalidPrimaryKey",
            SchemaError::InvalidPrimaryKeyType { .. } => "InvalidPrimaryKeyType",
            SchemaError::DuplicateRelationshipName(_) => "DuplicateRelationshipNames",
            SchemaError::InvalidRelationshipTermTable { .. } => "InvalidRelationshipTermTable",
            SchemaError::InvalidRelationshipTermTableColumn { .. } => {
                "InvalidRelationshipTermTableColumn"
            }
            SchemaError::InvalidRelationshipColumnType { .. } => "InvalidRelationshipColumnType",
            SchemaError::RelationshipDatatypeMismatch { .. } => "RelationshipDatatypeMismatch",
            SchemaError::DuplicateAssetName(_) => "DuplicateAssetNames",
            SchemaError::InvalidAssetTable { .. } => "InvalidAssetTable",
            SchemaError::DuplicateAssetTable { .. } => "DuplicateAssetTable",
            SchemaError::InvalidAssetTableColumn { .. } => "InvalidAssetTableColumn",
            SchemaError::NoRootTable { .. } => "NoRootTable",
            SchemaError::InvalidRootColumn { .. } => "InvalidRootColumn",
            SchemaError::InvalidFollowsRelationship { .. } => "InvalidFollowsRelationship",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub name: String,
    pub datatype: DataType,
    #[serde(default)]
    pub array_of: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub primary_key: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDefinition {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDefinition {
    pub name: String,
    pub from: TermDefinition,
    pub to: TermDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTableDefinition {
    pub name: String,
    /// Column names to include. Empty includes every column of the table.
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDefinition {
    pub name: String,
    pub root_table: String,
    pub root_column: String,
    pub tables: Vec<AssetTableDefinition>,
    #[serde(default)]
    pub follow: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
    #[serde(default)]
    pub assets: Vec<AssetDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_profile_id: Option<Uuid>,
    #[serde(default)]
    pub schema: SchemaDefinition,
}

impl DatasetDefinition {
    /// Resolve names, assign identities, and check schema rules.
    ///
    /// Every violation is reported, not just the first.
    pub fn build(&self, platform: CloudPlatform) -> Result<Dataset, Vec<SchemaError>> {
        let mut errors = Vec::new();

        let mut dataset = Dataset {
            id: DatasetId::generate(),
            name: self.name.clone(),
            description: self.description.clone(),
            default_profile_id: self.default_profile_id,
            tables: Vec::new(),
            relationships: Vec::new(),
            assets: Vec::new(),
        };

        let mut seen_tables = HashSet::new();
        for table in &self.schema.tables {
            if !seen_tables.insert(table.name.as_str()) {
                errors.push(SchemaError::DuplicateTableName(table.name.clone()));
                continue;
            }
            dataset.tables.push(build_table(table, &mut errors));
        }

        let mut seen_relationships = HashSet::new();
        for relationship in &self.schema.relationships {
            if !seen_relationships.insert(relationship.name.as_str()) {
                errors.push(SchemaError::DuplicateRelationshipName(
                    relationship.name.clone(),
                ));
                continue;
            }
            if let Some(built) = build_relationship(&dataset, relationship, platform, &mut errors)
            {
                dataset.relationships.push(built);
            }
        }

        let mut seen_assets = HashSet::new();
        for asset in &self.schema.assets {
            if !seen_assets.insert(asset.name.as_str()) {
                errors.push(SchemaError::DuplicateAssetName(asset.name.clone()));
                continue;
            }
            if let Some(built) = build_asset(&dataset, asset, &mut errors) {
                dataset.assets.push(built);
            }
        }

        if errors.is_empty() {
            tracing::debug!(
                dataset = %dataset.name,
                tables = dataset.tables.len(),
                relationships = dataset.relationships.len(),
                assets = dataset.assets.len(),
                "built dataset from definition"
            );
            Ok(dataset)
        } else {
            Err(errors)
        }
    }
}

fn build_table(definition: &TableDefinition, errors: &mut Vec<SchemaError>) -> DatasetTable {
    let mut table = DatasetTable {
        id: TableId::generate(),
        name: definition.name.clone(),
        columns: Vec::with_capacity(definition.columns.len()),
        primary_key: Vec::new(),
    };

    for column in &definition.columns {
        if table.column_by_name(&column.name).is_some() {
            errors.push(SchemaError::DuplicateColumnName {
                table: table.name.clone(),
                column: column.name.clone(),
            });
            continue;
        }
        table.columns.push(Column {
            id: ColumnId::generate(),
            name: column.name.clone(),
            data_type: column.datatype,
            array_of: column.array_of,
        });
    }

    for key in &definition.primary_key {
        match table.column_by_name(key) {
            Some(column) if column.data_type.is_file_reference() => {
                errors.push(SchemaError::InvalidPrimaryKeyType {
                    table: table.name.clone(),
                    column: key.clone(),
                    data_type: column.data_type,
                });
            }
            Some(column) => {
                let id = column.id;
                table.primary_key.push(id);
            }
            None => errors.push(SchemaError::InvalidPrimaryKey {
                table: table.name.clone(),
                column: key.clone(),
            }),
        }
    }

    table
}

fn resolve_term<'d>(
    dataset: &'d Dataset,
    relationship: &str,
    term: &TermDefinition,
    errors: &mut Vec<SchemaError>,
) -> Option<(&'d DatasetTable, &'d Column)> {
    let Some(table) = dataset.table_by_name(&term.table) else {
        errors.push(SchemaError::InvalidRelationshipTermTable {
            relationship: relationship.to_string(),
            table: term.table.clone(),
        });
        return None;
    };

    let Some(column) = table.column_by_name(&term.column) else {
        errors.push(SchemaError::InvalidRelationshipTermTableColumn {
            relationship: relationship.to_string(),
            table: term.table.clone(),
            column: term.column.clone(),
        });
        return None;
    };

    if column.data_type.is_file_reference() {
        errors.push(SchemaError::InvalidRelationshipColumnType {
            relationship: relationship.to_string(),
            column: term.column.clone(),
            data_type: column.data_type,
        });
        return None;
    }

    Some((table, column))
}

fn build_relationship(
    dataset: &Dataset,
    definition: &RelationshipDefinition,
    platform: CloudPlatform,
    errors: &mut Vec<SchemaError>,
) -> Option<Relationship> {
    let from = resolve_term(dataset, &definition.name, &definition.from, errors);
    let to = resolve_term(dataset, &definition.name, &definition.to, errors);
    let ((from_table, from_column), (to_table, to_column)) = (from?, to?);

    if !from_column
        .data_type
        .is_compatible_with(to_column.data_type, platform)
    {
        errors.push(SchemaError::RelationshipDatatypeMismatch {
            relationship: definition.name.clone(),
            from: format!("{}.{}", from_table.name, from_column.name),
            from_type: from_column.data_type,
            to: format!("{}.{}", to_table.name, to_column.name),
            to_type: to_column.data_type,
        });
        return None;
    }

    Some(Relationship {
        id: RelationshipId::generate(),
        name: definition.name.clone(),
        from: RelationshipTerm {
            table: from_table.id,
            column: from_column.id,
        },
        to: RelationshipTerm {
            table: to_table.id,
            column: to_column.id,
        },
    })
}

fn build_asset(
    dataset: &Dataset,
    definition: &AssetDefinition,
    errors: &mut Vec<SchemaError>,
) -> Option<AssetSpecification> {
    let error_count = errors.len();
    let mut asset_tables: Vec<AssetTable> = Vec::with_capacity(definition.tables.len());
    let mut root = None;

    for table_definition in &definition.tables {
        let Some(table) = dataset.table_by_name(&table_definition.name) else {
            errors.push(SchemaError::InvalidAssetTable {
                asset: definition.name.clone(),
                table: table_definition.name.clone(),
            });
            continue;
        };
        if asset_tables.iter().any(|t| t.table == table.id) {
            errors.push(SchemaError::DuplicateAssetTable {
                asset: definition.name.clone(),
                table: table.name.clone(),
            });
            continue;
        }

        let mut columns: Vec<ColumnId> = Vec::new();
        if table_definition.columns.is_empty() {
            columns.extend(table.columns.iter().map(|c| c.id));
        } else {
            for name in &table_definition.columns {
                match table.column_by_name(name) {
                    Some(column) if !columns.contains(&column.id) => columns.push(column.id),
                    Some(_) => {}
                    None => errors.push(SchemaError::InvalidAssetTableColumn {
                        asset: definition.name.clone(),
                        table: table.name.clone(),
                        column: name.clone(),
                    }),
                }
            }
        }

        if table.name == definition.root_table {
            let root_column = table
                .column_by_name(&definition.root_column)
                .map(|c| c.id)
                .filter(|id| columns.contains(id));
            match root_column {
                Some(column) => root = Some((table.id, column)),
                None => errors.push(SchemaError::InvalidRootColumn {
                    asset: definition.name.clone(),
                    column: definition.root_column.clone(),
                }),
            }
        }

        asset_tables.push(AssetTable {
            table: table.id,
            columns,
        });
    }

    let root_included = definition
        .tables
        .iter()
        .any(|t| t.name == definition.root_table);
    if !root_included {
        errors.push(SchemaError::NoRootTable {
            asset: definition.name.clone(),
            table: definition.root_table.clone(),
        });
    }

    let mut follow = Vec::with_capacity(definition.follow.len());
    for name in &definition.follow {
        match dataset.relationship_by_name(name) {
            Some(relationship) => follow.push(relationship.id),
            None => errors.push(SchemaError::InvalidFollowsRelationship {
                asset: definition.name.clone(),
                relationship: name.clone(),
            }),
        }
    }

    if errors.len() > error_count {
        return None;
    }
    let (root_table, root_column) = root?;

    Some(AssetSpecification {
        id: AssetId::generate(),
        name: definition.name.clone(),
        root_table,
        root_column,
        asset_tables,
        follow,
    })
}
