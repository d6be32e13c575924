//! Validation of snapshot requests.
//!
//! Runs before derivation and reports every problem at once. Each error has a
//! stable code for API detail lists.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ValidationSettings;
use crate::model::{ModeTag, SnapshotMode, SnapshotRequest, SnapshotRequestContents};
use crate::query::Query;

/// Validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NameMissing,
    NameInvalid { name: String },
    MissingProfileId,
    DescriptionMissing,
    DescriptionTooLong { length: usize, max: usize },
    SourceListEmpty,
    SourceListTooLong { count: usize },
    DatasetNameMissing { entry: usize },
    ContentsModeInvalid { entry: usize, mode: Option<String> },
    RootValuesListEmpty { entry: usize },
    AssetNameMissing { entry: usize },
    AssetSpecMissing { entry: usize },
    QueryEmpty { entry: usize },
    QueryInvalid { entry: usize, reason: String },
    QuerySpecMissing { entry: usize },
    TablesListEmpty { entry: usize },
    TableNameMissing { entry: usize, position: usize },
    DuplicateTableName { entry: usize, table: String },
    TableColumnsMissing { entry: usize, table: String },
    TableRowIdsMissing { entry: usize, table: String },
    RowSelectionSpecMissing { entry: usize },
}

impl ValidationError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NameMissing => "SnapshotNameMissing",
            ValidationError::NameInvalid { .. } => "SnapshotNameInvalid",
            ValidationError::MissingProfileId => "SnapshotMissingProfileId",
            ValidationError::DescriptionMissing => "SnapshotDescriptionMissing",
            ValidationError::DescriptionTooLong { .. } => "SnapshotDescriptionTooLong",
            ValidationError::SourceListEmpty => "SnapshotSourceListEmpty",
            ValidationError::SourceListTooLong { .. } => "SnapshotSourceListTooLong",
            ValidationError::DatasetNameMissing { .. } => "SnapshotDatasetNameMissing",
            ValidationError::ContentsModeInvalid { .. } => "SnapshotContentsModeInvalid",
            ValidationError::RootValuesListEmpty { .. } => "SnapshotRootValuesListEmpty",
            ValidationError::AssetNameMissing { .. } => "SnapshotAssetNameMissing",
            ValidationError::AssetSpecMissing { .. } => "SnapshotAssetSpecMissing",
            ValidationError::QueryEmpty { .. } => "SnapshotQueryEmpty",
            ValidationError::QueryInvalid { .. } => "SnapshotQueryInvalid",
            ValidationError::QuerySpecMissing { .. } => "SnapshotQuerySpecMissing",
            ValidationError::TablesListEmpty { .. } => "SnapshotTablesListEmpty",
            ValidationError::TableNameMissing { .. } => "SnapshotTableNameMissing",
            ValidationError::DuplicateTableName { .. } => "SnapshotTableNameDuplicate",
            ValidationError::TableColumnsMissing { .. } => "SnapshotTableColumnsMissing",
            ValidationError::TableRowIdsMissing { .. } => "SnapshotTableRowIdsMissing",
            ValidationError::RowSelectionSpecMissing { .. } => "SnapshotRowSelectionSpecMissing",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NameMissing => write!(f, "Snapshot name is required"),
            ValidationError::NameInvalid { name } => write!(
                f,
                "Snapshot name '{}' must start with a letter or digit and contain only letters, digits and underscores",
                name
            ),
            ValidationError::MissingProfileId => write!(f, "Billing profile id is required"),
            ValidationError::DescriptionMissing => write!(f, "Snapshot description is required"),
            ValidationError::DescriptionTooLong { length, max } => write!(
                f,
                "Snapshot description is {} characters, must be less than {}",
                length, max
            ),
            ValidationError::SourceListEmpty => {
                write!(f, "Snapshot contents must name at least one dataset")
            }
            ValidationError::SourceListTooLong { count } => write!(
                f,
                "Only one snapshot contents entry is allowed, got {}",
                count
            ),
            ValidationError::DatasetNameMissing { entry } => {
                write!(f, "contents[{}]: dataset name is required", entry)
            }
            ValidationError::ContentsModeInvalid { entry, mode } => match mode {
                Some(mode) => write!(f, "contents[{}]: unknown mode '{}'", entry, mode),
                None => write!(f, "contents[{}]: mode is required", entry),
            },
            ValidationError::RootValuesListEmpty { entry } => {
                write!(f, "contents[{}]: asset root values list is empty", entry)
            }
            ValidationError::AssetNameMissing { entry } => {
                write!(f, "contents[{}]: asset name is required", entry)
            }
            ValidationError::AssetSpecMissing { entry } => {
                write!(f, "contents[{}]: byAsset mode requires assetSpec", entry)
            }
            ValidationError::QueryEmpty { entry } => {
                write!(f, "contents[{}]: query is required", entry)
            }
            ValidationError::QueryInvalid { entry, reason } => {
                write!(f, "contents[{}]: {}", entry, reason)
            }
            ValidationError::QuerySpecMissing { entry } => {
                write!(f, "contents[{}]: byQuery mode requires querySpec", entry)
            }
            ValidationError::TablesListEmpty { entry } => {
                write!(f, "contents[{}]: row selection names no tables", entry)
            }
            ValidationError::TableNameMissing { entry, position } => write!(
                f,
                "contents[{}]: row selection table {} has no name",
                entry, position
            ),
            ValidationError::DuplicateTableName { entry, table } => write!(
                f,
                "contents[{}]: row selection names table '{}' more than once",
                entry, table
            ),
            ValidationError::TableColumnsMissing { entry, table } => write!(
                f,
                "contents[{}]: row selection table '{}' has no columns",
                entry, table
            ),
            ValidationError::TableRowIdsMissing { entry, table } => write!(
                f,
                "contents[{}]: row selection table '{}' has no row ids",
                entry, table
            ),
            ValidationError::RowSelectionSpecMissing { entry } => write!(
                f,
                "contents[{}]: byRowSelection mode requires rowSelectionSpec",
                entry
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][_a-zA-Z0-9]*$").unwrap());

/// Validate a snapshot request.
pub fn validate_request(
    request: &SnapshotRequest,
    settings: &ValidationSettings,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_name(request, settings, &mut errors);

    if request.profile_id.is_none() {
        errors.push(ValidationError::MissingProfileId);
    }

    validate_description(request, settings, &mut errors);

    match request.contents.len() {
        0 => errors.push(ValidationError::SourceListEmpty),
        1 => {}
        count => errors.push(ValidationError::SourceListTooLong { count }),
    }
    for (entry, contents) in request.contents.iter().enumerate() {
        validate_contents(entry, contents, settings, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_name(
    request: &SnapshotRequest,
    settings: &ValidationSettings,
    errors: &mut Vec<ValidationError>,
) {
    match request.name.as_deref() {
        None => errors.push(ValidationError::NameMissing),
        Some(name) if name.trim().is_empty() => errors.push(ValidationError::NameMissing),
        Some(name) if name.len() > settings.max_name_length || !NAME_PATTERN.is_match(name) => {
            errors.push(ValidationError::NameInvalid {
                name: name.to_string(),
            })
        }
        Some(_) => {}
    }
}

fn validate_description(
    request: &SnapshotRequest,
    settings: &ValidationSettings,
    errors: &mut Vec<ValidationError>,
) {
    match request.description.as_deref() {
        None => errors.push(ValidationError::DescriptionMissing),
        Some(description) if description.trim().is_empty() => {
            errors.push(ValidationError::DescriptionMissing)
        }
        Some(description) => {
            let length = description.chars().count();
            if length >= settings.max_description_length {
                errors.push(ValidationError::DescriptionTooLong {
                    length,
                    max: settings.max_description_length,
                });
            }
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

fn validate_contents(
    entry: usize,
    contents: &SnapshotRequestContents,
    settings: &ValidationSettings,
    errors: &mut Vec<ValidationError>,
) {
    if is_blank(contents.dataset_name.as_deref()) {
        errors.push(ValidationError::DatasetNameMissing { entry });
    }

    let mode = match &contents.mode {
        Some(ModeTag::Known(mode)) => *mode,
        Some(ModeTag::Unrecognized(tag)) => {
            errors.push(ValidationError::ContentsModeInvalid {
                entry,
                mode: Some(tag.clone()),
            });
            return;
        }
        None => {
            errors.push(ValidationError::ContentsModeInvalid { entry, mode: None });
            return;
        }
    };

    match mode {
        SnapshotMode::ByAsset => match &contents.asset_spec {
            Some(spec) => {
                if spec.root_values.is_empty() {
                    errors.push(ValidationError::RootValuesListEmpty { entry });
                }
                if is_blank(spec.asset_name.as_deref()) {
                    errors.push(ValidationError::AssetNameMissing { entry });
                }
            }
            None => errors.push(ValidationError::AssetSpecMissing { entry }),
        },
        SnapshotMode::ByQuery => match &contents.query_spec {
            Some(spec) => {
                match spec.query.as_deref() {
                    Some(query) if !query.trim().is_empty() => {
                        if let Err(err) = Query::parse(query) {
                            errors.push(ValidationError::QueryInvalid {
                                entry,
                                reason: err.to_string(),
                            });
                        }
                    }
                    _ => errors.push(ValidationError::QueryEmpty { entry }),
                }
                if is_blank(spec.asset_name.as_deref()) {
                    errors.push(ValidationError::AssetNameMissing { entry });
                }
            }
            None => errors.push(ValidationError::QuerySpecMissing { entry }),
        },
        SnapshotMode::ByRowSelection => match &contents.row_selection_spec {
            Some(spec) => {
                if spec.tables.is_empty() {
                    errors.push(ValidationError::TablesListEmpty { entry });
                }
                let mut seen = HashSet::new();
                for (position, table) in spec.tables.iter().enumerate() {
                    if table.table_name.trim().is_empty() {
                        errors.push(ValidationError::TableNameMissing { entry, position });
                        continue;
                    }
                    if !seen.insert(table.table_name.as_str()) {
                        errors.push(ValidationError::DuplicateTableName {
                            entry,
                            table: table.table_name.clone(),
                        });
                    }
                    if table.columns.is_empty() {
                        errors.push(ValidationError::TableColumnsMissing {
                            entry,
                            table: table.table_name.clone(),
                        });
                    }
                    if settings.require_row_ids && table.row_ids.is_empty() {
                        errors.push(ValidationError::TableRowIdsMissing {
                            entry,
                            table: table.table_name.clone(),
                        });
                    }
                }
            }
            None => errors.push(ValidationError::RowSelectionSpecMissing { entry }),
        },
        SnapshotMode::ByFullView => {}
    }
}
