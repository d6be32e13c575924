//! Inbound snapshot request.
//!
//! Fields are optional where the request validator needs to report them as
//! missing; the engine assumes validation already ran.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Selection strategy for one request contents entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotMode {
    #[serde(rename = "byAsset", alias = "BY_ASSET")]
    ByAsset,
    #[serde(rename = "byFullView", alias = "BY_FULL_VIEW", alias = "byLiveView")]
    ByFullView,
    #[serde(rename = "byQuery", alias = "BY_QUERY")]
    ByQuery,
    #[serde(
        rename = "byRowSelection",
        alias = "BY_ROW_SELECTION",
        alias = "byRowId",
        alias = "BY_ROW_ID"
    )]
    ByRowSelection,
}

impl fmt::Display for SnapshotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotMode::ByAsset => write!(f, "byAsset"),
            SnapshotMode::ByFullView => write!(f, "byFullView"),
            SnapshotMode::ByQuery => write!(f, "byQuery"),
            SnapshotMode::ByRowSelection => write!(f, "byRowSelection"),
        }
    }
}

/// Mode tag as received. Tags this engine does not know are kept verbatim so
/// the mode selector can reject them with a useful message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeTag {
    Known(SnapshotMode),
    Unrecognized(String),
}

impl From<SnapshotMode> for ModeTag {
    fn from(mode: SnapshotMode) -> Self {
        ModeTag::Known(mode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSpec {
    pub asset_name: Option<String>,
    /// Root row values, consumed by the data copy step.
    #[serde(default)]
    pub root_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    pub asset_name: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSelectionTable {
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    /// Opaque row identifiers, consumed by the data copy step.
    #[serde(default)]
    pub row_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowSelectionSpec {
    #[serde(default)]
    pub tables: Vec<RowSelectionTable>,
}

impl RowSelectionSpec {
    /// The requested table with this name. Duplicates are rejected by the
    /// request validator; if present anyway, the first entry is used.
    pub fn table(&self, name: &str) -> Option<&RowSelectionTable> {
        self.tables.iter().find(|t| t.table_name == name)
    }
}

/// One source dataset and how to select from it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequestContents {
    pub dataset_name: Option<String>,
    pub mode: Option<ModeTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_spec: Option<AssetSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_spec: Option<QuerySpec>,
    #[serde(
        default,
        alias = "rowIdSpec",
        skip_serializing_if = "Option::is_none"
    )]
    pub row_selection_spec: Option<RowSelectionSpec>,
}

impl SnapshotRequestContents {
    /// Contents selecting the whole dataset.
    pub fn full_view(dataset: impl Into<String>) -> Self {
        Self {
            dataset_name: Some(dataset.into()),
            mode: Some(SnapshotMode::ByFullView.into()),
            ..Default::default()
        }
    }

    /// Contents selecting a named asset.
    pub fn by_asset(dataset: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            dataset_name: Some(dataset.into()),
            mode: Some(SnapshotMode::ByAsset.into()),
            asset_spec: Some(AssetSpec {
                asset_name: Some(asset.into()),
                root_values: Vec::new(),
            }),
            ..Default::default()
        }
    }

    /// Contents selecting an asset through a query.
    pub fn by_query(
        dataset: impl Into<String>,
        asset: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            dataset_name: Some(dataset.into()),
            mode: Some(SnapshotMode::ByQuery.into()),
            query_spec: Some(QuerySpec {
                asset_name: Some(asset.into()),
                query: Some(query.into()),
            }),
            ..Default::default()
        }
    }

    /// Contents selecting explicit tables and columns.
    pub fn by_row_selection(dataset: impl Into<String>, tables: Vec<RowSelectionTable>) -> Self {
        Self {
            dataset_name: Some(dataset.into()),
            mode: Some(SnapshotMode::ByRowSelection.into()),
            row_selection_spec: Some(RowSelectionSpec { tables }),
            ..Default::default()
        }
    }
}

/// A request to create a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub profile_id: Option<Uuid>,
    pub consent_code: Option<String>,
    #[serde(default)]
    pub contents: Vec<SnapshotRequestContents>,
}

impl SnapshotRequest {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, profile_id: Uuid) -> Self {
        self.profile_id = Some(profile_id);
        self
    }

    pub fn with_contents(mut self, contents: SnapshotRequestContents) -> Self {
        self.contents.push(contents);
        self
    }
}
