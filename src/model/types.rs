//! Column data types and cloud platform rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data type of a dataset or snapshot column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Boolean,
    Bytes,
    Date,
    Datetime,
    /// Reference to a directory in the dataset file system.
    Dirref,
    /// Reference to a file in the dataset file system.
    Fileref,
    Float,
    Float64,
    Integer,
    Int64,
    Numeric,
    String,
    Text,
    Time,
    Timestamp,
}

impl DataType {
    /// All data types, in declaration order.
    pub const ALL: [DataType; 15] = [
        DataType::Boolean,
        DataType::Bytes,
        DataType::Date,
        DataType::Datetime,
        DataType::Dirref,
        DataType::Fileref,
        DataType::Float,
        DataType::Float64,
        DataType::Integer,
        DataType::Int64,
        DataType::Numeric,
        DataType::String,
        DataType::Text,
        DataType::Time,
        DataType::Timestamp,
    ];

    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Bytes => "bytes",
            DataType::Date => "date",
            DataType::Datetime => "datetime",
            DataType::Dirref => "dirref",
            DataType::Fileref => "fileref",
            DataType::Float => "float",
            DataType::Float64 => "float64",
            DataType::Integer => "integer",
            DataType::Int64 => "int64",
            DataType::Numeric => "numeric",
            DataType::String => "string",
            DataType::Text => "text",
            DataType::Time => "time",
            DataType::Timestamp => "timestamp",
        }
    }

    /// File and directory references cannot participate in keys.
    pub fn is_file_reference(&self) -> bool {
        matches!(self, DataType::Fileref | DataType::Dirref)
    }

    /// Whether a relationship may join a column of this type to a column of `to`.
    ///
    /// GCP follows BigQuery's conversion rules. Azure follows the implicit
    /// conversions of the Synapse SQL engine, which are much looser.
    pub fn is_compatible_with(&self, to: DataType, platform: CloudPlatform) -> bool {
        use DataType::*;

        match platform {
            CloudPlatform::Gcp => match self {
                Date | Datetime => matches!(to, Date | Datetime),
                Dirref | Fileref => matches!(to, Dirref | Fileref),
                Float | Float64 | Integer | Int64 | Numeric => {
                    matches!(to, Float | Float64 | Integer | Int64 | Numeric)
                }
                String | Text => matches!(to, String | Text),
                other => *other == to,
            },
            CloudPlatform::Azure => match self {
                Boolean | Float | Float64 | Integer | Int64 | Numeric => matches!(
                    to,
                    Boolean | Float | Float64 | Text | String | Integer | Int64 | Numeric
                ),
                Bytes => matches!(to, Boolean | Bytes | Integer | Int64 | Numeric),
                Date => matches!(to, Date | Datetime | Timestamp | Text | String),
                Datetime | Timestamp => {
                    matches!(to, Date | Datetime | Timestamp | Time | Text | String)
                }
                Time => matches!(to, Datetime | Timestamp | Text | String),
                Dirref | Fileref => matches!(to, Dirref | Fileref),
                Text | String => !matches!(to, Dirref | Fileref),
            },
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        DataType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == lower)
            .ok_or_else(|| format!("unknown data type: {}", s))
    }
}

/// Cloud platform hosting a dataset's physical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudPlatform {
    #[default]
    Gcp,
    Azure,
}

impl FromStr for CloudPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcp" => Ok(CloudPlatform::Gcp),
            "azure" => Ok(CloudPlatform::Azure),
            other => Err(format!("unknown cloud platform: {}", other)),
        }
    }
}
