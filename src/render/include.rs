//! Sections of a rendered snapshot the caller asked for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncludeError {
    #[error("Unknown include value '{0}'")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Include {
    /// Render name and description only, whatever else is listed.
    None,
    Sources,
    Tables,
    Relationships,
    Profile,
    /// Cloud project of the snapshot. Accepted, never rendered here.
    DataProject,
    /// Physical access paths. Accepted, never rendered here.
    AccessInformation,
}

impl Include {
    pub const DEFAULT: [Include; 4] = [
        Include::Sources,
        Include::Tables,
        Include::Relationships,
        Include::Profile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Include::None => "NONE",
            Include::Sources => "SOURCES",
            Include::Tables => "TABLES",
            Include::Relationships => "RELATIONSHIPS",
            Include::Profile => "PROFILE",
            Include::DataProject => "DATA_PROJECT",
            Include::AccessInformation => "ACCESS_INFORMATION",
        }
    }

    /// Parse a list of include names, e.g. the items of `"TABLES,PROFILE"`.
    ///
    /// Blank items are skipped and duplicates collapse.
    pub fn parse_list<'a>(
        items: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<Include>, IncludeError> {
        let mut flags = Vec::new();
        for item in items.into_iter().map(str::trim).filter(|s| !s.is_empty()) {
            let flag: Include = item.parse()?;
            if !flags.contains(&flag) {
                flags.push(flag);
            }
        }
        Ok(flags)
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Include {
    type Err = IncludeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" => Ok(Include::None),
            "SOURCES" => Ok(Include::Sources),
            "TABLES" => Ok(Include::Tables),
            "RELATIONSHIPS" => Ok(Include::Relationships),
            "PROFILE" => Ok(Include::Profile),
            "DATA_PROJECT" => Ok(Include::DataProject),
            "ACCESS_INFORMATION" => Ok(Include::AccessInformation),
            _ => Err(IncludeError::Unknown(s.to_string())),
        }
    }
}
