//! Format versions and schema sources.
//!
//! The extraction engine knows nothing about record versions. Choosing a
//! line map happens here: each [`FormatVersion`] is a tagged variant that
//! can produce a validated [`LineMapSchema`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use linemaps_rs::LineMapSchema;

use crate::document::LineMapDocument;
use crate::error::LoadError;

/// Built-in CSMIP Volume 2 header line map.
pub const CSMIP_V2_LINEMAP: &str = include_str!("../linemaps/csmip_v2.json");

/// Anything that can produce a validated line map.
pub trait SchemaSource {
    fn load(&self) -> Result<LineMapSchema, LoadError>;
}

/// Known record formats plus user-supplied maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatVersion {
    CsmipV2,
    /// A line-map document on disk (JSON, or TOML by extension).
    Custom(PathBuf),
}

impl FormatVersion {
    pub fn name(&self) -> String {
        match self {
            FormatVersion::CsmipV2 => "csmip-v2".to_string(),
            FormatVersion::Custom(path) => path.display().to_string(),
        }
    }
}

impl SchemaSource for FormatVersion {
    fn load(&self) -> Result<LineMapSchema, LoadError> {
        let document = match self {
            FormatVersion::CsmipV2 => LineMapDocument::from_json_str(CSMIP_V2_LINEMAP)?,
            FormatVersion::Custom(path) => LineMapDocument::from_path(path)?,
        };
        document.into_schema()
    }
}

impl SchemaSource for LineMapDocument {
    fn load(&self) -> Result<LineMapSchema, LoadError> {
        self.clone().into_schema()
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for FormatVersion {
    type Err = String;

    /// Built-in names map to their variant; anything else is a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "csmip-v2" | "csmipv2" => Ok(FormatVersion::CsmipV2),
            "" => Err("empty format name".to_string()),
            _ => Ok(FormatVersion::Custom(PathBuf::from(s))),
        }
    }
}
