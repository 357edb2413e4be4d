//! Loader errors.

use std::path::PathBuf;

use linemaps_rs::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read line map '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON line map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML line map: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document parsed but an entry is unusable as written.
    #[error("line map entry '{identifier}': {reason}")]
    Entry { identifier: String, reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl LoadError {
    pub(crate) fn entry(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        LoadError::Entry {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}
