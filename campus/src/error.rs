//! Error types for persistence and configuration.
//!
//! Graph edits never fail with an error: stale references are no-ops and
//! invalid gestures are reported as [`crate::editor::Rejection`]. Only file
//! I/O and document decoding surface here.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed map document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("map exceeds ingest limit: {0}")]
    Limit(&'static str),

    #[error("invalid map document: {0}")]
    Invalid(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    /// Short machine-readable code, used by bindings that report errors as data.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io { .. } => "io",
            Error::Json(_) => "json",
            Error::Toml(_) => "toml",
            Error::Limit(_) => "limit",
            Error::Invalid(_) => "invalid",
        }
    }
}
