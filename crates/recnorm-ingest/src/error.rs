use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading inputs or writing output.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML in {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize output")]
    Serialize(#[source] serde_json::Error),

    #[error("expected {path} to contain a JSON array of objects; element {index} is {found}")]
    NotAnObject {
        path: PathBuf,
        index: usize,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
