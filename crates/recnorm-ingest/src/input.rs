//! Reading records and normalization configs from disk.

use std::fs;
use std::path::Path;

use recnorm_model::{NormalizationConfig, Record};
use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};

/// On-disk format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Infer the format from a file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml { Self::Toml } else { Self::Json }
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a JSON array of objects.
///
/// `path` is only used for error context.
pub fn parse_records(contents: &str, path: &Path) -> Result<Vec<Record>> {
    let values: Vec<Value> = serde_json::from_str(contents).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(record) => Ok(record),
            other => Err(IngestError::NotAnObject {
                path: path.to_path_buf(),
                index,
                found: json_type_name(&other),
            }),
        })
        .collect()
}

/// Read a JSON array of records from `path`.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let records = parse_records(&read_to_string(path)?, path)?;
    debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

/// Parse a configuration document in the given format.
pub fn parse_config(contents: &str, format: ConfigFormat, path: &Path) -> Result<NormalizationConfig> {
    match format {
        ConfigFormat::Json => serde_json::from_str(contents).map_err(|source| IngestError::Json {
            path: path.to_path_buf(),
            source,
        }),
        ConfigFormat::Toml => toml::from_str(contents).map_err(|source| IngestError::Toml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read a normalization configuration, choosing the format by extension.
pub fn load_config(path: &Path) -> Result<NormalizationConfig> {
    let format = ConfigFormat::from_path(path);
    let config = parse_config(&read_to_string(path)?, format, path)?;
    debug!(
        path = %path.display(),
        ?format,
        rules = config.field_rules.len(),
        "loaded normalization config"
    );
    Ok(config)
}
