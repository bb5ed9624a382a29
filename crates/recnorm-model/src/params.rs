//! Typed parameters for the built-in functions.
//!
//! Each built-in deserializes its [`Params`](crate::config::Params) into one of
//! these structs when a configuration is compiled, so a missing field or a
//! malformed pattern is reported before any record is processed.

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parameters for functions that take none. Extra members are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoParams {}

/// `getValue`: copy a field, falling back to another when blank.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetValueParams {
    pub field: String,
    #[serde(default)]
    pub fallback_field: Option<String>,
}

/// `alternateValue`: choose between two fields based on a test field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateValueParams {
    pub default_field: String,
    pub alternate_field: String,
    pub test_field: String,
    #[serde(default)]
    pub test_value: Value,
}

/// `notEqual`: drop values equal to `value`.
#[derive(Debug, Clone, Deserialize)]
pub struct NotEqualParams {
    #[serde(default)]
    pub value: Value,
}

/// `replace`: substitute the first match of `pattern` in each value.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceParams {
    #[serde(deserialize_with = "deserialize_regex")]
    pub pattern: Regex,
    #[serde(default)]
    pub replacement: String,
}

/// `unique`: optionally join the sorted distinct values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UniqueParams {
    #[serde(default)]
    pub join: Option<String>,
}

/// `anyMatch`: emit `match` when any value matches `pattern`, else `nonMatch`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnyMatchParams {
    #[serde(deserialize_with = "deserialize_regex")]
    pub pattern: Regex,
    #[serde(default, rename = "match")]
    pub matched: Value,
    #[serde(default)]
    pub non_match: Value,
}

fn deserialize_regex<'de, D>(deserializer: D) -> Result<Regex, D::Error>
where
    D: Deserializer<'de>,
{
    let pattern = String::deserialize(deserializer)?;
    Regex::new(&pattern).map_err(serde::de::Error::custom)
}
