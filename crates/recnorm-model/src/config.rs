//! Declarative normalization configuration.
//!
//! A configuration names the output primary-key field, the input fields the
//! key may be derived from, and one [`FieldRule`] per output field. Rules
//! reference registered functions by name, either as a bare string or as an
//! object whose `name` member selects the function and whose remaining
//! members become that call's parameters:
//!
//! ```json
//! {
//!   "primaryKey": "id",
//!   "primarySources": ["id", "legacyId"],
//!   "fieldRules": {
//!     "id": { "reducer": "first" },
//!     "tags": {
//!       "mappers": [{ "name": "replace", "pattern": "^#", "replacement": "" }],
//!       "reducer": { "name": "unique", "join": ";" }
//!     }
//!   }
//! }
//! ```

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Raw parameters passed to a function, as written in the configuration.
pub type Params = Map<String, Value>;

/// Top-level normalization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationConfig {
    /// Field that holds the derived identity in every grouped record.
    pub primary_key: String,

    /// Candidate fields for the primary key, first non-blank wins.
    pub primary_sources: Vec<String>,

    /// Rules per output field, in document order.
    pub field_rules: FieldRules,
}

impl NormalizationConfig {
    /// Create a configuration with no field rules.
    pub fn new(
        primary_key: impl Into<String>,
        primary_sources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            primary_key: primary_key.into(),
            primary_sources: primary_sources.into_iter().map(Into::into).collect(),
            field_rules: FieldRules::default(),
        }
    }

    /// Add a rule for an output field.
    #[must_use]
    pub fn with_rule(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.field_rules.insert(field, Some(rule));
        self
    }
}

/// How a single output field is computed from a group of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Value source; defaults to copying the field of the same name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<FunctionRef>,

    /// Mappers applied left to right.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappers: Vec<FunctionRef>,

    /// Reducer condensing the mapped values.
    pub reducer: FunctionRef,
}

impl FieldRule {
    pub fn new(reducer: impl Into<FunctionRef>) -> Self {
        Self {
            source: None,
            mappers: Vec::new(),
            reducer: reducer.into(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<FunctionRef>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_mapper(mut self, mapper: impl Into<FunctionRef>) -> Self {
        self.mappers.push(mapper.into());
        self
    }
}

/// Reference to a registered function plus its call parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionRef {
    pub name: String,
    pub params: Params,
}

impl FunctionRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Params::new(),
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Human-readable form used in error context.
    pub fn describe(&self) -> String {
        if self.params.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, Value::Object(self.params.clone()))
        }
    }
}

impl From<&str> for FunctionRef {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for FunctionRef {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl Serialize for FunctionRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.params.is_empty() {
            return serializer.serialize_str(&self.name);
        }
        let mut map = serializer.serialize_map(Some(self.params.len() + 1))?;
        map.serialize_entry("name", &self.name)?;
        for (key, value) in &self.params {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FunctionRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(Self::named(name)),
            Value::Object(mut params) => match params.remove("name") {
                Some(Value::String(name)) => Ok(Self { name, params }),
                Some(other) => Err(de::Error::custom(format!(
                    "function name must be a string, found {other}"
                ))),
                None => Err(de::Error::missing_field("name")),
            },
            other => Err(de::Error::custom(format!(
                "expected a function name or an object with a `name` member, found {other}"
            ))),
        }
    }
}

/// Ordered field rules. A `null` rule is kept and skipped at run time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldRules(Vec<(String, Option<FieldRule>)>);

impl FieldRules {
    /// Insert or replace the rule for a field, keeping its original position.
    pub fn insert(&mut self, field: impl Into<String>, rule: Option<FieldRule>) {
        let field = field.into();
        match self.0.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = rule,
            None => self.0.push((field, rule)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.0
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, rule)| rule.as_ref())
    }

    /// Iterate over all entries, including skipped (`None`) rules.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldRule>)> {
        self.0
            .iter()
            .map(|(name, rule)| (name.as_str(), rule.as_ref()))
    }

    /// Iterate over fields that have a rule.
    pub fn active(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.iter()
            .filter_map(|(name, rule)| rule.map(|rule| (name, rule)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FieldRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, rule) in &self.0 {
            map.serialize_entry(field, rule)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldRulesVisitor;

        impl<'de> Visitor<'de> for FieldRulesVisitor {
            type Value = FieldRules;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to field rules")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldRules, A::Error> {
                let mut rules = FieldRules::default();
                while let Some((field, rule)) =
                    access.next_entry::<String, Option<FieldRule>>()?
                {
                    rules.insert(field, rule);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(FieldRulesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn function_ref_from_string_or_object() {
        let bare: FunctionRef = serde_json::from_value(json!("first")).unwrap();
        assert_eq!(bare, FunctionRef::named("first"));

        let object: FunctionRef =
            serde_json::from_value(json!({"name": "unique", "join": ","})).unwrap();
        assert_eq!(object.name, "unique");
        assert_eq!(object.params.get("join"), Some(&json!(",")));
        assert!(!object.params.contains_key("name"));
    }

    #[test]
    fn function_ref_requires_name() {
        let err = serde_json::from_value::<FunctionRef>(json!({"join": ","})).unwrap_err();
        assert!(err.to_string().contains("name"));
        assert!(serde_json::from_value::<FunctionRef>(json!(42)).is_err());
    }

    #[test]
    fn config_keeps_rule_order_and_null_rules() {
        let config: NormalizationConfig = serde_json::from_value(json!({
            "primaryKey": "id",
            "primarySources": ["id", "alt"],
            "fieldRules": {
                "zeta": {"reducer": "first"},
                "alpha": null,
                "mid": {"source": "getValue", "mappers": ["notBlank"], "reducer": "unique"}
            }
        }))
        .unwrap();

        let fields: Vec<_> = config.field_rules.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, ["zeta", "alpha", "mid"]);
        let active: Vec<_> = config.field_rules.active().map(|(f, _)| f).collect();
        assert_eq!(active, ["zeta", "mid"]);
        assert_eq!(config.field_rules.get("mid").unwrap().mappers.len(), 1);
    }

    #[test]
    fn function_ref_serializes_compactly() {
        let value = serde_json::to_value(FunctionRef::named("first")).unwrap();
        assert_eq!(value, json!("first"));
        let value = serde_json::to_value(FunctionRef::named("unique").param("join", ",")).unwrap();
        assert_eq!(value, json!({"name": "unique", "join": ","}));
    }
}
