//! Mappers: transform the values extracted for one field of one group.
//!
//! Filters may shrink the sequence; transforms keep its length. The engine
//! chains configured mappers left to right.

use anyhow::{Result, bail};
use recnorm_model::params::{NoParams, NotEqualParams, ReplaceParams};
use recnorm_model::{Params, is_blank, strict_equals};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A function transforming a sequence of values.
pub trait Mapper: Send + Sync + 'static {
    type Params: DeserializeOwned + Send + Sync + 'static;

    fn map(&self, values: Vec<Value>, params: &Self::Params) -> Result<Vec<Value>>;
}

/// A mapper with its parameters bound.
pub type PreparedMapper<'a> = Box<dyn Fn(Vec<Value>) -> Result<Vec<Value>> + Send + Sync + 'a>;

/// Object-safe view of a [`Mapper`] stored in the registry.
pub trait MapperEntry: Send + Sync {
    fn prepare(&self, params: Params) -> Result<PreparedMapper<'_>, serde_json::Error>;
}

impl<M: Mapper> MapperEntry for M {
    fn prepare(&self, params: Params) -> Result<PreparedMapper<'_>, serde_json::Error> {
        let params: M::Params = serde_json::from_value(Value::Object(params))?;
        Ok(Box::new(move |values: Vec<Value>| self.map(values, &params)))
    }
}

/// Drop blank values.
pub fn not_blank(values: Vec<Value>) -> Vec<Value> {
    values.into_iter().filter(|v| !is_blank(v)).collect()
}

/// Drops every blank value.
pub struct NotBlank;

impl Mapper for NotBlank {
    type Params = NoParams;

    fn map(&self, values: Vec<Value>, _params: &NoParams) -> Result<Vec<Value>> {
        Ok(not_blank(values))
    }
}

/// Drops every value strictly equal to the configured `value`.
pub struct NotEqual;

impl Mapper for NotEqual {
    type Params = NotEqualParams;

    fn map(&self, values: Vec<Value>, params: &NotEqualParams) -> Result<Vec<Value>> {
        Ok(values
            .into_iter()
            .filter(|v| !strict_equals(v, &params.value))
            .collect())
    }
}

/// Replaces the first match of `pattern` in each value with `replacement`.
///
/// Every value must be a string; anything else fails the stage.
pub struct Replace;

impl Mapper for Replace {
    type Params = ReplaceParams;

    fn map(&self, values: Vec<Value>, params: &ReplaceParams) -> Result<Vec<Value>> {
        values
            .into_iter()
            .map(|value| match value {
                Value::String(s) => Ok(Value::String(
                    params
                        .pattern
                        .replace(&s, params.replacement.as_str())
                        .into_owned(),
                )),
                other => bail!("cannot replace in non-string value {other}"),
            })
            .collect()
    }
}

/// Adapts a closure over raw parameters to the [`Mapper`] trait.
pub struct FnMapper<F>(pub F);

impl<F> Mapper for FnMapper<F>
where
    F: Fn(Vec<Value>, &Params) -> Result<Vec<Value>> + Send + Sync + 'static,
{
    type Params = Params;

    fn map(&self, values: Vec<Value>, params: &Params) -> Result<Vec<Value>> {
        (self.0)(values, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    #[test]
    fn not_blank_filters() {
        let values = vec![json!("a"), json!(""), json!(" "), json!(null), json!(0), json!(2)];
        assert_eq!(not_blank(values), vec![json!("a"), json!(2)]);
        assert!(not_blank(Vec::new()).is_empty());
    }

    #[test]
    fn not_equal_removes_matches() {
        let mapper = NotEqual.prepare(params(json!({"value": "excludeme"}))).unwrap();
        let values = mapper(vec![json!("test"), json!("excludeme")]).unwrap();
        assert_eq!(values, vec![json!("test")]);
        assert!(mapper(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn replace_first_match_only() {
        let mapper = Replace
            .prepare(params(json!({"pattern": "-", "replacement": "/"})))
            .unwrap();
        let values = mapper(vec![json!("2023-01-02"), json!("none")]).unwrap();
        assert_eq!(values, vec![json!("2023/01-02"), json!("none")]);
    }

    #[test]
    fn replace_supports_capture_groups() {
        let mapper = Replace
            .prepare(params(json!({"pattern": "(\\w+)@(\\w+)", "replacement": "$2:$1"})))
            .unwrap();
        assert_eq!(mapper(vec![json!("me@host")]).unwrap(), vec![json!("host:me")]);
    }

    #[test]
    fn replace_rejects_non_strings() {
        let mapper = Replace.prepare(params(json!({"pattern": "a"}))).unwrap();
        let err = mapper(vec![json!("a"), json!(3)]).unwrap_err();
        assert!(err.to_string().contains("non-string"));
    }
}
